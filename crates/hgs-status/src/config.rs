use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StatusError, StatusResult};

/// Name of the optional per-repository config file inside the metadata dir.
pub const CONFIG_FILE_NAME: &str = "hgs.toml";

/// Repository layout: where the dirstate, ignore and branch files live.
///
/// Every field is optional in TOML; missing keys take the default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Private metadata directory at the repository root.
    pub metadata_dir: String,
    /// Dirstate file name, inside `metadata_dir`.
    pub dirstate_file: String,
    /// Ignore file name, at the repository root.
    pub ignore_file: String,
    /// Branch file name, inside `metadata_dir`.
    pub branch_file: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            metadata_dir: ".hg".into(),
            dirstate_file: "dirstate".into(),
            ignore_file: ".hgignore".into(),
            branch_file: "branch".into(),
        }
    }
}

impl StatusConfig {
    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a config file that must exist.
    pub fn load(path: &Path) -> StatusResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| StatusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|e| config_error(path, e))
    }

    /// Load a config file if it exists.
    pub fn load_optional(path: &Path) -> StatusResult<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }
}

fn config_error(path: &Path, err: toml::de::Error) -> StatusError {
    StatusError::Config {
        path: PathBuf::from(path),
        message: err.to_string(),
    }
}
