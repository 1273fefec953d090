//! Repository discovery and the status pipeline.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hgs_dirstate::Dirstate;
use hgs_ignore::IgnoreMatcher;
use tracing::debug;

use crate::config::{StatusConfig, CONFIG_FILE_NAME};
use crate::error::{StatusError, StatusResult};
use crate::reconcile::reconcile;
use crate::snapshot::{walk, Snapshot};
use crate::status::WorkdirStatus;

/// Branch name reported when no branch file exists.
pub const DEFAULT_BRANCH: &str = "default";

/// Find the nearest ancestor of `start` (inclusive) that contains
/// `metadata_dir` as a directory.
pub fn find_root(start: &Path, metadata_dir: &str) -> StatusResult<PathBuf> {
    start
        .ancestors()
        .filter(|dir| !dir.as_os_str().is_empty())
        .find(|dir| dir.join(metadata_dir).is_dir())
        .map(Path::to_path_buf)
        .ok_or_else(|| StatusError::RepositoryNotFound {
            start: start.to_path_buf(),
            metadata_dir: metadata_dir.to_string(),
        })
}

/// An opened working directory.
#[derive(Clone, Debug)]
pub struct Repository {
    root: PathBuf,
    config: StatusConfig,
}

impl Repository {
    /// Discover the repository containing `start`.
    ///
    /// With `config_path`, that file supplies the layout. Otherwise the
    /// default layout locates the root and `<metadata_dir>/hgs.toml`, when
    /// present, overrides it.
    pub fn open(start: &Path, config_path: Option<&Path>) -> StatusResult<Self> {
        let base = match config_path {
            Some(path) => StatusConfig::load(path)?,
            None => StatusConfig::default(),
        };
        let root = find_root(start, &base.metadata_dir)?;
        let config = match config_path {
            Some(_) => base,
            None => {
                let local = root.join(&base.metadata_dir).join(CONFIG_FILE_NAME);
                StatusConfig::load_optional(&local)?.unwrap_or(base)
            }
        };
        debug!(root = %root.display(), "opened repository");
        Ok(Self { root, config })
    }

    /// Use an already known root.
    pub fn at(root: impl Into<PathBuf>, config: StatusConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(&self.config.metadata_dir)
    }

    pub fn dirstate_path(&self) -> PathBuf {
        self.metadata_path().join(&self.config.dirstate_file)
    }

    pub fn ignore_path(&self) -> PathBuf {
        self.root.join(&self.config.ignore_file)
    }

    pub fn branch_path(&self) -> PathBuf {
        self.metadata_path().join(&self.config.branch_file)
    }

    /// Decode the dirstate. A missing file is an empty dirstate.
    pub fn dirstate(&self) -> StatusResult<Dirstate> {
        Ok(hgs_dirstate::load(&self.dirstate_path())?)
    }

    /// Compile the ignore file. A missing file ignores nothing.
    pub fn ignore_matcher(&self) -> StatusResult<IgnoreMatcher> {
        Ok(IgnoreMatcher::compile(&self.ignore_path())?)
    }

    /// Walk the working tree.
    pub fn snapshot(&self) -> Snapshot {
        walk(&self.root, &self.config.metadata_dir)
    }

    /// Decode, compile, walk and reconcile.
    ///
    /// Dirstate and ignore-file errors are fatal; unreadable paths are not.
    pub fn status(&self) -> StatusResult<WorkdirStatus> {
        let dirstate = self.dirstate()?;
        let ignore = self.ignore_matcher()?;
        let snapshot = self.snapshot();
        Ok(reconcile(&dirstate, &snapshot, &ignore))
    }

    /// Current branch name; `default` when the branch file is missing or empty.
    pub fn branch(&self) -> StatusResult<String> {
        let path = self.branch_path();
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let name = match text.trim() {
                    "" => DEFAULT_BRANCH,
                    name => name,
                };
                Ok(name.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(DEFAULT_BRANCH.to_string()),
            Err(source) => Err(StatusError::Io { path, source }),
        }
    }
}
