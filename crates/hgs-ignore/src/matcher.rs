//! Compiled ignore patterns.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, trace};

use crate::error::{IgnoreError, IgnoreResult};
use crate::glob::relative_glob_regex;
use crate::parser::{parse_lines, PatternLine, Syntax};

/// One compiled ignore pattern.
#[derive(Clone, Debug)]
pub struct IgnorePattern {
    pub syntax: Syntax,
    /// Pattern text as written, after comment stripping.
    pub pattern: String,
    /// The trimmed source line, comment included.
    pub original: String,
    /// 1-based line number in the ignore file.
    pub line: usize,
    regex: Regex,
}

impl IgnorePattern {
    fn compile(line: PatternLine, file: &Path) -> IgnoreResult<Self> {
        let source = match line.syntax {
            Syntax::Glob => relative_glob_regex(&line.pattern),
            Syntax::Regexp => line.pattern.clone(),
        };
        let regex = Regex::new(&source).map_err(|source| IgnoreError::InvalidPattern {
            file: file.to_path_buf(),
            line: line.line,
            pattern: line.pattern.clone(),
            source,
        })?;
        Ok(Self {
            syntax: line.syntax,
            pattern: line.pattern,
            original: line.original,
            line: line.line,
            regex,
        })
    }

    /// Whether this pattern matches a repository-relative path.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// The regular expression this pattern compiled to.
    pub fn regex_source(&self) -> &str {
        self.regex.as_str()
    }
}

/// An ordered, immutable set of ignore patterns from one ignore file.
#[derive(Clone, Debug, Default)]
pub struct IgnoreMatcher {
    source: Option<PathBuf>,
    patterns: Vec<IgnorePattern>,
}

impl IgnoreMatcher {
    /// A matcher that ignores nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read and compile the ignore file at `path`. A missing file yields an
    /// empty matcher.
    pub fn compile(path: &Path) -> IgnoreResult<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no ignore file");
                return Ok(Self::empty());
            }
            Err(source) => {
                return Err(IgnoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_content(&content, path)
    }

    /// Compile ignore-file content; `file` is used for error locations.
    pub fn from_content(content: &str, file: &Path) -> IgnoreResult<Self> {
        let patterns = parse_lines(content, file)?
            .into_iter()
            .map(|line| IgnorePattern::compile(line, file))
            .collect::<IgnoreResult<Vec<_>>>()?;
        debug!(file = %file.display(), patterns = patterns.len(), "compiled ignore patterns");
        Ok(Self {
            source: Some(file.to_path_buf()),
            patterns,
        })
    }

    /// The ignore file these patterns came from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn patterns(&self) -> &[IgnorePattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any pattern matches `path`.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.matching_pattern(path).is_some()
    }

    /// The first pattern, in file order, that matches `path`.
    pub fn matching_pattern(&self, path: &str) -> Option<&IgnorePattern> {
        let found = self.patterns.iter().find(|p| p.is_match(path));
        if let Some(p) = found {
            trace!(path, line = p.line, pattern = %p.pattern, "ignored");
        }
        found
    }
}
