//! Ignore-file compiler for hgs.
//!
//! Reads `.hgignore`, honouring `syntax:` directives, comments and escapes,
//! and compiles each line to a regular expression. Globs are translated with
//! [`glob_to_regex`] and anchored as relative globs; regexps are used as-is
//! with search semantics.
//!
//! # Key Types
//!
//! - [`IgnoreMatcher`] -- the ordered, compiled pattern set
//! - [`IgnorePattern`] -- one compiled line with its source location
//! - [`Syntax`] -- glob or regexp

pub mod error;
pub mod glob;
pub mod matcher;
pub mod parser;

pub use error::{IgnoreError, IgnoreResult};
pub use glob::{glob_to_regex, relative_glob_regex};
pub use matcher::{IgnoreMatcher, IgnorePattern};
pub use parser::{parse_lines, strip_comment, PatternLine, Syntax};
