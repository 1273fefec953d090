//! Line-level parsing of `.hgignore` files.
//!
//! ```text
//! syntax: regexp   # following lines are unanchored regexps
//! syntax: glob     # following lines are relative globs (the default)
//! pattern          # a pattern in the current syntax
//! ```
//!
//! Lines are trimmed and blank lines skipped. `#` starts a comment unless it
//! is escaped as `\#`.

use std::path::Path;

use crate::error::{IgnoreError, IgnoreResult};

/// Pattern syntax selected by a `syntax:` directive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Syntax {
    #[default]
    Glob,
    Regexp,
}

impl Syntax {
    /// Parse the argument of a `syntax:` directive.
    pub fn from_directive(name: &str) -> Option<Self> {
        match name {
            "glob" => Some(Self::Glob),
            "regexp" | "regex" | "re" => Some(Self::Regexp),
            _ => None,
        }
    }
}

/// A pattern line before compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternLine {
    pub syntax: Syntax,
    /// Pattern text with comments stripped and escapes resolved.
    pub pattern: String,
    /// 1-based line number in the source file.
    pub line: usize,
    /// The trimmed source line.
    pub original: String,
}

/// Split ignore-file content into pattern lines.
///
/// `file` is only used to give errors a location.
pub fn parse_lines(content: &str, file: &Path) -> IgnoreResult<Vec<PatternLine>> {
    let mut syntax = Syntax::default();
    let mut out = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let original = raw.trim();
        if original.is_empty() {
            continue;
        }

        let text = strip_comment(original);
        if text.is_empty() {
            continue;
        }

        if let Some(arg) = text.strip_prefix("syntax:") {
            let arg = arg.trim();
            if arg.is_empty() {
                continue;
            }
            syntax = Syntax::from_directive(arg).ok_or_else(|| IgnoreError::InvalidSyntaxDirective {
                file: file.to_path_buf(),
                line,
                syntax: arg.to_string(),
            })?;
            continue;
        }

        out.push(PatternLine {
            syntax,
            pattern: text,
            line,
            original: original.to_string(),
        });
    }

    Ok(out)
}

/// Remove an unescaped `#` and the rest of the line, then unescape `\#`.
///
/// A `#` is escaped when preceded by an odd number of backslashes.
pub fn strip_comment(line: &str) -> String {
    let mut backslashes = 0usize;
    let mut cut = line.len();
    for (i, c) in line.char_indices() {
        match c {
            '\\' => backslashes += 1,
            '#' if backslashes % 2 == 0 => {
                cut = i;
                break;
            }
            _ => backslashes = 0,
        }
    }
    line[..cut].trim().replace("\\#", "#")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> IgnoreResult<Vec<PatternLine>> {
        parse_lines(content, Path::new(".hgignore"))
    }

    #[test]
    fn strip_comment_cases() {
        assert_eq!(strip_comment("foo # comment"), "foo");
        assert_eq!(strip_comment("foo#bar"), "foo");
        assert_eq!(strip_comment("# whole line"), "");
        assert_eq!(strip_comment(r"a\#b"), "a#b");
        assert_eq!(strip_comment(r"a\\#b"), r"a\\");
        assert_eq!(strip_comment(r"a\\\#b # c"), r"a\\#b");
        assert_eq!(strip_comment("plain"), "plain");
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let lines = parse("\n   \n# header\n*.o\n").unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].pattern, "*.o");
        assert_eq!(lines[0].line, 4);
        assert_eq!(lines[0].syntax, Syntax::Glob);
    }

    #[test]
    fn syntax_switch_carries_forward() {
        let lines = parse("a\nsyntax: regexp\n^b$\nc.*\nsyntax: glob\nd\n").unwrap();
        let got: Vec<(Syntax, &str)> = lines.iter().map(|l| (l.syntax, l.pattern.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (Syntax::Glob, "a"),
                (Syntax::Regexp, "^b$"),
                (Syntax::Regexp, "c.*"),
                (Syntax::Glob, "d"),
            ]
        );
    }

    #[test]
    fn regex_aliases_are_accepted() {
        for alias in ["regex", "regexp", "re"] {
            let lines = parse(&format!("syntax: {alias}\nx\n")).unwrap();
            assert_eq!(lines[0].syntax, Syntax::Regexp);
        }
    }

    #[test]
    fn empty_syntax_directive_is_ignored() {
        let lines = parse("syntax:\nx\n").unwrap();
        assert_eq!(lines[0].syntax, Syntax::Glob);
    }

    #[test]
    fn unknown_syntax_is_an_error() {
        let err = parse("*.o\nsyntax: rootglob\n").unwrap_err();
        match err {
            IgnoreError::InvalidSyntaxDirective { line, syntax, .. } => {
                assert_eq!(line, 2);
                assert_eq!(syntax, "rootglob");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn original_keeps_comment() {
        let lines = parse("  build/  # output\n").unwrap();
        assert_eq!(lines[0].pattern, "build/");
        assert_eq!(lines[0].original, "build/  # output");
    }
}
