//! Translation of `.hgignore` globs into regular expressions.

/// Translate an extended glob into a regular expression fragment.
///
/// | glob      | regex       |
/// |-----------|-------------|
/// | `**/`     | `(?:.*/)?`  |
/// | `**`      | `.*`        |
/// | `*`       | `[^/]*`     |
/// | `?`       | `[^/]`      |
/// | `[!a-z]`  | `[^a-z]`    |
/// | `{a,b}`   | `(?:a\|b)`  |
/// | `\x`      | literal `x` |
///
/// Everything else is matched literally. The fragment is not anchored; see
/// [`relative_glob_regex`] for the form used by ignore matching.
pub fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let n = chars.len();
    let mut res = String::with_capacity(glob.len() * 2);
    let mut group = 0usize;
    let mut i = 0;

    while i < n {
        let c = chars[i];
        i += 1;
        match c {
            '*' => {
                if i < n && chars[i] == '*' {
                    i += 1;
                    if i < n && chars[i] == '/' {
                        i += 1;
                        res.push_str("(?:.*/)?");
                    } else {
                        res.push_str(".*");
                    }
                } else {
                    res.push_str("[^/]*");
                }
            }
            '?' => res.push_str("[^/]"),
            '[' => {
                let mut j = i;
                if j < n && chars[j] == '!' {
                    j += 1;
                }
                // A `]` right after `[` or `[!` is a class member.
                if j < n && chars[j] == ']' {
                    j += 1;
                }
                while j < n && chars[j] != ']' {
                    j += 1;
                }
                if j >= n {
                    res.push_str(r"\[");
                } else {
                    res.push('[');
                    push_class_body(&mut res, &chars[i..j]);
                    res.push(']');
                    i = j + 1;
                }
            }
            '{' => {
                group += 1;
                res.push_str("(?:");
            }
            '}' if group > 0 => {
                group -= 1;
                res.push(')');
            }
            ',' if group > 0 => res.push('|'),
            '\\' => {
                if i < n {
                    push_literal(&mut res, chars[i]);
                    i += 1;
                } else {
                    push_literal(&mut res, '\\');
                }
            }
            _ => push_literal(&mut res, c),
        }
    }

    res
}

/// Anchor a glob the way ignore files use it: the glob may match any
/// trailing run of path segments, and matching a directory covers
/// everything below it.
pub fn relative_glob_regex(glob: &str) -> String {
    format!("^(?:|.*/){}(?:/|$)", glob_to_regex(glob))
}

fn push_class_body(res: &mut String, body: &[char]) {
    let rest = match body.first() {
        Some('!') => {
            res.push('^');
            &body[1..]
        }
        Some('^') => {
            res.push_str(r"\^");
            &body[1..]
        }
        _ => body,
    };
    for &c in rest {
        match c {
            // `[`, `&&` and `~~` open nested classes or set operations; a
            // leading `]` must not close the class early.
            '\\' | '[' | ']' | '&' | '~' => {
                res.push('\\');
                res.push(c);
            }
            _ => res.push(c),
        }
    }
}

fn push_literal(res: &mut String, c: char) {
    let mut buf = [0u8; 4];
    res.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn matches(glob: &str, path: &str) -> bool {
        Regex::new(&relative_glob_regex(glob)).unwrap().is_match(path)
    }

    #[test]
    fn literal_characters_are_escaped() {
        assert_eq!(glob_to_regex("a.b+c"), r"a\.b\+c");
        assert_eq!(glob_to_regex("(x)"), r"\(x\)");
    }

    #[test]
    fn star_forms() {
        assert_eq!(glob_to_regex("*"), "[^/]*");
        assert_eq!(glob_to_regex("**"), ".*");
        assert_eq!(glob_to_regex("**/x"), "(?:.*/)?x");
    }

    #[test]
    fn question_mark_stays_in_segment() {
        assert_eq!(glob_to_regex("?"), "[^/]");
        assert!(matches("a?c", "abc"));
        assert!(!matches("a?c", "a/c"));
    }

    #[test]
    fn character_classes() {
        assert_eq!(glob_to_regex("[abc]"), "[abc]");
        assert_eq!(glob_to_regex("[!abc]"), "[^abc]");
        assert_eq!(glob_to_regex("[^abc]"), r"[\^abc]");
        assert_eq!(glob_to_regex("[]a]"), r"[\]a]");
        assert_eq!(glob_to_regex(r"[a\b]"), r"[a\\b]");
        assert_eq!(glob_to_regex("[[]"), r"[\[]");
    }

    #[test]
    fn close_bracket_after_negation_is_class_member() {
        assert_eq!(glob_to_regex("[!]a]"), r"[^\]a]");
        assert!(matches("[!]a]x", "bx"));
        assert!(!matches("[!]a]x", "]x"));
        assert!(!matches("[!]a]x", "ax"));
        assert!(matches("[]a]x", "]x"));
        assert_eq!(glob_to_regex("[]]"), r"[\]]");
    }

    #[test]
    fn bare_negated_close_bracket_is_literal() {
        assert_eq!(glob_to_regex("[!]"), r"\[!\]");
        assert!(matches("[!]", "[!]"));
        assert!(!matches("[!]", "a"));
    }

    #[test]
    fn unterminated_bracket_is_literal() {
        assert_eq!(glob_to_regex("[abc"), r"\[abc");
        assert!(matches("[abc", "[abc"));
    }

    #[test]
    fn braces_become_alternation() {
        assert_eq!(glob_to_regex("{a,b}"), "(?:a|b)");
        assert_eq!(glob_to_regex("{a,{b,c}}"), "(?:a|(?:b|c))");
        assert!(matches("*.{o,so}", "lib.so"));
        assert!(!matches("*.{o,so}", "lib.a"));
    }

    #[test]
    fn braces_outside_group_are_literal() {
        assert_eq!(glob_to_regex("a,b}"), r"a,b\}");
    }

    #[test]
    fn backslash_escapes() {
        assert_eq!(glob_to_regex(r"\*"), r"\*");
        assert_eq!(glob_to_regex(r"a\"), r"a\\");
        assert!(matches(r"\*.txt", "*.txt"));
        assert!(!matches(r"\*.txt", "a.txt"));
    }

    #[test]
    fn star_does_not_cross_segment() {
        assert!(matches("*.log", "debug.log"));
        assert!(!matches("*.log", "debug.log.bak"));
        assert!(matches("*.log", "logs/debug.log"));
    }

    #[test]
    fn double_star_slash_matches_zero_or_more_segments() {
        assert!(matches("**/build", "build"));
        assert!(matches("**/build", "a/b/build"));
        assert!(!matches("**/build", "rebuild"));
    }

    #[test]
    fn directory_match_covers_children() {
        assert!(matches("target", "target/debug/app"));
        assert!(matches("src/gen", "src/gen/out.rs"));
        assert!(!matches("target", "targets"));
    }
}
