//! Compare text against an expectation containing wildcards.
//!
//! Supported wildcards:
//!
//! | Wildcard | Matches |
//! |----------|---------|
//! | `%e` | the platform directory separator, `/` on Linux |
//! | `%s` | one or more characters, except end of line |
//! | `%S` | zero or more characters, except end of line |
//! | `%a` | one or more characters, including end of line |
//! | `%A` | zero or more characters, including end of line |
//! | `%w` | zero or more whitespace characters |
//! | `%i` | a signed integer, e.g. `+3142`, `-3142` |
//! | `%d` | an unsigned integer, e.g. `123456` |
//! | `%x` | one or more alphanumeric characters |
//! | `%f` | a floating point number, e.g. `3.142`, `-3.142`, `3.142E-10` |
//! | `%c` | a single character |
//! | `%%` | a literal `%` |
//!
//! ```
//! use utils_wildcards::{assert_matches, matches};
//!
//! assert!(matches("Foo: %s\nCount: %d", "Foo: bar\nCount: 12").unwrap());
//! assert!(assert_matches("%c%c%c", "foo").is_ok());
//! assert!(assert_matches("%c%c%c%c", "bar").is_err());
//! ```

mod diff;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WildcardError {
    #[error("invalid wildcard pattern: {0}")]
    Regex(#[from] regex::Error),

    /// The text does not match. `diff` holds the differing lines of both
    /// sides with whitespace made visible.
    #[error("Diff:\n-----\n{diff}-----\nActual:\n-----\n{actual}\n-----\nExpected:\n-----\n{expected}\n-----\n")]
    Mismatch {
        diff: String,
        actual: String,
        expected: String,
    },
}

/// Converts `pattern` into a regular expression: the text is quoted and
/// every wildcard replaced by its expression. The result is not anchored.
pub fn to_regex(pattern: &str) -> String {
    let quoted = regex::escape(pattern);
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(w) => match wildcard(w) {
                Some(expr) => out.push_str(&expr),
                None => {
                    out.push('%');
                    out.push(w);
                }
            },
            None => out.push('%'),
        }
    }
    out
}

fn wildcard(w: char) -> Option<String> {
    let expr = match w {
        'e' => return Some(regex::escape(std::path::MAIN_SEPARATOR_STR)),
        's' => r".+",
        'S' => r".*",
        'a' => r"(.|\n)+",
        'A' => r"(.|\n)*",
        'w' => r"\s*",
        'i' => r"(\+|\-)\d+",
        'd' => r"\d+",
        'x' => r"[0-9a-zA-Z]+",
        'f' => r"[-+]?[0-9]*\.?[0-9]+([eE][-+]?[0-9]+)?",
        'c' => r".",
        '%' => r"%",
        _ => return None,
    };
    Some(expr.to_string())
}

/// Makes whitespace visible, for diff output. Newlines are kept, a tab
/// becomes `→→→→`, a space `␣`, any other whitespace its escape sequence.
pub fn escape_whitespaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push('\n'),
            '\t' => out.push_str("→→→→"),
            ' ' => out.push('␣'),
            c if c.is_whitespace() => out.extend(c.escape_default()),
            c => out.push(c),
        }
    }
    out
}

/// Whether `actual` matches the `expected` pattern as a whole.
///
/// Both sides are trimmed. In `actual`, non-breaking spaces are read as
/// spaces and carriage returns are dropped.
pub fn matches(expected: &str, actual: &str) -> Result<bool, WildcardError> {
    let (expected, actual) = normalize(expected, actual);
    is_match(expected, &actual)
}

/// Like [`matches`], but a mismatch is an error describing the difference.
pub fn assert_matches(expected: &str, actual: &str) -> Result<(), WildcardError> {
    let (expected, actual) = normalize(expected, actual);
    if is_match(expected, &actual)? {
        return Ok(());
    }
    let diff = diff::unified(&escape_whitespaces(expected), &escape_whitespaces(&actual))?;
    Err(WildcardError::Mismatch {
        diff,
        actual,
        expected: expected.to_string(),
    })
}

fn normalize<'a>(expected: &'a str, actual: &str) -> (&'a str, String) {
    let actual = actual.trim().replace('\u{a0}', " ").replace('\r', "");
    (expected.trim(), actual)
}

pub(crate) fn is_match(expected: &str, actual: &str) -> Result<bool, WildcardError> {
    let re = Regex::new(&format!("^{}$", to_regex(expected)))?;
    Ok(re.is_match(actual))
}
