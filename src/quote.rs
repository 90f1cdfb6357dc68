//! Value normalization for fish.
//!
//! zsh right-hand sides arrive quoted in whatever style the user wrote.
//! fish only needs quotes when the value would otherwise be split or
//! interpreted, so redundant quotes are dropped and the rest is re-quoted
//! in one canonical double-quoted form.

use std::borrow::Cow;

/// Strip one layer of matching surrounding quotes (`'...'` or `"..."`).
///
/// Returns the inner text and the quote character that was removed.
///
/// # Examples
///
/// ```
/// use zsh2fish::quote::strip_quotes;
/// assert_eq!(strip_quotes("'ls -la'"), ("ls -la", Some('\'')));
/// assert_eq!(strip_quotes("'mixed\""), ("'mixed\"", None));
/// ```
#[must_use]
pub fn strip_quotes(raw: &str) -> (&str, Option<char>) {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if matches!(first, b'\'' | b'"') && bytes[bytes.len() - 1] == first {
            return (&raw[1..raw.len() - 1], Some(first as char));
        }
    }
    (raw, None)
}

/// Characters that force a value into quotes in fish.
fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value.chars().any(|c| {
            c.is_whitespace()
                || matches!(
                    c,
                    '\'' | '"' | ';' | '|' | '&' | '!' | '<' | '>' | '(' | ')' | '[' | ']' | '{'
                        | '}' | '#'
                )
        })
}

/// Normalize a raw right-hand-side value for fish.
///
/// Strips one layer of matching quotes; if what remains is empty or holds a
/// character fish would treat specially it is wrapped in double quotes,
/// otherwise it is returned bare. Content that was already double-quoted is
/// kept in its escaped form, so the function is idempotent.
///
/// Returns `Cow::Borrowed` when no quoting is needed.
///
/// # Examples
///
/// ```
/// use zsh2fish::quote::normalize;
/// assert_eq!(normalize("abc123"), "abc123");
/// assert_eq!(normalize("'hello world'"), "\"hello world\"");
/// assert_eq!(normalize(""), "\"\"");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> Cow<'_, str> {
    let (value, quote) = strip_quotes(raw);
    if !needs_quotes(value) {
        return Cow::Borrowed(value);
    }
    if quote == Some('"') {
        return Cow::Owned(format!("\"{value}\""));
    }
    let mut result = String::with_capacity(value.len() + 2);
    result.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            result.push('\\');
        }
        result.push(c);
    }
    result.push('"');
    Cow::Owned(result)
}
