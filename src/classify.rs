//! Single-line classification.
//!
//! Every input line is matched against the pattern catalog in a fixed
//! order. The first match wins; a line matching nothing is
//! [`Construct::Unrecognized`] and is left to the resolution protocol.

use crate::patterns::{
    self, ALIAS, ARRAY_START, ASSIGNMENT, EXPORT, FUNCTION_START, IF_START, SOURCE,
};

/// One line of the input together with its 0-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// Position in the input, counting from 0.
    pub index: usize,
    /// The line text, without its terminator.
    pub text: &'a str,
}

impl<'a> SourceLine<'a> {
    /// Split input text into lines. A trailing `\r` is dropped from each line.
    ///
    /// # Examples
    ///
    /// ```
    /// use zsh2fish::classify::SourceLine;
    /// let lines = SourceLine::split("a\r\nb\n");
    /// assert_eq!(lines.len(), 3);
    /// assert_eq!(lines[0].text, "a");
    /// assert_eq!(lines[2].text, "");
    /// ```
    #[must_use]
    pub fn split(input: &'a str) -> Vec<SourceLine<'a>> {
        input
            .split('\n')
            .enumerate()
            .map(|(index, text)| SourceLine {
                index,
                text: text.strip_suffix('\r').unwrap_or(text),
            })
            .collect()
    }
}

/// What a single line is, with the fields extracted from it.
///
/// Values and paths are kept as written, quotes included; the normalizer
/// strips the quote layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct<'a> {
    /// `alias name=value`
    Alias {
        /// Alias name.
        name: &'a str,
        /// Raw right-hand side.
        value: &'a str,
    },
    /// `export NAME=value`
    ExportedVar {
        /// Variable name.
        name: &'a str,
        /// Raw right-hand side.
        value: &'a str,
    },
    /// `NAME=value`
    BareAssignment {
        /// Variable name.
        name: &'a str,
        /// Raw right-hand side.
        value: &'a str,
    },
    /// Header of a function block.
    FunctionStart {
        /// Function name.
        name: &'a str,
    },
    /// `source path` / `. path`
    Inclusion {
        /// Raw path argument.
        path: &'a str,
    },
    /// Opening line of an `if` block.
    ConditionalStart,
    /// Opening line of a multi-line array literal.
    ArrayStart,
    /// Matches the complex-signature catalog.
    Complex,
    /// Matches nothing.
    Unrecognized,
}

/// Classify one line.
///
/// Returns `None` for blank lines and full-line comments. Surrounding
/// whitespace is ignored, so indented lines inside blocks classify the same
/// as top-level ones.
///
/// # Examples
///
/// ```
/// use zsh2fish::classify::{classify, Construct};
/// assert_eq!(
///     classify("alias ll='ls -la'"),
///     Some(Construct::Alias { name: "ll", value: "'ls -la'" }),
/// );
/// assert_eq!(classify("   # comment"), None);
/// assert_eq!(classify("my-var=1"), Some(Construct::Unrecognized));
/// ```
#[must_use]
pub fn classify(line: &str) -> Option<Construct<'_>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    if ARRAY_START.is_match(line) {
        return Some(Construct::ArrayStart);
    }
    if patterns::is_complex(line) {
        return Some(Construct::Complex);
    }
    if let Some(c) = ALIAS.captures(line) {
        return Some(Construct::Alias {
            name: group(&c, 1),
            value: group(&c, 2),
        });
    }
    if let Some(c) = EXPORT.captures(line) {
        return Some(Construct::ExportedVar {
            name: group(&c, 1),
            value: group(&c, 2).trim(),
        });
    }
    if let Some(c) = ASSIGNMENT.captures(line) {
        return Some(Construct::BareAssignment {
            name: group(&c, 1),
            value: group(&c, 2).trim(),
        });
    }
    if let Some(c) = SOURCE.captures(line) {
        return Some(Construct::Inclusion {
            path: group(&c, 1),
        });
    }
    Some(block_opener(line).unwrap_or(Construct::Unrecognized))
}

/// Recognize the opening line of a multi-line block, ignoring the
/// complex-signature catalog.
///
/// The scanner tries this before [`classify`]: a conditional whose `if`
/// line mentions a zsh-only construct is still one block.
///
/// # Examples
///
/// ```
/// use zsh2fish::classify::{block_opener, Construct};
/// assert_eq!(
///     block_opener("if [ -d \"$HOME/.oh-my-zsh\" ]; then"),
///     Some(Construct::ConditionalStart),
/// );
/// assert_eq!(block_opener("alias a=b"), None);
/// ```
#[must_use]
pub fn block_opener(line: &str) -> Option<Construct<'_>> {
    let line = line.trim();
    if ARRAY_START.is_match(line) {
        return Some(Construct::ArrayStart);
    }
    if let Some(c) = FUNCTION_START.captures(line) {
        let name = c.get(1).or_else(|| c.get(2)).map_or("", |m| m.as_str());
        return Some(Construct::FunctionStart { name });
    }
    if IF_START.is_match(line) {
        return Some(Construct::ConditionalStart);
    }
    None
}

fn group<'a>(caps: &regex::Captures<'a>, i: usize) -> &'a str {
    caps.get(i).map_or("", |m| m.as_str())
}
