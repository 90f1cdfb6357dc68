//! Line scanner: partitions the input into single lines and multi-line blocks.
//!
//! The scanner owns the cursor. Blank lines and comments are skipped, block
//! openers are consumed whole, and every other line is handed out with its
//! classification. No line is ever handed out twice.

use tracing::{debug, warn};

use crate::classify::{Construct, SourceLine, block_opener, classify};
use crate::patterns::{self, ELIF, FI, IF_START, INLINE_FI, SOURCE};
use crate::quote::strip_quotes;

/// A multi-line construct captured whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    /// `NAME=(` … `)`. Never translated.
    Array {
        /// Header, elements and closing parenthesis.
        lines: Vec<SourceLine<'a>>,
    },
    /// `if` … `fi`, nested conditionals included.
    Conditional {
        /// Every line from the opening `if` to the matching `fi`.
        lines: Vec<SourceLine<'a>>,
        /// Set when a line matches the complex catalog or sources a
        /// zsh-only file; the block must then be resolved as one unit.
        untranslatable: bool,
    },
    /// `name() {` … `}`.
    Function {
        /// Function name from the header.
        name: &'a str,
        /// Raw body lines between the header and the closing brace.
        body: Vec<SourceLine<'a>>,
        /// False when the input ended before the closing brace.
        terminated: bool,
    },
}

impl Block<'_> {
    /// Number of input lines the block consumed.
    #[must_use]
    pub fn line_count(&self) -> usize {
        match self {
            Block::Array { lines } | Block::Conditional { lines, .. } => lines.len(),
            Block::Function { body, terminated, .. } => body.len() + 1 + usize::from(*terminated),
        }
    }

    /// Original text of the block, lines joined by `\n`.
    ///
    /// Arrays and conditionals are returned whole. A function keeps no
    /// header or closing brace, so its text is the raw body only.
    #[must_use]
    pub fn text(&self) -> String {
        let lines = match self {
            Block::Array { lines } | Block::Conditional { lines, .. } => lines,
            Block::Function { body, .. } => body,
        };
        join(lines)
    }
}

pub(crate) fn join(lines: &[SourceLine<'_>]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.text);
    }
    out
}

/// A block together with the cursor position just past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned<'a> {
    /// The captured block.
    pub block: Block<'a>,
    /// Index of the first line after the block.
    pub next: usize,
}

/// Consume an array-literal block starting at `start`.
///
/// Lines are taken verbatim, without classification, up to and including
/// the first line whose trimmed text is `)`.
#[must_use]
pub fn scan_array<'a>(lines: &[SourceLine<'a>], start: usize) -> Scanned<'a> {
    debug!(line = start + 1, header = lines[start].text, "array literal opened");
    let mut block = vec![lines[start]];
    let mut i = start + 1;
    while i < lines.len() {
        let line = lines[i];
        block.push(line);
        i += 1;
        if line.text.trim() == ")" {
            break;
        }
    }
    Scanned {
        block: Block::Array { lines: block },
        next: i,
    }
}

/// Consume a conditional block starting at `start`.
///
/// A nesting counter starts at 1; nested `if` lines raise it, `fi` lowers
/// it, and the block ends when it reaches 0. `elif` continues the current
/// level. A one-line `if ...; fi` closes on its own line.
#[must_use]
pub fn scan_conditional<'a>(lines: &[SourceLine<'a>], start: usize) -> Scanned<'a> {
    let mut block = vec![lines[start]];
    let mut i = start + 1;

    if !INLINE_FI.is_match(lines[start].text.trim()) {
        let mut depth = 1usize;
        while i < lines.len() {
            let line = lines[i];
            let t = line.text.trim();
            block.push(line);
            i += 1;
            if IF_START.is_match(t) && !INLINE_FI.is_match(t) {
                depth += 1;
            } else if FI.is_match(t) {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            } else if ELIF.is_match(t) {
                debug!(line = line.index + 1, depth, "elif");
            }
        }
        if depth > 0 {
            warn!(line = start + 1, "conditional block runs to end of input");
        }
    }

    let untranslatable = block.iter().any(|l| is_untranslatable(l.text));
    debug!(
        line = start + 1,
        lines = block.len(),
        untranslatable,
        "conditional block"
    );
    Scanned {
        block: Block::Conditional {
            lines: block,
            untranslatable,
        },
        next: i,
    }
}

/// Consume a function block whose header is at `start`.
///
/// Body lines are kept raw up to the first line whose trimmed text starts
/// with `}`.
#[must_use]
pub fn scan_function<'a>(lines: &[SourceLine<'a>], start: usize, name: &'a str) -> Scanned<'a> {
    let mut body = Vec::new();
    let mut i = start + 1;
    let mut terminated = false;
    while i < lines.len() {
        let line = lines[i];
        i += 1;
        if line.text.trim_start().starts_with('}') {
            terminated = true;
            break;
        }
        body.push(line);
    }
    if !terminated {
        warn!(line = start + 1, name, "function has no closing brace; closing at end of input");
    }
    debug!(line = start + 1, name, lines = body.len(), "function block");
    Scanned {
        block: Block::Function {
            name,
            body,
            terminated,
        },
        next: i,
    }
}

/// Would this line stop a conditional block from being translated line by
/// line?
fn is_untranslatable(line: &str) -> bool {
    let t = line.trim();
    if patterns::is_complex(t) {
        return true;
    }
    SOURCE
        .captures(t)
        .and_then(|c| c.get(1))
        .is_some_and(|m| patterns::is_foreign_source(strip_quotes(m.as_str()).0))
}

/// One step of the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit<'a> {
    /// A single classified line.
    Line(SourceLine<'a>, Construct<'a>),
    /// A block consumed whole.
    Block(Block<'a>),
}

/// Cursor over the input lines.
///
/// # Examples
///
/// ```
/// use zsh2fish::scanner::{Scanner, Unit};
/// let units: Vec<_> = Scanner::new("# c\nalias a=b\nf() {\n  x\n}\n").collect();
/// assert_eq!(units.len(), 2);
/// assert!(matches!(units[1], Unit::Block(_)));
/// ```
pub struct Scanner<'a> {
    lines: Vec<SourceLine<'a>>,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over the given input text.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Scanner {
            lines: SourceLine::split(input),
            pos: 0,
        }
    }

    /// Current cursor position (index of the next unread line).
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Unit<'a>;

    fn next(&mut self) -> Option<Unit<'a>> {
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            let Some(construct) = block_opener(line.text).or_else(|| classify(line.text)) else {
                self.pos += 1;
                continue;
            };
            let scanned = match construct {
                Construct::ArrayStart => scan_array(&self.lines, self.pos),
                Construct::ConditionalStart => scan_conditional(&self.lines, self.pos),
                Construct::FunctionStart { name } => scan_function(&self.lines, self.pos, name),
                _ => {
                    self.pos += 1;
                    return Some(Unit::Line(line, construct));
                }
            };
            self.pos = scanned.next;
            return Some(Unit::Block(scanned.block));
        }
        None
    }
}
