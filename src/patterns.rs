//! Recognizer patterns for zsh constructs.
//!
//! Every pattern is compiled once on first use. Patterns match against a
//! line with surrounding whitespace already trimmed, except where noted.

use std::sync::LazyLock;

use regex::Regex;

/// Identifier grammar shared by aliases, variables and functions.
const NAME: &str = r"[A-Za-z_][A-Za-z0-9_]*";

fn compile(pattern: &str) -> Regex {
    // Patterns are fixed at compile time; a bad one is a programming error
    // that the test suite catches on first use.
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid built-in pattern {pattern:?}: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Single-line constructs
// ---------------------------------------------------------------------------

/// `alias NAME='value'`, `alias NAME="value"` or `alias NAME=word`, with an
/// optional trailing comment.
pub(crate) static ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"^alias\s+({NAME})=('[^']*'|"[^"]*"|[^\s'"]+)(?:\s+#.*)?$"#
    ))
});

/// `export NAME=value`.
pub(crate) static EXPORT: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"^export\s+({NAME})=(.*)$")));

/// `NAME=value` without a leading keyword.
pub(crate) static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"^({NAME})=(.*)$")));

/// `NAME() {`, `function NAME {` and `function NAME() {`. Nothing but a
/// comment may follow the opening brace.
pub(crate) static FUNCTION_START: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"^(?:function\s+({NAME})\s*(?:\(\s*\))?|({NAME})\s*\(\s*\))\s*\{{\s*(?:#.*)?$"
    ))
});

/// `source PATH` or `. PATH`, with an optional trailing comment. A quoted
/// path may contain `#`.
pub(crate) static SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"^(?:source|\.)\s+('[^']*'|"[^"]*"|.+?)(?:\s+#.*)?$"#)
});

// ---------------------------------------------------------------------------
// Block markers
// ---------------------------------------------------------------------------

pub(crate) static IF_START: LazyLock<Regex> = LazyLock::new(|| compile(r"^if\s"));

pub(crate) static ELIF: LazyLock<Regex> = LazyLock::new(|| compile(r"^elif\s"));

pub(crate) static FI: LazyLock<Regex> = LazyLock::new(|| compile(r"^fi$"));

/// `...; fi` at the end of a line that opened with `if`.
pub(crate) static INLINE_FI: LazyLock<Regex> = LazyLock::new(|| compile(r";\s*fi$"));

/// `else` and `then` carry no translatable content of their own.
pub(crate) static STRUCTURAL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(?:else|then)(?:\s*(?:;|#.*))?$"));

/// `NAME=(` with nothing after the parenthesis.
pub(crate) static ARRAY_START: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"^{NAME}\s*=\s*\($")));

// ---------------------------------------------------------------------------
// Untranslatable signatures
// ---------------------------------------------------------------------------

/// Constructs with no fish equivalent: plugin managers, prompt strings, key
/// bindings, completion and option systems.
static COMPLEX: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^plugins=\(.*\)$",
        r"^ZSH=",
        r"oh-my-zsh",
        r"powerlevel10k",
        r"zsh-syntax-highlighting",
        r"zstyle\s",
        r"^autoload\s+",
        r"^setopt\s+",
        r"^unsetopt\s+",
        r"^bindkey\b",
        r"^compinit\b",
        r"^prezto\s+",
        r"^antigen\s+",
        r"^PROMPT=.+$",
        r"^RPROMPT=.+$",
        r"^source .*\.zsh",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

/// Path fragments that only make sense to zsh.
const FOREIGN_SOURCE_MARKERS: &[&str] = &[
    "oh-my-zsh",
    "zsh-syntax-highlighting",
    "powerlevel10k",
    ".zsh",
    "zsh-theme",
    "gitstatus",
];

/// Does this (trimmed) line match the complex-signature catalog?
#[must_use]
pub fn is_complex(line: &str) -> bool {
    COMPLEX.iter().any(|re| re.is_match(line))
}

/// Is this inclusion path specific to zsh (a plugin manager, a theme, or a
/// `.zsh` file)?
///
/// # Examples
///
/// ```
/// use zsh2fish::patterns::is_foreign_source;
/// assert!(is_foreign_source("~/.oh-my-zsh/oh-my-zsh.sh"));
/// assert!(!is_foreign_source("~/.aliases"));
/// ```
#[must_use]
pub fn is_foreign_source(path: &str) -> bool {
    FOREIGN_SOURCE_MARKERS.iter().any(|m| path.contains(m))
}
