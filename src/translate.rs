//! zsh constructs to fish fragments, each bound for an output section.

use std::fmt;

use crate::classify::{Construct, SourceLine, classify};
use crate::patterns::{self, ELIF, FI, INLINE_FI, STRUCTURAL};
use crate::quote::{normalize, strip_quotes};
use crate::scanner::Block;

/// Indent applied to every function body line.
pub const FUNCTION_INDENT: &str = "    ";

// ---------------------------------------------------------------------------
// Output model
// ---------------------------------------------------------------------------

/// Destination section of a translated fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// `alias` declarations.
    Aliases,
    /// `set -gx` statements.
    EnvironmentVariables,
    /// `function` … `end` definitions.
    Functions,
    /// `source` statements.
    Inclusions,
    /// Content the user resolved by hand (rewritten or kept as is).
    Unresolved,
}

impl Section {
    /// Sections in document order.
    pub const ALL: [Section; 5] = [
        Section::Aliases,
        Section::EnvironmentVariables,
        Section::Functions,
        Section::Inclusions,
        Section::Unresolved,
    ];

    /// Header comment text for the section.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Section::Aliases => "Aliases",
            Section::EnvironmentVariables => "Environment Variables",
            Section::Functions => "Functions",
            Section::Inclusions => "Sources",
            Section::Unresolved => "User-Migrated",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One piece of fish text bound for a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Destination section.
    pub section: Section,
    /// fish source, possibly spanning several lines.
    pub text: String,
}

impl Fragment {
    fn new(section: Section, text: String) -> Self {
        Fragment { section, text }
    }
}

/// What became of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Translated.
    Fragment(Fragment),
    /// Known to have no fish equivalent; reported verbatim.
    Unhandled,
    /// Not understood; a decision is needed.
    Ambiguous,
    /// Structural only (block markers); produces nothing.
    Nothing,
}

/// What became of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockTranslation {
    /// Translated line by line (or whole, for functions).
    Translated {
        /// Fragments in input order.
        fragments: Vec<Fragment>,
        /// Inner lines that had no translation, reported verbatim.
        unhandled: Vec<String>,
    },
    /// The whole block is reported verbatim.
    Unhandled(String),
    /// The whole block needs a decision.
    Ambiguous(String),
}

// ---------------------------------------------------------------------------
// Single lines
// ---------------------------------------------------------------------------

/// Translate one classified line.
///
/// # Examples
///
/// ```
/// use zsh2fish::classify::classify;
/// use zsh2fish::translate::{translate_construct, Section, Translation};
/// let Translation::Fragment(f) = translate_construct(&classify("export EDITOR=vim").unwrap()) else {
///     panic!("not translated");
/// };
/// assert_eq!(f.section, Section::EnvironmentVariables);
/// assert_eq!(f.text, "set -gx EDITOR vim");
/// ```
#[must_use]
pub fn translate_construct(construct: &Construct<'_>) -> Translation {
    match *construct {
        Construct::Alias { name, value } => Translation::Fragment(Fragment::new(
            Section::Aliases,
            format!("alias {name}={}", normalize(value)),
        )),
        Construct::ExportedVar { name, value } | Construct::BareAssignment { name, value } => {
            Translation::Fragment(Fragment::new(
                Section::EnvironmentVariables,
                format!("set -gx {name} {}", normalize(value)),
            ))
        }
        Construct::Inclusion { path } => {
            if patterns::is_foreign_source(strip_quotes(path).0) {
                Translation::Unhandled
            } else {
                Translation::Fragment(Fragment::new(
                    Section::Inclusions,
                    format!("source {}", normalize(path)),
                ))
            }
        }
        Construct::ConditionalStart => Translation::Nothing,
        Construct::Complex | Construct::FunctionStart { .. } | Construct::ArrayStart => {
            Translation::Unhandled
        }
        Construct::Unrecognized => Translation::Ambiguous,
    }
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// Translate a captured block.
///
/// Arrays are always reported verbatim. Functions always translate whole.
/// A conditional translates line by line unless it holds untranslatable
/// content or is written on a single line, in which case the whole block
/// needs a decision.
#[must_use]
pub fn translate_block(block: &Block<'_>) -> BlockTranslation {
    match block {
        Block::Array { .. } => BlockTranslation::Unhandled(block.text()),
        Block::Function { name, body, .. } => BlockTranslation::Translated {
            fragments: vec![translate_function(name, body)],
            unhandled: Vec::new(),
        },
        Block::Conditional {
            lines,
            untranslatable,
        } => {
            if *untranslatable || lines.len() == 1 {
                BlockTranslation::Ambiguous(block.text())
            } else {
                translate_conditional(lines)
            }
        }
    }
}

/// `name() { body }` → `function name` / indented body / `end`.
///
/// The body stays in zsh syntax; only the wrapper changes.
#[must_use]
pub fn translate_function(name: &str, body: &[SourceLine<'_>]) -> Fragment {
    let mut out = format!("function {name}\n");
    for line in body {
        if !line.text.trim().is_empty() {
            out.push_str(FUNCTION_INDENT);
            out.push_str(line.text);
        }
        out.push('\n');
    }
    out.push_str("end");
    Fragment::new(Section::Functions, out)
}

fn translate_conditional(lines: &[SourceLine<'_>]) -> BlockTranslation {
    let mut fragments = Vec::new();
    let mut unhandled = Vec::new();
    for line in lines {
        let t = line.text.trim();
        if FI.is_match(t) || ELIF.is_match(t) || STRUCTURAL.is_match(t) {
            continue;
        }
        // a nested one-line conditional cannot be split into its parts
        if INLINE_FI.is_match(t) {
            unhandled.push(line.text.to_string());
            continue;
        }
        let Some(construct) = classify(t) else {
            continue;
        };
        match translate_construct(&construct) {
            Translation::Fragment(f) => fragments.push(f),
            Translation::Unhandled | Translation::Ambiguous => unhandled.push(line.text.to_string()),
            Translation::Nothing => {}
        }
    }
    BlockTranslation::Translated {
        fragments,
        unhandled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;
    use crate::scanner::Unit;

    fn t(line: &str) -> Translation {
        translate_construct(&classify(line).unwrap())
    }

    fn frag(line: &str) -> String {
        match t(line) {
            Translation::Fragment(f) => f.text,
            other => panic!("{line:?} not translated: {other:?}"),
        }
    }

    fn block(input: &str) -> BlockTranslation {
        match Scanner::new(input).next() {
            Some(Unit::Block(b)) => translate_block(&b),
            other => panic!("not a block: {other:?}"),
        }
    }

    #[test]
    fn alias() {
        assert_eq!(frag("alias ll='ls -la'"), "alias ll=\"ls -la\"");
        assert_eq!(frag("alias vim=nvim"), "alias vim=nvim");
        assert_eq!(frag("alias g='git'"), "alias g=git");
    }

    #[test]
    fn export_and_assignment_identical() {
        for (a, b) in [
            ("export EDITOR=vim", "EDITOR=vim"),
            ("export GREETING='hello world'", "GREETING='hello world'"),
            ("export P=\"$HOME/bin\"", "P=\"$HOME/bin\""),
        ] {
            assert_eq!(frag(a), frag(b));
        }
        assert_eq!(frag("EDITOR=vim"), "set -gx EDITOR vim");
    }

    #[test]
    fn inclusion() {
        assert_eq!(frag("source ~/.aliases"), "source ~/.aliases");
        assert_eq!(frag(". '/opt/my env/init'"), "source \"/opt/my env/init\"");
        assert_eq!(frag("source ~/.x # local overrides"), "source ~/.x");
        assert_eq!(t("source \"$ZSH/oh-my-zsh.sh\""), Translation::Unhandled);
        assert_eq!(t(". ~/gitstatus/gitstatus.prompt.sh"), Translation::Unhandled);
    }

    #[test]
    fn complex_and_unknown() {
        assert_eq!(t("setopt autocd"), Translation::Unhandled);
        assert_eq!(t("echo hello"), Translation::Ambiguous);
        assert_eq!(t("if true; then"), Translation::Nothing);
    }

    #[test]
    fn function() {
        let BlockTranslation::Translated { fragments, unhandled } = block("foo () {\n  echo hi\n}\n")
        else {
            panic!("function not translated");
        };
        assert!(unhandled.is_empty());
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].section, Section::Functions);
        assert_eq!(fragments[0].text, "function foo\n      echo hi\nend");
    }

    #[test]
    fn function_blank_lines_not_indented() {
        let BlockTranslation::Translated { fragments, .. } = block("f() {\n  a\n\n  b\n}") else {
            panic!();
        };
        assert_eq!(fragments[0].text, "function f\n      a\n\n      b\nend");
    }

    #[test]
    fn clean_conditional_translates_inner_lines() {
        let input = "if [[ -d ~/bin ]]; then\n  alias ll='ls -la'\n  export PATH=~/bin:$PATH\nfi";
        let BlockTranslation::Translated { fragments, unhandled } = block(input) else {
            panic!("not translated");
        };
        assert!(unhandled.is_empty());
        let texts: Vec<_> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["alias ll=\"ls -la\"", "set -gx PATH ~/bin:$PATH"]);
    }

    #[test]
    fn conditional_markers_produce_nothing() {
        let input = "if a; then\n  x=1\nelif b; then\n  y=2\nelse\n  z=3\nfi";
        let BlockTranslation::Translated { fragments, unhandled } = block(input) else {
            panic!("not translated");
        };
        assert_eq!(fragments.len(), 3);
        assert!(unhandled.is_empty());
    }

    #[test]
    fn conditional_unknown_inner_line_reported() {
        let input = "if a; then\n  echo hi\n  x=1\nfi";
        let BlockTranslation::Translated { fragments, unhandled } = block(input) else {
            panic!("not translated");
        };
        assert_eq!(fragments.len(), 1);
        assert_eq!(unhandled, vec!["  echo hi".to_string()]);
    }

    #[test]
    fn nested_inline_conditional_reported() {
        let input = "if a; then\n  if b; then x=1; fi\n  y=2\nfi";
        let BlockTranslation::Translated { fragments, unhandled } = block(input) else {
            panic!("not translated");
        };
        assert_eq!(fragments.len(), 1);
        assert_eq!(unhandled, vec!["  if b; then x=1; fi".to_string()]);
    }

    #[test]
    fn complex_conditional_is_ambiguous_whole() {
        let input = "if true; then\n  alias a=b\n  PROMPT='%~ '\nfi";
        assert_eq!(block(input), BlockTranslation::Ambiguous(input.to_string()));
    }

    #[test]
    fn inline_conditional_is_ambiguous() {
        let input = "if [ -f ~/.x ]; then source ~/.x; fi";
        assert_eq!(block(input), BlockTranslation::Ambiguous(input.to_string()));
    }

    #[test]
    fn array_always_unhandled() {
        assert_eq!(
            block("FOO=(\na\nb\n)"),
            BlockTranslation::Unhandled("FOO=(\na\nb\n)".to_string())
        );
    }

    #[test]
    fn section_order_and_titles() {
        let titles: Vec<_> = Section::ALL.iter().map(|s| s.title()).collect();
        assert_eq!(
            titles,
            vec!["Aliases", "Environment Variables", "Functions", "Sources", "User-Migrated"]
        );
        assert_eq!(Section::Functions.to_string(), "Functions");
    }
}
