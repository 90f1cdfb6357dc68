//! Resolution protocol for content that cannot be translated with confidence.
//!
//! Each ambiguous unit (a single line or a whole block) is put to a
//! [`Prompter`] with six choices. Two of the choices are sticky: once the
//! user picks "skip all" or "comment all", every later unit in the run gets
//! the same treatment without a question.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::error::MigrateError;

// ---------------------------------------------------------------------------
// Question/answer channel
// ---------------------------------------------------------------------------

/// Line-based question/answer channel.
///
/// `ask` shows the question and blocks until one line of answer is
/// available. End of input counts as an empty answer.
pub trait Prompter {
    /// Pose a question and return the raw answer line.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the channel cannot be read or written.
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        (**self).ask(question)
    }
}

/// Prompter over a reader/writer pair, normally stdin and stdout.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    /// Create a prompter reading answers from `input` and writing questions
    /// to `output`.
    pub fn new(input: R, output: W) -> Self {
        TerminalPrompter { input, output }
    }
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter on the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        TerminalPrompter::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.output.write_all(question.as_bytes())?;
        self.output.flush()?;
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer.trim_end_matches(['\n', '\r']).to_string())
    }
}

/// Prompter that replays canned answers, for tests and scripted runs.
///
/// Once the script runs out every question gets an empty answer (the
/// default choice). Questions are recorded for inspection.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    questions: Vec<String>,
}

impl ScriptedPrompter {
    /// Create a prompter that answers with `answers`, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use zsh2fish::resolve::{Prompter, ScriptedPrompter};
    /// let mut p = ScriptedPrompter::new(["3"]);
    /// assert_eq!(p.ask("?").unwrap(), "3");
    /// assert_eq!(p.ask("?").unwrap(), "");
    /// assert_eq!(p.questions().len(), 2);
    /// ```
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompter {
            answers: answers.into_iter().map(Into::into).collect(),
            questions: Vec::new(),
        }
    }

    /// Every question asked so far.
    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Units and outcomes
// ---------------------------------------------------------------------------

/// Shape of an ambiguous unit; decides the wording and the markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// A single line.
    Line,
    /// A multi-line block.
    Block,
}

impl UnitKind {
    fn markers(self) -> (&'static str, &'static str) {
        match self {
            UnitKind::Line => ("# [UNHANDLED]", "# [/UNHANDLED]"),
            UnitKind::Block => ("# [UNHANDLED BLOCK]", "# [/UNHANDLED BLOCK]"),
        }
    }

    fn noun(self) -> &'static str {
        match self {
            UnitKind::Line => "line",
            UnitKind::Block => "block",
        }
    }
}

/// Wrap text in the unhandled markers for its kind.
///
/// # Examples
///
/// ```
/// use zsh2fish::resolve::{wrap_unhandled, UnitKind};
/// assert_eq!(wrap_unhandled(UnitKind::Line, "setopt x"), "# [UNHANDLED]\nsetopt x\n# [/UNHANDLED]");
/// ```
#[must_use]
pub fn wrap_unhandled(kind: UnitKind, text: &str) -> String {
    let (start, end) = kind.markers();
    format!("{start}\n{text}\n{end}")
}

/// How one ambiguous unit was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Left out of the output; reported as skipped.
    Dropped,
    /// Copied into the output unchanged; also reported as skipped.
    KeptVerbatim(String),
    /// Left out of the output; reported as unhandled, wrapped in markers.
    MarkedUnhandled(String),
    /// Replaced by text the user typed.
    UserRewrite(String),
}

/// Sticky choices for the rest of a run. Flags only ever go from `false`
/// to `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionModifiers {
    skip_all: bool,
    comment_all: bool,
}

impl SessionModifiers {
    /// Both flags clear.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Is "skip all" in effect?
    #[must_use]
    pub fn skip_all(&self) -> bool {
        self.skip_all
    }

    /// Is "comment all" in effect?
    #[must_use]
    pub fn comment_all(&self) -> bool {
        self.comment_all
    }

    /// Turn on "skip all" for the rest of the run.
    pub fn set_skip_all(&mut self) {
        self.skip_all = true;
    }

    /// Turn on "comment all" for the rest of the run.
    pub fn set_comment_all(&mut self) {
        self.comment_all = true;
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Runs the decision sequence for ambiguous units over a [`Prompter`].
pub struct Resolver<P> {
    prompter: P,
    modifiers: SessionModifiers,
}

impl<P: Prompter> Resolver<P> {
    /// Create a resolver with the given channel and starting modifiers.
    pub fn new(prompter: P, modifiers: SessionModifiers) -> Self {
        Resolver {
            prompter,
            modifiers,
        }
    }

    /// Current sticky modifiers.
    #[must_use]
    pub fn modifiers(&self) -> SessionModifiers {
        self.modifiers
    }

    /// The underlying channel.
    #[must_use]
    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Decide the fate of one unit.
    ///
    /// Sticky modifiers are consulted first ("skip all" before "comment
    /// all"); otherwise the user is asked.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Prompt`] if the channel fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use zsh2fish::resolve::{Resolution, Resolver, ScriptedPrompter, SessionModifiers, UnitKind};
    /// let mut r = Resolver::new(ScriptedPrompter::new(["2"]), SessionModifiers::new());
    /// assert_eq!(r.resolve(UnitKind::Line, "echo a").unwrap(), Resolution::Dropped);
    /// assert_eq!(r.resolve(UnitKind::Line, "echo b").unwrap(), Resolution::Dropped);
    /// assert_eq!(r.prompter().questions().len(), 1);
    /// ```
    pub fn resolve(&mut self, kind: UnitKind, text: &str) -> Result<Resolution, MigrateError> {
        if self.modifiers.skip_all {
            debug!(kind = kind.noun(), "skip all in effect");
            return Ok(Resolution::Dropped);
        }
        if self.modifiers.comment_all {
            debug!(kind = kind.noun(), "comment all in effect");
            return Ok(Resolution::MarkedUnhandled(wrap_unhandled(kind, text)));
        }

        let answer = self
            .prompter
            .ask(&menu(kind, text))
            .map_err(MigrateError::Prompt)?;
        let resolution = match answer.trim() {
            "2" => {
                self.modifiers.set_skip_all();
                Resolution::Dropped
            }
            "3" => Resolution::MarkedUnhandled(wrap_unhandled(kind, text)),
            "4" => {
                self.modifiers.set_comment_all();
                Resolution::MarkedUnhandled(wrap_unhandled(kind, text))
            }
            "5" => {
                let question = match kind {
                    UnitKind::Line => "Type your replacement fish syntax (empty to skip):\n> ",
                    UnitKind::Block => {
                        "Type your replacement fish syntax for the entire block (empty to skip):\n> "
                    }
                };
                let replacement = self
                    .prompter
                    .ask(question)
                    .map_err(MigrateError::Prompt)?;
                let replacement = replacement.trim();
                if replacement.is_empty() {
                    Resolution::Dropped
                } else {
                    Resolution::UserRewrite(replacement.to_string())
                }
            }
            "6" => Resolution::KeptVerbatim(text.to_string()),
            // "", "1" and anything unrecognized
            _ => Resolution::Dropped,
        };
        debug!(kind = kind.noun(), answer = answer.trim(), ?resolution, "resolved");
        Ok(resolution)
    }
}

fn menu(kind: UnitKind, text: &str) -> String {
    let (marker, _) = kind.markers();
    let noun = kind.noun();
    let header = match kind {
        UnitKind::Line => format!("Cannot confidently migrate: \"{}\".", text.trim()),
        UnitKind::Block => format!("Cannot confidently migrate this block:\n{text}"),
    };
    format!(
        "{header}\nWhat do you want to do?\n\
         [1] Skip (default, press Enter)\n\
         [2] Skip All\n\
         [3] Comment as {marker}\n\
         [4] Comment All as {marker}\n\
         [5] Manually rewrite\n\
         [6] Keep this {noun} as is\n\
         > "
    )
}
