//! Run orchestration: scan, translate, resolve, and assemble the document.

use std::fmt::Write as _;
use std::io::{self, Write};

use tracing::{debug, info};

use crate::error::MigrateError;
use crate::resolve::{Prompter, Resolution, Resolver, SessionModifiers, UnitKind};
use crate::scanner::{Scanner, Unit};
use crate::translate::{
    BlockTranslation, Fragment, Section, Translation, translate_block, translate_construct,
};

/// Marker line placed above every user-resolved unit in the document.
pub const USER_MIGRATED_MARKER: &str = "# [USER-MIGRATED]";

/// Accumulated result of one run.
///
/// Every list is in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Migration {
    sections: [Vec<String>; Section::ALL.len()],
    skipped: Vec<String>,
    unhandled: Vec<String>,
}

impl Migration {
    fn index(section: Section) -> usize {
        match section {
            Section::Aliases => 0,
            Section::EnvironmentVariables => 1,
            Section::Functions => 2,
            Section::Inclusions => 3,
            Section::Unresolved => 4,
        }
    }

    fn push(&mut self, fragment: Fragment) {
        self.sections[Self::index(fragment.section)].push(fragment.text);
    }

    /// Fragments collected for one section.
    #[must_use]
    pub fn section(&self, section: Section) -> &[String] {
        &self.sections[Self::index(section)]
    }

    /// Units the user chose to skip (or keep as is).
    #[must_use]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Content that was not migrated and is only reported.
    #[must_use]
    pub fn unhandled(&self) -> &[String] {
        &self.unhandled
    }

    /// Counts per section and side log.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary {
            aliases: self.section(Section::Aliases).len(),
            environment_variables: self.section(Section::EnvironmentVariables).len(),
            functions: self.section(Section::Functions).len(),
            inclusions: self.section(Section::Inclusions).len(),
            user_migrated: self.section(Section::Unresolved).len(),
            skipped: self.skipped.len(),
            unhandled: self.unhandled.len(),
        }
    }

    /// Render the fish configuration document.
    ///
    /// The four translated sections always appear, each under a header
    /// comment. User-resolved content follows under its own header when
    /// there is any. Unhandled content never appears.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in Section::ALL {
            let items = self.section(section);
            if section == Section::Unresolved {
                if items.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "# {section}");
                for item in items {
                    let _ = writeln!(out, "{USER_MIGRATED_MARKER}\n{item}");
                }
            } else {
                let _ = writeln!(out, "# {section}");
                for item in items {
                    let _ = writeln!(out, "{item}");
                }
            }
            out.push('\n');
        }
        out
    }

    /// Print the skipped and unhandled logs.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if !self.skipped.is_empty() {
            writeln!(out, "\n===== Skipped (by user choice) =====")?;
            for unit in &self.skipped {
                writeln!(out, "{unit}")?;
            }
            writeln!(out, "===== End of Skipped =====")?;
        }
        if !self.unhandled.is_empty() {
            writeln!(out, "\n===== Unhandled or Zsh-only lines =====")?;
            for unit in &self.unhandled {
                writeln!(out, "{unit}")?;
            }
            writeln!(out, "===== End of Unhandled =====")?;
        }
        if self.skipped.is_empty() && self.unhandled.is_empty() {
            writeln!(out, "All lines were migrated or handled!")?;
        }
        Ok(())
    }
}

/// Item counts of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Translated aliases.
    pub aliases: usize,
    /// Translated variables.
    pub environment_variables: usize,
    /// Translated functions.
    pub functions: usize,
    /// Translated `source` statements.
    pub inclusions: usize,
    /// Units rewritten or kept by the user.
    pub user_migrated: usize,
    /// Skipped units.
    pub skipped: usize,
    /// Unhandled units.
    pub unhandled: usize,
}

/// Drives one migration over an input text.
pub struct Migrator<P> {
    resolver: Resolver<P>,
}

impl<P: Prompter> Migrator<P> {
    /// Create a migrator asking `prompter` about ambiguous content.
    pub fn new(prompter: P, modifiers: SessionModifiers) -> Self {
        Migrator {
            resolver: Resolver::new(prompter, modifiers),
        }
    }

    /// Sticky modifiers as they stand now.
    #[must_use]
    pub fn modifiers(&self) -> SessionModifiers {
        self.resolver.modifiers()
    }

    /// The resolver's question channel.
    #[must_use]
    pub fn prompter(&self) -> &P {
        self.resolver.prompter()
    }

    /// Migrate a whole zsh configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Prompt`] if the question channel fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use zsh2fish::migrate::Migrator;
    /// use zsh2fish::resolve::{ScriptedPrompter, SessionModifiers};
    /// use zsh2fish::translate::Section;
    ///
    /// let mut m = Migrator::new(ScriptedPrompter::default(), SessionModifiers::new());
    /// let out = m.migrate("alias ll='ls -la'\nexport EDITOR=vim\n").unwrap();
    /// assert_eq!(out.section(Section::Aliases), ["alias ll=\"ls -la\""]);
    /// assert_eq!(out.section(Section::EnvironmentVariables), ["set -gx EDITOR vim"]);
    /// ```
    pub fn migrate(&mut self, input: &str) -> Result<Migration, MigrateError> {
        let mut migration = Migration::default();

        let mut scanner = Scanner::new(input);
        for unit in scanner.by_ref() {
            match unit {
                Unit::Line(line, construct) => match translate_construct(&construct) {
                    Translation::Fragment(f) => migration.push(f),
                    Translation::Unhandled => {
                        debug!(line = line.index + 1, "no fish equivalent");
                        migration.unhandled.push(line.text.to_string());
                    }
                    Translation::Ambiguous => {
                        let resolution = self.resolver.resolve(UnitKind::Line, line.text)?;
                        apply(&mut migration, resolution, line.text);
                    }
                    Translation::Nothing => {}
                },
                Unit::Block(block) => match translate_block(&block) {
                    BlockTranslation::Translated {
                        fragments,
                        unhandled,
                    } => {
                        for f in fragments {
                            migration.push(f);
                        }
                        migration.unhandled.extend(unhandled);
                    }
                    BlockTranslation::Unhandled(text) => migration.unhandled.push(text),
                    BlockTranslation::Ambiguous(text) => {
                        let resolution = self.resolver.resolve(UnitKind::Block, &text)?;
                        apply(&mut migration, resolution, &text);
                    }
                },
            }
        }

        let summary = migration.summary();
        info!(lines = scanner.position(), ?summary, "migration finished");
        Ok(migration)
    }
}

fn apply(migration: &mut Migration, resolution: Resolution, original: &str) {
    match resolution {
        Resolution::Dropped => migration.skipped.push(original.to_string()),
        Resolution::KeptVerbatim(text) => {
            migration.skipped.push(original.to_string());
            migration.push(Fragment {
                section: Section::Unresolved,
                text,
            });
        }
        Resolution::MarkedUnhandled(wrapped) => migration.unhandled.push(wrapped),
        Resolution::UserRewrite(text) => migration.push(Fragment {
            section: Section::Unresolved,
            text,
        }),
    }
}
