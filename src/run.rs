//! One complete migration: read, translate, back up, write, report.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::MigrateError;
use crate::migrate::{Migration, Migrator};
use crate::paths;
use crate::resolve::{Prompter, SessionModifiers};

/// Settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// zsh configuration to read.
    pub input: PathBuf,
    /// fish configuration to write.
    pub output: PathBuf,
    /// Copy an existing output file aside before overwriting it.
    pub backup: bool,
    /// Print the document to the report channel instead of writing it.
    pub dry_run: bool,
    /// Sticky choices in effect from the start.
    pub modifiers: SessionModifiers,
}

/// Run a migration end to end.
///
/// The input is read whole before anything else happens, so an unreadable
/// input leaves no trace. Bytes that are not valid UTF-8 are replaced with
/// U+FFFD and the run carries on. Output problems surface only after the
/// translation is complete; a backup made before a failed write is left in
/// place.
///
/// # Errors
///
/// Returns [`MigrateError`] for input, backup, output, prompt or report
/// failures.
pub fn run<P, W>(options: &Options, prompter: P, report: &mut W) -> Result<Migration, MigrateError>
where
    P: Prompter,
    W: Write,
{
    let bytes = fs::read(&options.input).map_err(|source| MigrateError::ReadInput {
        path: options.input.clone(),
        source,
    })?;
    info!(path = %options.input.display(), bytes = bytes.len(), "read input");
    let input = String::from_utf8_lossy(&bytes);
    if let Cow::Owned(_) = input {
        warn!(path = %options.input.display(), "input is not valid UTF-8; invalid bytes replaced");
    }

    let mut migrator = Migrator::new(prompter, options.modifiers);
    let migration = migrator.migrate(&input)?;
    let document = migration.render();

    if options.dry_run {
        report
            .write_all(document.as_bytes())
            .map_err(MigrateError::Report)?;
    } else {
        write_output(options, &document, report)?;
        writeln!(
            report,
            "\nMigration complete! See output at:\n{}",
            options.output.display()
        )
        .map_err(MigrateError::Report)?;
    }

    migration.write_report(report).map_err(MigrateError::Report)?;
    Ok(migration)
}

fn write_output<W: Write>(options: &Options, document: &str, report: &mut W) -> Result<(), MigrateError> {
    let write_err = |source| MigrateError::WriteOutput {
        path: options.output.clone(),
        source,
    };

    if options.backup {
        if let Some(backup) = paths::create_backup(&options.output)? {
            writeln!(report, "Backup created: {}", backup.display()).map_err(MigrateError::Report)?;
        }
    }
    if let Some(parent) = options.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(&options.output, document).map_err(write_err)?;
    info!(path = %options.output.display(), bytes = document.len(), "wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ScriptedPrompter;
    use tempfile::TempDir;

    fn options(dir: &TempDir) -> Options {
        Options {
            input: dir.path().join(".zshrc"),
            output: dir.path().join("fish").join("config.fish"),
            backup: true,
            dry_run: false,
            modifiers: SessionModifiers::new(),
        }
    }

    #[test]
    fn writes_document_and_creates_parent() {
        let dir = TempDir::new().unwrap();
        let opts = options(&dir);
        fs::write(&opts.input, "alias ll='ls -la'\n").unwrap();

        let mut report = Vec::new();
        run(&opts, ScriptedPrompter::default(), &mut report).unwrap();

        let written = fs::read_to_string(&opts.output).unwrap();
        assert!(written.starts_with("# Aliases\nalias ll=\"ls -la\"\n"));
        let report = String::from_utf8(report).unwrap();
        assert!(report.contains("Migration complete!"));
        assert!(report.contains("All lines were migrated or handled!"));
    }

    #[test]
    fn backs_up_existing_output() {
        let dir = TempDir::new().unwrap();
        let opts = options(&dir);
        fs::write(&opts.input, "export A=1\n").unwrap();
        fs::create_dir_all(opts.output.parent().unwrap()).unwrap();
        fs::write(&opts.output, "old").unwrap();
        fs::write(dir.path().join("fish/config.fish.bak"), "older").unwrap();

        let mut report = Vec::new();
        run(&opts, ScriptedPrompter::default(), &mut report).unwrap();

        let backup = dir.path().join("fish/config.fish.bak.1");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "old");
        assert!(String::from_utf8(report).unwrap().contains("Backup created:"));
        assert!(fs::read_to_string(&opts.output).unwrap().contains("set -gx A 1"));
    }

    #[test]
    fn no_backup_when_disabled() {
        let dir = TempDir::new().unwrap();
        let mut opts = options(&dir);
        opts.backup = false;
        fs::write(&opts.input, "").unwrap();
        fs::create_dir_all(opts.output.parent().unwrap()).unwrap();
        fs::write(&opts.output, "old").unwrap();

        run(&opts, ScriptedPrompter::default(), &mut std::io::sink()).unwrap();
        assert!(!dir.path().join("fish/config.fish.bak").exists());
    }

    #[test]
    fn missing_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let opts = options(&dir);
        let err = run(&opts, ScriptedPrompter::default(), &mut std::io::sink()).unwrap_err();
        assert!(matches!(err, MigrateError::ReadInput { .. }));
        assert!(!opts.output.exists());
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let dir = TempDir::new().unwrap();
        let opts = options(&dir);
        fs::write(&opts.input, b"# caf\xe9\nalias g=git\n").unwrap();

        let out = run(&opts, ScriptedPrompter::default(), &mut std::io::sink()).unwrap();
        assert_eq!(out.section(crate::translate::Section::Aliases), ["alias g=git"]);
        assert!(out.skipped().is_empty());
        assert!(fs::read_to_string(&opts.output).unwrap().contains("alias g=git"));
    }

    #[test]
    fn dry_run_prints_document() {
        let dir = TempDir::new().unwrap();
        let mut opts = options(&dir);
        opts.dry_run = true;
        fs::write(&opts.input, "X=1\n").unwrap();

        let mut report = Vec::new();
        run(&opts, ScriptedPrompter::default(), &mut report).unwrap();
        assert!(!opts.output.exists());
        assert!(String::from_utf8(report).unwrap().contains("set -gx X 1"));
    }

    #[test]
    fn unwritable_output_fails_after_scan() {
        let dir = TempDir::new().unwrap();
        let mut opts = options(&dir);
        fs::write(&opts.input, "echo hi\n").unwrap();
        // a regular file where the output directory should be
        fs::write(dir.path().join("blocker"), "").unwrap();
        opts.output = dir.path().join("blocker").join("config.fish");

        let mut prompter = ScriptedPrompter::default();
        let err = run(&opts, &mut prompter, &mut std::io::sink()).unwrap_err();
        assert!(matches!(err, MigrateError::WriteOutput { .. }));
        assert_eq!(prompter.questions().len(), 1);
    }
}
