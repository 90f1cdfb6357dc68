//! Error type for a migration run.
//!
//! Only I/O can fail. Lines the engine does not understand are never
//! errors; they go through the resolution protocol instead.

use std::io;
use std::path::PathBuf;

/// Fatal failure of a migration run.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// The input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadInput {
        /// Input path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The output file (or its directory) could not be written.
    #[error("cannot write {}: {source}", path.display())]
    WriteOutput {
        /// Output path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The existing output file could not be copied to its backup path.
    #[error("cannot back up {} to {}: {source}", path.display(), backup.display())]
    Backup {
        /// File being backed up.
        path: PathBuf,
        /// Backup destination.
        backup: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The question/answer channel failed.
    #[error("cannot read answer: {0}")]
    Prompt(#[source] io::Error),

    /// The report could not be written.
    #[error("cannot write report: {0}")]
    Report(#[source] io::Error),

    /// A default path was needed but the home directory is unknown.
    #[error("cannot determine the home directory")]
    NoHomeDir,
}
