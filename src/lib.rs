//! zsh2fish — migrate a zsh configuration to fish.
//!
//! Scans a `.zshrc` line by line, translates what it recognizes (aliases,
//! variables, functions, `source` lines, simple conditionals) and asks the
//! user what to do with everything else.
//!
//! # Modules
//!
//! - [`patterns`] — recognizer patterns and the untranslatable catalog
//! - [`quote`] — value normalization for fish
//! - [`classify`] — single-line classification
//! - [`scanner`] — cursor over lines and multi-line blocks
//! - [`translate`] — zsh constructs to fish fragments
//! - [`resolve`] — interactive resolution of ambiguous content
//! - [`migrate`] — the run loop and the output document
//! - [`paths`] — default paths, `~` expansion and backups
//! - [`run`] — file-level entry point
//! - [`error`] — error type

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // `MigrateError` in `error` reads fine

pub mod classify;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod patterns;
pub mod quote;
pub mod resolve;
pub mod run;
pub mod scanner;
pub mod translate;

pub use error::MigrateError;
pub use migrate::{Migration, Migrator};
pub use resolve::{Prompter, ScriptedPrompter, SessionModifiers, TerminalPrompter};
pub use run::{Options, run};
