use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use zsh2fish::{Options, SessionModifiers, TerminalPrompter, paths};

/// What to do with content that cannot be translated with confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OnAmbiguous {
    /// Ask for every unit.
    Ask,
    /// Skip everything without asking.
    Skip,
    /// Report everything as unhandled without asking.
    Comment,
}

#[derive(Parser, Debug)]
#[command(name = "zsh2fish", version, about = "Migrate a .zshrc to fish config.fish")]
struct Cli {
    #[arg(short, long, help = "zsh configuration to read [default: ~/.zshrc]")]
    input: Option<String>,
    #[arg(
        short,
        long,
        help = "fish configuration to write [default: $XDG_CONFIG_HOME/fish/config.fish]"
    )]
    output: Option<String>,
    #[arg(long, help = "Overwrite the output without keeping a .bak copy")]
    no_backup: bool,
    #[arg(long, value_enum, default_value_t = OnAmbiguous::Ask)]
    on_ambiguous: OnAmbiguous,
    #[arg(long, help = "Print the fish configuration instead of writing it")]
    dry_run: bool,
    #[arg(short, long, help = "Log progress to stderr")]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = try_main(cli) {
        eprintln!("zsh2fish: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("ZSH2FISH_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn try_main(cli: Cli) -> anyhow::Result<()> {
    let input = resolve_path(cli.input.as_deref(), paths::default_input)
        .context("locating the zsh configuration")?;
    let output = resolve_path(cli.output.as_deref(), paths::default_output)
        .context("locating the fish configuration")?;

    let mut modifiers = SessionModifiers::new();
    match cli.on_ambiguous {
        OnAmbiguous::Ask => {}
        OnAmbiguous::Skip => modifiers.set_skip_all(),
        OnAmbiguous::Comment => modifiers.set_comment_all(),
    }

    let options = Options {
        input,
        output,
        backup: !cli.no_backup,
        dry_run: cli.dry_run,
        modifiers,
    };
    zsh2fish::run(&options, TerminalPrompter::stdio(), &mut io::stdout())?;
    Ok(())
}

/// A user-supplied path with `~` expanded, or the default.
fn resolve_path(
    user: Option<&str>,
    default: fn() -> Result<PathBuf, zsh2fish::MigrateError>,
) -> Result<PathBuf, zsh2fish::MigrateError> {
    match user.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => paths::expand_tilde(p),
        None => default(),
    }
}
