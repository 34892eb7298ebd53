use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use dirtrack::config::{Exclusions, Settings};
use dirtrack::prompt::{ContinuePrompt, StdinPrompt};
use dirtrack::watch::{self, RunStatus};
use dirtrack::{CONFIG_PATH, output};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dtr",
    version = dirtrack::VERSION,
    about = "Watch for file changes in a directory between runs",
    long_about = "Compares a directory tree against the snapshot taken by the \
previous run and reports added, removed, and changed files. Output may be redirected."
)]
struct Cli {
    /// Directory to check (defaults to the configured PATH, then the current directory)
    path: Option<PathBuf>,

    /// Never prompt on file-access failures
    #[arg(long)]
    non_interactive: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "Error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    #[cfg(windows)]
    let _ = colored::control::set_virtual_terminal(true);

    let settings = Settings::load(Path::new(CONFIG_PATH))?;
    output::success(&format!("Configuration loaded from {CONFIG_PATH}"));
    let exclusions = Exclusions::load(&settings)?;

    let target = cli
        .path
        .or_else(|| settings.default_target.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let target = resolve_directory(&target);

    // Prompts only make sense with an operator on the other end
    let interactive = !cli.non_interactive && std::io::stdin().is_terminal();
    let stdin_prompt = StdinPrompt;
    let prompt = interactive.then_some(&stdin_prompt as &dyn ContinuePrompt);

    match watch::run(&target, &exclusions, prompt)? {
        RunStatus::Done => {}
        RunStatus::Aborted => output::info("Operation cancelled by user."),
    }
    Ok(())
}

/// Resolves the target to an absolute path, exiting through the argument
/// error path when it is not a directory.
fn resolve_directory(target: &Path) -> PathBuf {
    match std::fs::canonicalize(target) {
        Ok(resolved) if resolved.is_dir() => resolved,
        _ => {
            let mut cmd = Cli::command();
            cmd.error(
                clap::error::ErrorKind::ValueValidation,
                format!("not a directory: {}", target.display()),
            )
            .exit()
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
