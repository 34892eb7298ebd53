//! Marker-tagged console reporting.
//!
//! Every user-facing line carries one of five markers: `[!]` warning, `[+]`
//! new file, `[-]` removed file, `[~]` changed file, `[✓]` success. Colors are
//! applied by the `colored` crate only when stdout is an interactive terminal;
//! redirected output gets plain `[tag] text` lines.

use colored::Colorize;

/// Prints a warning line.
pub fn warning(message: &str) {
    println!("{} {}", "[!]".yellow().bold(), message.yellow());
}

/// Prints a new-file report line.
pub fn added(path: &str) {
    println!("{} New file: {}", "[+]".green().bold(), path.green());
}

/// Prints a removed-file report line.
pub fn removed(path: &str) {
    println!("{} Removed file: {}", "[-]".red().bold(), path.red());
}

/// Prints a changed-file report line.
pub fn changed(path: &str) {
    println!("{} Changed file: {}", "[~]".yellow().bold(), path.yellow());
}

/// Prints a success confirmation line.
pub fn success(message: &str) {
    println!("{} {}", "[✓]".green().bold(), message.green());
}

/// Prints an untagged informational line.
pub fn info(message: &str) {
    println!("{message}");
}
