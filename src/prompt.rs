use std::io::{self, BufRead, Write};

/// Explicit outcome of asking the operator whether to keep going.
///
/// Replaces exception-style control flow: the answer travels back up the call
/// chain as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    /// Keep walking; the failed file is treated as deleted.
    Continue,
    /// Abort the entire run.
    Cancel,
}

/// Capability the walker consults when a recoverable file-access failure
/// occurs in interactive mode.
///
/// Keeping this behind a trait keeps user interaction out of the traversal
/// logic and lets tests drive both answers.
pub trait ContinuePrompt {
    /// Asks whether the walk should continue.
    fn confirm_continue(&self) -> WalkControl;
}

/// Interactive `Continue? [Y/n]` prompt on stdin.
///
/// An empty answer, `y`, or `yes` (case-insensitive) continues; anything else
/// cancels. A failed stdin read also cancels, since no answer was given.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

impl ContinuePrompt for StdinPrompt {
    fn confirm_continue(&self) -> WalkControl {
        print!("Continue? [Y/n] ");
        let _ = io::stdout().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return WalkControl::Cancel;
        }

        let answer = answer.trim().to_lowercase();
        if answer.is_empty() || answer == "y" || answer == "yes" {
            WalkControl::Continue
        } else {
            WalkControl::Cancel
        }
    }
}
