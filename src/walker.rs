use crate::SNAPSHOT_FILE;
use crate::config::Exclusions;
use crate::hash;
use crate::output;
use crate::prompt::{ContinuePrompt, WalkControl};
use crate::snapshot::Snapshot;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Classification of a per-file read failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The file exists but could not be opened for reading.
    PermissionDenied,
    /// The file vanished between listing and reading. A race inherent to
    /// filesystem snapshotting; never prompts.
    NotFound,
    /// Any other OS-level error.
    Other,
}

impl FailureKind {
    fn from_error_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::PermissionDenied => Self::PermissionDenied,
            ErrorKind::NotFound => Self::NotFound,
            _ => Self::Other,
        }
    }
}

/// One file that could not be hashed during the walk.
#[derive(Debug)]
pub struct WalkFailure {
    /// Traversal path of the failed file.
    pub path: String,
    /// Failure classification.
    pub kind: FailureKind,
    /// The underlying OS error, rendered.
    pub message: String,
}

/// The product of a completed walk: the fresh snapshot plus the log of
/// per-file failures. Failed files are simply absent from the snapshot,
/// indistinguishable from deletion downstream.
#[derive(Debug)]
pub struct WalkReport {
    /// Mapping of every successfully hashed file.
    pub snapshot: Snapshot,
    /// Files that were listed but could not be read.
    pub failures: Vec<WalkFailure>,
}

/// Outcome of a walk. Operator cancellation is a value, not an error.
#[derive(Debug)]
pub enum Walked {
    /// The walk covered the whole tree.
    Complete(WalkReport),
    /// The operator declined to continue past a file-access warning.
    Cancelled,
}

/// Walks `root` and hashes every file not excluded, producing a fresh
/// snapshot keyed by full traversal path.
///
/// Directories whose bare name is in `exclusions.dirs` are pruned: never
/// descended into, so nothing beneath them contributes to the snapshot. The
/// root itself is always walked, whatever its name. Files whose bare name is
/// in `exclusions.files` are skipped, as is the snapshot artifact itself.
///
/// Per-file read failures are warned about and logged but never abort the
/// walk, with one exception: when `prompt` is given, permission-denied and
/// other OS errors ask the operator whether to continue, and a Cancel answer
/// ends the walk with [`Walked::Cancelled`]. Vanished files never prompt.
///
/// # Errors
///
/// Returns an error only if the root directory itself cannot be opened.
pub fn walk(
    root: &Path,
    exclusions: &Exclusions,
    prompt: Option<&dyn ContinuePrompt>,
) -> Result<Walked> {
    let mut snapshot = Snapshot::new();
    let mut failures = Vec::new();

    let entries = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            // Prune excluded directory names from descent. Depth 0 is the
            // root itself, which is always walked.
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .is_none_or(|name| !exclusions.dirs.contains(name))
        });

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    return Err(err)
                        .with_context(|| format!("Failed to open directory {}", root.display()));
                }
                // Unreadable subdirectory listing: warn and keep walking
                output::warning(&format!("Skipping unreadable entry: {err}"));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if name == SNAPSHOT_FILE || exclusions.files.contains(name.as_ref()) {
            continue;
        }

        let key = entry.path().display().to_string();
        match hash::hash_file(entry.path()) {
            Ok(digest) => {
                snapshot.insert(key, digest);
            }
            Err(err) => {
                let kind = FailureKind::from_error_kind(err.kind());
                report_failure(&key, kind, &err);
                failures.push(WalkFailure {
                    path: key,
                    kind,
                    message: err.to_string(),
                });

                if kind != FailureKind::NotFound
                    && let Some(prompt) = prompt
                    && prompt.confirm_continue() == WalkControl::Cancel
                {
                    return Ok(Walked::Cancelled);
                }
            }
        }
    }

    debug!(
        hashed = snapshot.len(),
        failed = failures.len(),
        "walk finished"
    );
    Ok(Walked::Complete(WalkReport { snapshot, failures }))
}

/// Prints the warning lines for one failed file.
fn report_failure(path: &str, kind: FailureKind, err: &std::io::Error) {
    match kind {
        FailureKind::PermissionDenied => {
            output::warning(&format!("No access to '{path}': {err}"));
            output::warning("If you continue, the file will be considered deleted.");
            output::warning("You can try again with elevated access.");
        }
        FailureKind::NotFound => {
            output::warning(&format!("Skipping '{path}': {err}"));
            output::warning("Maybe it was deleted/renamed just now...");
        }
        FailureKind::Other => {
            output::warning(&format!("OS error for '{path}': {err}"));
            output::warning("If you continue, the file will be considered deleted.");
        }
    }
}
