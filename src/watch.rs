use crate::config::Exclusions;
use crate::diff;
use crate::output;
use crate::prompt::ContinuePrompt;
use crate::snapshot::SnapshotStore;
use crate::walker::{self, Walked};
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Terminal state of a watch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The run finished and the snapshot was saved.
    Done,
    /// The operator cancelled during the walk; no snapshot was saved.
    Aborted,
}

/// Executes one full watch run: load the old snapshot, walk the target
/// directory, compare, report, and save the new snapshot.
///
/// The first run on a directory takes a shortcut: an empty old snapshot is
/// never diffed. The new snapshot is persisted immediately and a single
/// "first snapshot" confirmation is printed, with no per-file added lines.
/// Observable behavior, kept on purpose.
///
/// On every completed run the new snapshot overwrites the persisted one,
/// whether or not changes were found. A cancelled walk saves nothing.
///
/// # Errors
///
/// Returns an error if the target directory cannot be opened or the snapshot
/// cannot be saved. Per-file read failures are handled inside the walk and
/// never surface here.
pub fn run(
    target: &Path,
    exclusions: &Exclusions,
    prompt: Option<&dyn ContinuePrompt>,
) -> Result<RunStatus> {
    output::info(&format!("Checking directory: {}", target.display()));

    let store = SnapshotStore::new(target);
    let old = store.load();
    debug!(entries = old.len(), "previous snapshot loaded");

    let report = match walker::walk(target, exclusions, prompt)? {
        Walked::Complete(report) => report,
        Walked::Cancelled => return Ok(RunStatus::Aborted),
    };
    let new = report.snapshot;
    debug!(
        entries = new.len(),
        failures = report.failures.len(),
        "fresh snapshot captured"
    );

    if old.is_empty() {
        store.save(&new)?;
        output::success("First snapshot was created!");
        return Ok(RunStatus::Done);
    }

    let changes = diff::compare(&old, &new);
    if changes.is_empty() {
        output::success("No changes detected.");
    } else {
        for path in &changes.added {
            output::added(path);
        }
        for path in &changes.removed {
            output::removed(path);
        }
        for path in &changes.changed {
            output::changed(path);
        }
    }

    store.save(&new)?;
    Ok(RunStatus::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SNAPSHOT_FILE;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_first_run_creates_snapshot() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("a.txt"), "hello")?;

        let status = run(temp.path(), &Exclusions::default(), None)?;
        assert_eq!(status, RunStatus::Done);
        assert!(temp.path().join(SNAPSHOT_FILE).exists());
        Ok(())
    }

    #[test]
    fn test_first_run_on_empty_directory() -> Result<()> {
        let temp = TempDir::new()?;

        let status = run(temp.path(), &Exclusions::default(), None)?;
        assert_eq!(status, RunStatus::Done);

        let store = SnapshotStore::new(temp.path());
        assert!(store.load().is_empty());
        assert!(store.path().exists());
        Ok(())
    }

    #[test]
    fn test_second_run_updates_snapshot() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("a.txt"), "hello")?;
        run(temp.path(), &Exclusions::default(), None)?;

        fs::write(temp.path().join("b.txt"), "world")?;
        let status = run(temp.path(), &Exclusions::default(), None)?;
        assert_eq!(status, RunStatus::Done);

        let saved = SnapshotStore::new(temp.path()).load();
        assert_eq!(saved.len(), 2);
        Ok(())
    }

    #[test]
    fn test_runs_are_idempotent_without_changes() -> Result<()> {
        let temp = TempDir::new()?;
        fs::write(temp.path().join("a.txt"), "hello")?;
        run(temp.path(), &Exclusions::default(), None)?;

        let before = fs::read(temp.path().join(SNAPSHOT_FILE))?;
        run(temp.path(), &Exclusions::default(), None)?;
        let after = fs::read(temp.path().join(SNAPSHOT_FILE))?;
        // HashMap iteration order may differ between serializations, so
        // compare the decoded mapping rather than raw bytes
        let store = SnapshotStore::new(temp.path());
        assert_eq!(store.load().len(), 1);
        assert_eq!(before.len(), after.len());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_cancelled_walk_saves_nothing() -> Result<()> {
        use crate::prompt::{ContinuePrompt, WalkControl};
        use std::os::unix::fs::PermissionsExt;

        struct Cancel;
        impl ContinuePrompt for Cancel {
            fn confirm_continue(&self) -> WalkControl {
                WalkControl::Cancel
            }
        }

        let temp = TempDir::new()?;
        let locked = temp.path().join("locked.txt");
        fs::write(&locked, "secret")?;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;
        if fs::read(&locked).is_ok() {
            return Ok(()); // permissions not enforced for this user
        }

        let status = run(temp.path(), &Exclusions::default(), Some(&Cancel))?;
        assert_eq!(status, RunStatus::Aborted);
        assert!(!temp.path().join(SNAPSHOT_FILE).exists());
        Ok(())
    }
}
