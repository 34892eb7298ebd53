use crate::snapshot::Snapshot;
use std::collections::BTreeSet;

/// The partition produced by comparing two snapshots.
///
/// The three sets are pairwise disjoint by construction and sorted so that
/// reports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Paths present in the new snapshot but not the old one.
    pub added: BTreeSet<String>,
    /// Paths present in the old snapshot but not the new one.
    pub removed: BTreeSet<String>,
    /// Paths present in both snapshots whose digests differ.
    pub changed: BTreeSet<String>,
}

impl ChangeSet {
    /// True when nothing was added, removed, or changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Compares two snapshots.
///
/// Pure function of its inputs: no ordering is assumed of either snapshot and
/// nothing is read from disk.
#[must_use]
pub fn compare(old: &Snapshot, new: &Snapshot) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (path, digest) in &new.entries {
        match old.entries.get(path) {
            None => {
                changes.added.insert(path.clone());
            }
            Some(old_digest) if old_digest != digest => {
                changes.changed.insert(path.clone());
            }
            Some(_) => {}
        }
    }

    for path in old.entries.keys() {
        if !new.entries.contains_key(path) {
            changes.removed.insert(path.clone());
        }
    }

    changes
}
