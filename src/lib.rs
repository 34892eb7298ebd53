#![warn(missing_docs)]

//! # Dirtrack - Directory Change Watcher
//!
//! Dirtrack detects changes to a directory tree between two points in time.
//! Each run hashes every file under a target directory, compares the result
//! against the snapshot persisted by the previous run, reports added, removed,
//! and changed files, and then overwrites the snapshot.
//!
//! ## Features
//!
//! - **Content-Addressed Snapshots**: Files are hashed with xxHash3 (128-bit)
//!   and stored as a path-to-digest mapping
//! - **Versioned Binary Storage**: Snapshots are serialized with bincode and
//!   carry a format version tag so corruption is detected, never misread
//! - **Exclusion Lists**: Directory and file names can be pruned from the walk
//! - **Resilient Traversal**: Unreadable files are warned about and skipped;
//!   a single bad file never aborts the run
//!
//! ## Architecture
//!
//! - [`hash`]: Streaming file content digests
//! - [`walker`]: Directory traversal producing a fresh snapshot
//! - [`snapshot`]: Snapshot type and on-disk store
//! - [`diff`]: Comparison of two snapshots into a change set
//! - [`watch`]: The load-walk-diff-report-save orchestrator
//! - [`config`]: Settings and exclusion-list loading
//! - [`prompt`]: Operator confirmation on file-access failures
//! - [`output`]: Marker-tagged console reporting

/// Settings file and exclusion-list loading.
pub mod config;

/// Snapshot comparison producing added/removed/changed sets.
pub mod diff;

/// Streaming file content hashing.
pub mod hash;

/// Marker-tagged console output.
pub mod output;

/// Operator confirmation prompts for recoverable walk failures.
pub mod prompt;

/// Snapshot data model and persistent store.
pub mod snapshot;

/// Directory traversal with exclusion pruning and failure classification.
pub mod walker;

/// The watch run orchestrator.
pub mod watch;

/// Current version of the dirtrack binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the hidden snapshot artifact kept at the root of the watched
/// directory. Always skipped during traversal so the store never hashes its
/// own state file.
pub const SNAPSHOT_FILE: &str = ".dirtrack.snapshot";

/// Fixed settings file location, relative to the working directory.
pub const CONFIG_PATH: &str = "settings/config.conf";
