use anyhow::{Context, Result, bail};
use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings key naming the default target directory.
const KEY_PATH: &str = "PATH";
/// Settings key naming the excluded-directories list file.
const KEY_EXCLUDE_DIRS: &str = "PATH_TO_FILE_EXCLUDE_DIRS";
/// Settings key naming the excluded-files list file.
const KEY_EXCLUDE_FILES: &str = "PATH_TO_FILE_EXCLUDE_FILES";

/// Usage hint appended to configuration errors.
const USAGE: &str = "expected one key=value pair per line, with at least \
PATH_TO_FILE_EXCLUDE_DIRS and PATH_TO_FILE_EXCLUDE_FILES defined";

/// Immutable process settings, built once at startup and passed down by
/// reference. No component reads ambient global state.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Target directory used when no positional argument is given.
    pub default_target: Option<PathBuf>,
    /// Location of the excluded-directory-names list.
    pub exclude_dirs_path: PathBuf,
    /// Location of the excluded-file-names list.
    pub exclude_files_path: PathBuf,
}

impl Settings {
    /// Loads settings from a `key=value` file.
    ///
    /// Lines starting with `#` and blank lines are ignored. Values may
    /// contain `=`; only the first one splits.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable, if a
    /// non-comment line has no `=`, or if either exclusion-list key is
    /// absent. Configuration errors are fatal at startup.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read configuration file {}: {USAGE}", path.display())
        })?;

        let pairs = parse_pairs(&raw)
            .with_context(|| format!("Malformed configuration file {}: {USAGE}", path.display()))?;

        let require = |key: &str| -> Result<PathBuf> {
            pairs.get(key).map(PathBuf::from).with_context(|| {
                format!("Configuration file {} is missing key {key}: {USAGE}", path.display())
            })
        };

        let settings = Self {
            default_target: pairs.get(KEY_PATH).map(PathBuf::from),
            exclude_dirs_path: require(KEY_EXCLUDE_DIRS)?,
            exclude_files_path: require(KEY_EXCLUDE_FILES)?,
        };
        debug!(?settings, "configuration loaded");
        Ok(settings)
    }
}

/// Parses `key=value` lines, skipping comments and blank lines.
fn parse_pairs(raw: &str) -> Result<HashMap<String, String>> {
    let mut pairs = HashMap::new();
    for (number, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            bail!("line {} has no '=': {line:?}", number + 1);
        };
        pairs.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(pairs)
}

/// The two name-based exclusion sets, loaded once per run and immutable
/// during the walk.
///
/// Both hold bare names, not paths: a directory whose name matches is pruned
/// from descent entirely, a file whose name matches is skipped from hashing.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    /// Directory names pruned from traversal.
    pub dirs: HashSet<String>,
    /// File names skipped from hashing.
    pub files: HashSet<String>,
}

impl Exclusions {
    /// Loads both exclusion lists named by `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error only for unreadable list files; a missing file is an
    /// empty list, not an error.
    pub fn load(settings: &Settings) -> Result<Self> {
        Ok(Self {
            dirs: read_name_list(&settings.exclude_dirs_path)?,
            files: read_name_list(&settings.exclude_files_path)?,
        })
    }
}

/// Reads a plain-text list of bare names, one per line. `#` lines and blank
/// lines are ignored; a missing file yields an empty set.
fn read_name_list(path: &Path) -> Result<HashSet<String>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read exclusion list {}", path.display()));
        }
    };

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect())
}
