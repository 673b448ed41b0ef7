//! Desktop path resolution and visible-entry counting
//!
//! One counting routine for every OS: hidden entries (leading `.`) are always
//! skipped, plus any configured literal names, matched case-insensitively.
//! A directory that cannot be read yields the -1 sentinel.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Measurement-failure sentinel
pub const COUNT_UNAVAILABLE: i64 = -1;

/// Resolve the user's Desktop folder
///
/// Prefers the platform's notion of a desktop directory, falling back to
/// `~/Desktop`. Returns `None` when no home directory can be determined.
pub fn desktop_path() -> Option<PathBuf> {
    dirs::desktop_dir().or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
}

/// Count visible entries in `dir`, excluding hidden names and `excluded` literals
///
/// Returns -1 when the directory is missing or unreadable. Entries that fail
/// to stat mid-listing are skipped rather than failing the whole count.
pub fn count_visible_entries(dir: &Path, excluded: &[String]) -> i64 {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Could not access directory");
            return COUNT_UNAVAILABLE;
        }
    };

    let mut count = 0;
    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        if excluded.iter().any(|ex| ex.eq_ignore_ascii_case(&name)) {
            continue;
        }
        count += 1;
    }
    count
}
