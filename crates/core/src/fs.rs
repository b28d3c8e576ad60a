//! Filesystem utilities

use std::path::{Path, PathBuf};

use log::debug;

use crate::{get_xdg_data_dir, DEFAULT_DATABASE_FILE};

/// Check if a path is a regular file
pub fn is_file(path: &str) -> bool {
    Path::new(path).is_file()
}

/// Locate the observations database when none was configured
///
/// Search order:
/// 1. ./Resources/hawaii.sqlite
/// 2. ./hawaii.sqlite
/// 3. $XDG_DATA_HOME/climate-api/hawaii.sqlite
///
/// Falls back to the first candidate so the caller reports a sensible path.
pub fn default_database_path() -> PathBuf {
    let candidates = [
        PathBuf::from("Resources").join(DEFAULT_DATABASE_FILE),
        PathBuf::from(DEFAULT_DATABASE_FILE),
        get_xdg_data_dir().join(DEFAULT_DATABASE_FILE),
    ];

    for candidate in &candidates {
        if candidate.is_file() {
            debug!("Found database at: {}", candidate.display());
            return candidate.clone();
        }
    }

    candidates[0].clone()
}
