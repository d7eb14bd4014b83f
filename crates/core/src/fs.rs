//! Filesystem utilities

use std::path::Path;

use log::warn;

/// Check that a path points at a regular file, logging when it does not
pub fn is_readable_file(path: &str) -> bool {
    let path = Path::new(path);
    if !path.exists() {
        warn!("No file at: {}", path.display());
        return false;
    }
    if !path.is_file() {
        warn!("Not a regular file: {}", path.display());
        return false;
    }
    true
}
