//! File system utilities.

use crate::Result;
use std::path::{Path, PathBuf};

/// Check if a path exists and is a regular file.
pub fn ensure_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(crate::Error::NotAFile(path.display().to_string()));
    }
    Ok(())
}

/// Get file extension in lowercase.
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Check if a file has the given extension (case insensitive, no leading dot).
pub fn has_extension(path: &Path, ext: &str) -> bool {
    get_extension(path)
        .map(|e| e == ext.to_lowercase())
        .unwrap_or(false)
}

/// Replace the extension of a path, leaving directories and stem untouched.
pub fn swap_extension(path: &Path, ext: &str) -> PathBuf {
    path.with_extension(ext)
}

/// Get the file name of a path for display.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
