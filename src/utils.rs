// ABOUTME: Utility functions for the markdeck compiler
// ABOUTME: Provides directory validation, path resolution and recursive copying

use crate::errors::{DeckError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Validate that a directory exists
pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(DeckError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(DeckError::ValidationError(format!(
            "Path is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| export_error(path, e))?;
    } else if !path.is_dir() {
        return Err(DeckError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Get the absolute path
pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| {
        DeckError::ValidationError(format!("Failed to get absolute path for {:?}: {}", path, e))
    })
}

/// Copy a file or a whole directory tree from `src` to `dst`, merging into
/// whatever already exists at `dst`.
pub fn copy_entry(src: &Path, dst: &Path) -> Result<()> {
    debug!("Copying {:?} -> {:?}", src, dst);
    if src.is_file() {
        if let Some(parent) = dst.parent() {
            ensure_directory_exists(parent)?;
        }
        fs::copy(src, dst).map_err(|e| export_error(dst, e))?;
        return Ok(());
    }

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| export_error(src, e.into()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| DeckError::UnknownError(e.to_string()))?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            ensure_directory_exists(&target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| export_error(&target, e))?;
        }
    }
    Ok(())
}

pub(crate) fn export_error(path: &Path, err: std::io::Error) -> DeckError {
    DeckError::ExportError {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
