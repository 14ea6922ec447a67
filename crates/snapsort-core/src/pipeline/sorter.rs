//! Filesystem placement of classified files into label folders.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FileError;

/// Move a classified file into `base_dir/label/`, keeping its file name.
///
/// The label folder is created on first use (`create_dir_all` is idempotent,
/// so reuse across files and across runs is free). If the destination
/// already holds a file with the same name the move is refused and the
/// source stays at its original path.
///
/// On any failure the source file remains in place.
pub fn place(source: &Path, label: &str, base_dir: &Path) -> Result<PathBuf, FileError> {
    let placement_err = |message: String| FileError::Placement {
        path: source.to_path_buf(),
        message,
    };

    let file_name = source
        .file_name()
        .ok_or_else(|| placement_err("source path has no file name".to_string()))?;

    let dest_dir = base_dir.join(label);
    fs::create_dir_all(&dest_dir)
        .map_err(|e| placement_err(format!("cannot create {dest_dir:?}: {e}")))?;

    let destination = dest_dir.join(file_name);
    if destination.exists() {
        return Err(placement_err(format!(
            "destination already exists: {destination:?}"
        )));
    }

    if fs::rename(source, &destination).is_ok() {
        return Ok(destination);
    }

    // Rename fails across filesystems; fall back to copy-then-remove, and
    // never leave a half-written destination behind.
    if let Err(e) = fs::copy(source, &destination) {
        let _ = fs::remove_file(&destination);
        return Err(placement_err(format!("copy to {destination:?} failed: {e}")));
    }
    if let Err(e) = fs::remove_file(source) {
        let _ = fs::remove_file(&destination);
        return Err(placement_err(format!(
            "could not remove source after copy: {e}"
        )));
    }

    Ok(destination)
}
