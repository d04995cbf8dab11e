//! Atomic whole-file replacement
//!
//! Writers never edit a persisted file in place. Content goes to a sibling
//! `<name>.tmp` file first, is flushed to disk, then renamed over the target.
//! A crash at any point leaves either the old file or the new file, never a
//! partial one.

use crate::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Path of the temporary sibling used while replacing `target`
pub fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

/// Replace `target` with `contents` atomically (temp file + rename)
///
/// Parent directories are created if missing.
pub fn write_atomic(target: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp = temp_path_for(target);
    {
        let mut file = fs::File::create(&temp)?;
        file.write_all(contents)?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&temp, target) {
        // Rename error takes precedence over cleanup
        let _ = fs::remove_file(&temp);
        return Err(e.into());
    }

    tracing::debug!(path = %target.display(), bytes = contents.len(), "File replaced atomically");
    Ok(())
}
