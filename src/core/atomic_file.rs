//! Whole-file replacement via a sibling temp file and `rename()`.
//!
//! Symlinks are followed: the link stays in place and its target is replaced.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Hidden sibling temp path: `torrc` → `.torrc.exitto-<pid>.tmp`.
fn tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.exitto-{}.tmp", name, std::process::id()))
}

/// The file a write to `path` must land on: the symlink target if `path`
/// is a link, `path` itself if it does not exist yet.
fn real_path(path: &Path) -> io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(real) => Ok(real),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e),
    }
}

fn fill(file: &mut File, contents: &str, permissions: Option<fs::Permissions>) -> io::Result<()> {
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions)?;
    }
    Ok(())
}

/// Atomically replace the contents of `path` with `contents`.
///
/// Permissions of an existing file are carried over to the replacement.
/// On failure the temp file is removed and `path` is left as it was.
pub fn write(path: &Path, contents: &str) -> io::Result<()> {
    let target = real_path(path)?;
    let permissions = match fs::metadata(&target) {
        Ok(meta) => Some(meta.permissions()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };

    let tmp = tmp_path(&target);
    // create_new: a leftover file with the temp name is never truncated
    let mut file = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
    let result = fill(&mut file, contents, permissions);
    drop(file);
    let result = result.and_then(|_| fs::rename(&tmp, &target));

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
