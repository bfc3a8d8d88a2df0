//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::core::state::App;

/// Uniquely named directory under the system temp dir, removed on drop.
pub struct ScratchDir(PathBuf);

impl Deref for ScratchDir {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Creates an empty scratch directory; keep the guard alive while using it.
pub fn scratch_dir(label: &str) -> ScratchDir {
    let dir = std::env::temp_dir().join(format!("exitto-{}-{}", label, uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    ScratchDir(dir)
}

/// Creates a test App pointed at a torrc that nothing reads.
pub fn test_app() -> App {
    App::new(Some(PathBuf::from("/tmp/exitto-test-torrc")))
}
