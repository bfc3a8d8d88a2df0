//! # Env Store
//!
//! Remembers the torrc path between runs in a dotenv file (`.env` by default):
//!
//! ```text
//! TORRC_FILE_PATH='/etc/tor/torrc'
//! ```
//!
//! A missing file is created on first run with an empty path, which tells the
//! TUI to open on the torrc path screen.

use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::atomic_file;

pub const TORRC_PATH_KEY: &str = "TORRC_FILE_PATH";

pub struct EnvStore {
    path: PathBuf,
    configured: bool,
}

impl EnvStore {
    /// Opens the env file at `path`, creating it with an empty torrc path if
    /// missing, and loads its variables into the process environment.
    pub fn bootstrap(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let configured = path.exists();
        if !configured {
            info!("No env file at {}, creating it", path.display());
            fs::write(&path, format!("{}=''", TORRC_PATH_KEY))?;
        }

        // Variables already set in the process environment take precedence.
        if let Err(e) = dotenv::from_path(&path) {
            warn!("Failed to load env file {}: {}", path.display(), e);
        }

        Ok(Self { path, configured })
    }

    /// False when the env file had to be created by [`EnvStore::bootstrap`].
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads `key` from the file itself (not the process environment).
    /// Empty values count as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read env file {}: {}", self.path.display(), e);
                return None;
            }
        };
        content
            .lines()
            .find_map(|line| parse_line(line).filter(|(k, _)| *k == key))
            .map(|(_, value)| value.to_string())
            .filter(|value| !value.is_empty())
    }

    /// Sets `key` to `value`, replacing its line or appending a new one.
    /// Every other line is kept as is.
    pub fn save(&self, key: &str, value: &str) -> io::Result<()> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };
        let updated = set_key(&content, key, value);
        atomic_file::write(&self.path, &updated)?;
        debug!("Saved {} in {}", key, self.path.display());
        Ok(())
    }
}

/// Parses `KEY=value`, `KEY='value'`, `KEY="value"` or `export KEY=value`.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), unquote(value.trim())))
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn quote(value: &str) -> String {
    if value.contains('\'') {
        format!("\"{}\"", value)
    } else {
        format!("'{}'", value)
    }
}

fn set_key(content: &str, key: &str, value: &str) -> String {
    let entry = format!("{}={}", key, quote(value));
    let mut replaced = false;
    let mut out = String::with_capacity(content.len() + entry.len() + 1);

    for line in content.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        if !replaced && parse_line(body).is_some_and(|(k, _)| k == key) {
            out.push_str(&entry);
            out.push_str(&line[body.len()..]);
            replaced = true;
        } else {
            out.push_str(line);
        }
    }

    if !replaced {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&entry);
        out.push('\n');
    }
    out
}
