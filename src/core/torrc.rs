//! # Torrc Directive Editing
//!
//! Reads and rewrites the first country token of the `ExitNodes` directive:
//!
//! ```text
//! ExitNodes {be}, {us}, {fr}, {ch}
//!            ^^
//!            only this token is read or replaced
//! ```
//!
//! Everything else in the file (other lines, their terminators, the later
//! tokens of the directive) passes through byte-identical.
//!
//! Neither routine returns `Err` or panics. Callers get a [`CurrentCode`] or
//! [`PatchOutcome`] and diagnostics go to the log.
//!
//! No locking: two writers on the same file race and the last one wins.

use log::{debug, info, warn};
use regex::Regex;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use crate::core::atomic_file;
use crate::core::countries::NodeCode;

/// Substring identifying the directive line.
pub const DIRECTIVE_MARKER: &str = "ExitNodes";

/// Returned by [`CurrentCode::code`] when there is no current code.
pub const EMPTY_MARKER: &str = "";

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").unwrap());

// ============================================================================
// Results
// ============================================================================

/// Result of reading the directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentCode {
    /// First token of the directive, verbatim (not necessarily a known code).
    Configured(String),
    /// The file has no directive line.
    NotConfigured,
    /// The directive line has no `{token}`.
    Malformed,
    FileMissing,
    Unreadable(String),
}

impl CurrentCode {
    /// The token, or [`EMPTY_MARKER`] for every other state.
    pub fn code(&self) -> &str {
        match self {
            CurrentCode::Configured(code) => code,
            _ => EMPTY_MARKER,
        }
    }

    /// The token as a known node code, if it is one.
    pub fn node(&self) -> Option<NodeCode> {
        match self {
            CurrentCode::Configured(code) => NodeCode::parse(code),
            _ => None,
        }
    }
}

/// Result of patching the directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The first token on `line` (1-based) now holds the new code.
    Patched { line: usize, previous: String },
    /// The file has no directive line; nothing was written.
    NoDirective,
    /// The code is not in the known set; the file was not opened.
    InvalidCode,
    FileMissing,
    /// The directive on `line` has no `{token}`; nothing was written.
    Malformed { line: usize },
    Failed(String),
}

impl PatchOutcome {
    /// Boolean contract: the code was valid and the file could be processed.
    ///
    /// `NoDirective` counts as success; callers that care can match on it.
    pub fn is_success(&self) -> bool {
        matches!(self, PatchOutcome::Patched { .. } | PatchOutcome::NoDirective)
    }
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOutcome::Patched { line, previous } => {
                write!(f, "exit node updated on line {line} (was {{{previous}}})")
            }
            PatchOutcome::NoDirective => write!(f, "no {DIRECTIVE_MARKER} line, file unchanged"),
            PatchOutcome::InvalidCode => write!(f, "unknown node code"),
            PatchOutcome::FileMissing => write!(f, "please give a valid torrc file"),
            PatchOutcome::Malformed { line } => {
                write!(f, "{DIRECTIVE_MARKER} on line {line} has no {{code}} token")
            }
            PatchOutcome::Failed(e) => write!(f, "torrc write failed: {e}"),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// The directive line located inside a file's content.
#[derive(Debug, PartialEq, Eq)]
struct Directive<'a> {
    /// 1-based line number.
    number: usize,
    /// Byte offset of the line start within the content.
    offset: usize,
    /// The line, terminator included.
    text: &'a str,
}

/// Finds the first line containing [`DIRECTIVE_MARKER`].
fn find_directive(content: &str) -> Option<Directive<'_>> {
    let mut offset = 0;
    for (index, text) in content.split_inclusive('\n').enumerate() {
        if text.contains(DIRECTIVE_MARKER) {
            return Some(Directive {
                number: index + 1,
                offset,
                text,
            });
        }
        offset += text.len();
    }
    None
}

/// Byte range of the first token's text (between the braces) within `line`.
fn first_token(line: &str) -> Option<Range<usize>> {
    TOKEN_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.range())
}

/// Pure rewrite of a torrc body.
#[derive(Debug, PartialEq, Eq)]
enum Rewrite {
    Changed {
        content: String,
        line: usize,
        previous: String,
    },
    Unchanged {
        line: usize,
    },
    NoDirective,
    Malformed {
        line: usize,
    },
}

fn rewrite_first_token(content: &str, code: &str) -> Rewrite {
    let Some(directive) = find_directive(content) else {
        return Rewrite::NoDirective;
    };
    let Some(token) = first_token(directive.text) else {
        return Rewrite::Malformed {
            line: directive.number,
        };
    };

    let previous = &directive.text[token.clone()];
    if previous == code {
        return Rewrite::Unchanged {
            line: directive.number,
        };
    }

    let start = directive.offset + token.start;
    let end = directive.offset + token.end;
    let mut patched = String::with_capacity(content.len() - (end - start) + code.len());
    patched.push_str(&content[..start]);
    patched.push_str(code);
    patched.push_str(&content[end..]);

    Rewrite::Changed {
        content: patched,
        line: directive.number,
        previous: previous.to_string(),
    }
}

// ============================================================================
// File Operations
// ============================================================================

/// Reads the first token of the directive line in `path`.
///
/// Stops reading at the first line containing the marker.
pub fn read_current_code(path: impl AsRef<Path>) -> CurrentCode {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Please give a valid torrc file: {} not found", path.display());
            return CurrentCode::FileMissing;
        }
        Err(e) => {
            warn!("Failed to open torrc {}: {}", path.display(), e);
            return CurrentCode::Unreadable(e.to_string());
        }
    };

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read torrc {}: {}", path.display(), e);
                return CurrentCode::Unreadable(e.to_string());
            }
        };
        if !line.contains(DIRECTIVE_MARKER) {
            continue;
        }
        return match first_token(&line) {
            Some(token) => {
                let code = line[token].to_string();
                debug!("Current exit node {} (line {})", code, index + 1);
                CurrentCode::Configured(code)
            }
            None => {
                warn!(
                    "{} on line {} of {} has no {{code}} token",
                    DIRECTIVE_MARKER,
                    index + 1,
                    path.display()
                );
                CurrentCode::Malformed
            }
        };
    }

    debug!("No {} line in {}", DIRECTIVE_MARKER, path.display());
    CurrentCode::NotConfigured
}

/// Replaces the first token of the directive line in `path` with `new_code`.
///
/// `new_code` must be one of the known codes exactly as written in the torrc
/// (lowercase); anything else is rejected before the file is opened.
pub fn patch_code(path: impl AsRef<Path>, new_code: &str) -> PatchOutcome {
    match NodeCode::ALL.into_iter().find(|node| node.code() == new_code) {
        Some(node) => patch_node(path, node),
        None => {
            warn!("Refusing to write unknown node code {:?}", new_code);
            PatchOutcome::InvalidCode
        }
    }
}

/// Typed variant of [`patch_code`].
pub fn patch_node(path: impl AsRef<Path>, node: NodeCode) -> PatchOutcome {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Please give a valid torrc file: {} not found", path.display());
            return PatchOutcome::FileMissing;
        }
        Err(e) => {
            warn!("Failed to read torrc {}: {}", path.display(), e);
            return PatchOutcome::Failed(e.to_string());
        }
    };

    match rewrite_first_token(&content, node.code()) {
        Rewrite::Changed {
            content,
            line,
            previous,
        } => {
            if let Err(e) = atomic_file::write(path, &content) {
                warn!("Failed to write torrc {}: {}", path.display(), e);
                return PatchOutcome::Failed(e.to_string());
            }
            info!(
                "Exit node {} -> {} on line {} of {}",
                previous,
                node,
                line,
                path.display()
            );
            PatchOutcome::Patched { line, previous }
        }
        Rewrite::Unchanged { line } => {
            debug!("Exit node already {} on line {}", node, line);
            PatchOutcome::Patched {
                line,
                previous: node.code().to_string(),
            }
        }
        Rewrite::NoDirective => {
            info!("No {} line in {}, nothing to patch", DIRECTIVE_MARKER, path.display());
            PatchOutcome::NoDirective
        }
        Rewrite::Malformed { line } => {
            warn!(
                "{} on line {} of {} has no {{code}} token",
                DIRECTIVE_MARKER,
                line,
                path.display()
            );
            PatchOutcome::Malformed { line }
        }
    }
}
