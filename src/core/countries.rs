//! # Exit Node Countries
//!
//! The closed vocabulary of exit-node countries and their Tor node codes.
//!
//! ```text
//! Belgium     ↔ be        Spain       ↔ sp
//! France      ↔ fr        Switzerland ↔ ch
//! Italy       ↔ it        USA         ↔ us
//! Japan       ↔ jp
//! ```
//!
//! Two layers:
//! - [`NodeCode`]: typed lookups returning `Option`
//! - [`code_of`] / [`name_of`]: string lookups returning [`LOOKUP_ERROR`] for
//!   unknown input, for callers that only deal in strings (CLI, torrc tokens)

use log::warn;
use std::fmt;
use std::str::FromStr;

/// Token returned by the string lookups when the input is not in the table.
pub const LOOKUP_ERROR: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCode {
    Be,
    Fr,
    It,
    Jp,
    Sp,
    Ch,
    Us,
}

impl NodeCode {
    /// All codes, in the order the menu lists their countries.
    pub const ALL: [NodeCode; 7] = [
        NodeCode::Be,
        NodeCode::Fr,
        NodeCode::It,
        NodeCode::Jp,
        NodeCode::Sp,
        NodeCode::Ch,
        NodeCode::Us,
    ];

    /// The two-letter code as written inside `{...}` in the torrc.
    pub fn code(self) -> &'static str {
        match self {
            NodeCode::Be => "be",
            NodeCode::Fr => "fr",
            NodeCode::It => "it",
            NodeCode::Jp => "jp",
            NodeCode::Sp => "sp",
            NodeCode::Ch => "ch",
            NodeCode::Us => "us",
        }
    }

    /// Display name of the country.
    pub fn country(self) -> &'static str {
        match self {
            NodeCode::Be => "Belgium",
            NodeCode::Fr => "France",
            NodeCode::It => "Italy",
            NodeCode::Jp => "Japan",
            NodeCode::Sp => "Spain",
            NodeCode::Ch => "Switzerland",
            NodeCode::Us => "USA",
        }
    }

    /// Case-insensitive lookup by node code.
    pub fn parse(code: &str) -> Option<NodeCode> {
        Self::ALL
            .into_iter()
            .find(|node| node.code().eq_ignore_ascii_case(code))
    }

    /// Case-insensitive lookup by country name.
    pub fn from_country(name: &str) -> Option<NodeCode> {
        Self::ALL
            .into_iter()
            .find(|node| node.country().eq_ignore_ascii_case(name))
    }

    /// Position in [`NodeCode::ALL`].
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|&node| node == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for NodeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCountry(pub String);

impl fmt::Display for UnknownCountry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} not listed or unknown", self.0)
    }
}

impl std::error::Error for UnknownCountry {}

/// Accepts either a node code (`fr`) or a country name (`France`).
impl FromStr for NodeCode {
    type Err = UnknownCountry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NodeCode::parse(trimmed)
            .or_else(|| NodeCode::from_country(trimmed))
            .ok_or_else(|| UnknownCountry(trimmed.to_string()))
    }
}

/// Country name → node code, or [`LOOKUP_ERROR`].
pub fn code_of(country: &str) -> &'static str {
    match NodeCode::from_country(country) {
        Some(node) => node.code(),
        None => {
            warn!("{} not listed or unknown", country);
            LOOKUP_ERROR
        }
    }
}

/// Node code → country name, or [`LOOKUP_ERROR`].
pub fn name_of(code: &str) -> &'static str {
    match NodeCode::parse(code) {
        Some(node) => node.country(),
        None => {
            warn!("Node code {} not listed or unknown", code);
            LOOKUP_ERROR
        }
    }
}
