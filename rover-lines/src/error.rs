//! Common error types for rover lines

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::LineId;

/// Common result type for rover lines operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which index a failed lookup was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Entry,
    Group,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Entry => write!(f, "entry"),
            LookupKind::Group => write!(f, "group"),
        }
    }
}

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    /// Lookup key is not present in the table
    #[error("Not found: {kind} {key}")]
    NotFound { kind: LookupKind, key: String },

    /// Line data violates the table invariants (fatal at load time)
    #[error("Malformed line data: {0}")]
    Malformed(Violations),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact could not be decoded
    #[error("Artifact parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Referenced asset files are absent from the asset root
    #[error("Missing assets: {}", display_paths(.0))]
    MissingAssets(Vec<PathBuf>),
}

impl Error {
    pub(crate) fn entry_not_found(id: impl fmt::Display) -> Self {
        Error::NotFound {
            kind: LookupKind::Entry,
            key: id.to_string(),
        }
    }

    pub(crate) fn group_not_found(name: &str) -> Self {
        Error::NotFound {
            kind: LookupKind::Group,
            key: name.to_string(),
        }
    }

    /// True for `NotFound` errors of either kind
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Violations carried by a `Malformed` error, empty for every other kind
    pub fn violations(&self) -> &[Violation] {
        match self {
            Error::Malformed(v) => v.as_slice(),
            _ => &[],
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single broken invariant found while validating line data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Key is not a positive integer
    #[error("invalid line id {0:?}")]
    InvalidId(String),

    #[error("duplicate line id {0}")]
    DuplicateId(LineId),

    #[error("line {0} has an empty file path")]
    EmptyFile(LineId),

    #[error("line {0} has empty caption text")]
    EmptyText(LineId),

    /// File path is absolute or climbs out of the asset root
    #[error("line {0} has a file path outside the asset root")]
    EscapingPath(LineId),

    #[error("group with empty name")]
    EmptyGroupName,

    #[error("duplicate group {0:?}")]
    DuplicateGroup(String),

    /// Group lists an id with no entry in the table
    #[error("group {group:?} references unknown line {id}")]
    DanglingReference { group: String, id: LineId },
}

/// Every violation found in one validation pass, in discovery order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    /// `Ok(())` when nothing was recorded, otherwise `Error::Malformed`
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Malformed(self))
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.0.len())?;
        for (i, v) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, v)?;
        }
        Ok(())
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(v: Vec<Violation>) -> Self {
        Self(v)
    }
}
