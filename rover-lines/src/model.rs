//! Line identifiers and audio entries

use std::fmt;
use std::num::NonZeroU32;
use std::path::{Component, Path};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::asset_name::AssetName;
use crate::error::Violation;

/// Numeric identifier of a voiced line
///
/// Always positive. Artifacts encode ids as decimal strings (`"322"`), the
/// group index encodes them as plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct LineId(NonZeroU32);

impl LineId {
    /// Returns `None` for zero
    pub const fn new(id: u32) -> Option<Self> {
        match NonZeroU32::new(id) {
            Some(n) => Some(LineId(n)),
            None => None,
        }
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for LineId {
    type Error = Violation;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        LineId::new(id).ok_or_else(|| Violation::InvalidId(id.to_string()))
    }
}

impl From<LineId> for u32 {
    fn from(id: LineId) -> Self {
        id.get()
    }
}

impl FromStr for LineId {
    type Err = Violation;

    /// Strict decimal parse: digits only, no sign, no whitespace, no
    /// leading zero
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Violation::InvalidId(s.to_string());

        if s.is_empty() || s.starts_with('0') || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let n: u32 = s.parse().map_err(|_| invalid())?;
        LineId::new(n).ok_or_else(invalid)
    }
}

/// Container family of an asset file, judged by extension only
///
/// Some lines are stored in video containers that carry audio only; the
/// path is kept untouched either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioContainer {
    Audio,
    Video,
    Unknown,
}

impl AudioContainer {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" | "wav" | "ogg" | "opus" | "flac" => AudioContainer::Audio,
            "mov" | "mp4" | "m4v" => AudioContainer::Video,
            _ => AudioContainer::Unknown,
        }
    }
}

/// A single voiced line: asset path plus caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AudioEntry {
    /// Asset path relative to the asset root
    pub file: String,
    /// Caption, the transcript of the audio
    pub text: String,
}

impl AudioEntry {
    pub fn new(file: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            text: text.into(),
        }
    }

    /// File extension without the dot, if any
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.file).extension().and_then(|e| e.to_str())
    }

    /// True when `file` is relative and never steps above its starting folder
    pub fn has_contained_path(&self) -> bool {
        Path::new(&self.file)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    }

    pub fn container(&self) -> AudioContainer {
        self.extension()
            .map(AudioContainer::from_extension)
            .unwrap_or(AudioContainer::Unknown)
    }

    /// Decoded clip name, when the file follows the clip naming convention
    pub fn asset_name(&self) -> Option<AssetName> {
        AssetName::parse(&self.file)
    }
}
