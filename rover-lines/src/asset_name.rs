//! Clip file naming convention
//!
//! Recorded clips are named `{category}_{tier}_{variant}.{ext}`, e.g.
//! `saw_human_2_0.mp3` is the first HIGH-intensity clip of the
//! `saw_human` category. The category may itself contain underscores, so
//! the last two segments of the stem are always tier and variant.

use std::fmt;
use std::path::Path;

/// Delivery intensity a clip was recorded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Intensity {
    Low = 0,
    Mid = 1,
    High = 2,
}

impl Intensity {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Intensity::Low),
            1 => Some(Intensity::Mid),
            2 => Some(Intensity::High),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intensity::Low => write!(f, "LOW"),
            Intensity::Mid => write!(f, "MID"),
            Intensity::High => write!(f, "HIGH"),
        }
    }
}

/// Decoded clip file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetName {
    /// Lowercase category as written in the file name
    pub category: String,
    pub tier: Intensity,
    pub variant: u32,
}

impl AssetName {
    /// Decode the file name part of `path`
    ///
    /// Returns `None` for names outside the convention; that is not an error,
    /// the table accepts any non-empty path.
    pub fn parse(path: &str) -> Option<Self> {
        let stem = Path::new(path).file_stem()?.to_str()?;

        let mut parts = stem.rsplitn(3, '_');
        let variant = parts.next()?;
        let tier = parts.next()?;
        let category = parts.next()?;

        if category.is_empty() || !is_digits(variant) || !is_digits(tier) {
            return None;
        }

        Some(AssetName {
            category: category.to_string(),
            tier: Intensity::from_level(tier.parse().ok()?)?,
            variant: variant.parse().ok()?,
        })
    }

    /// Whether this clip belongs to the named group (case-insensitive)
    pub fn matches_group(&self, group: &str) -> bool {
        self.category.eq_ignore_ascii_case(group)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
