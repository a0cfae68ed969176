//! Validated line table and group index
//!
//! A `LineTable` is only ever produced by validation (see
//! [`crate::artifact::LineArtifact::into_table`]) or from the compiled-in
//! line set, and exposes no mutation. Share it by reference or `Arc`.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use tracing::{info, warn};

use crate::artifact::LineArtifact;
use crate::builtin;
use crate::error::{Error, Result};
use crate::model::{AudioEntry, LineId};

/// Immutable lookup table of voiced lines plus the category index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTable {
    entries: HashMap<LineId, AudioEntry>,
    groups: HashMap<String, Vec<LineId>>,
}

/// Grouped entry whose clip file name names a different category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingMismatch {
    pub group: String,
    pub id: LineId,
    pub file: String,
}

impl LineTable {
    /// Caller guarantees the invariants hold
    pub(crate) fn from_validated(
        entries: HashMap<LineId, AudioEntry>,
        groups: HashMap<String, Vec<LineId>>,
    ) -> Self {
        info!(
            "Line table ready: {} entries, {} groups",
            entries.len(),
            groups.len()
        );
        Self { entries, groups }
    }

    /// Table holding the compiled-in line set
    pub fn builtin() -> Self {
        let (entries, groups) = builtin::parts();
        Self::from_validated(entries, groups)
    }

    /// Parse and validate a JSON artifact
    pub fn from_json_str(json: &str) -> Result<Self> {
        LineArtifact::from_json_str(json)?.into_table()
    }

    /// Read, parse and validate a JSON artifact file
    pub fn load_json(path: &Path) -> Result<Self> {
        let table = LineArtifact::load_json(path)?.into_table()?;
        info!("Loaded {} lines from {}", table.len(), path.display());
        Ok(table)
    }

    /// Look up a line by id
    ///
    /// Zero is never a valid id and is reported as not found.
    pub fn entry(&self, id: u32) -> Result<&AudioEntry> {
        LineId::new(id)
            .and_then(|line| self.entries.get(&line))
            .ok_or_else(|| Error::entry_not_found(id))
    }

    /// Ordered ids of a category
    pub fn group(&self, name: &str) -> Result<&[LineId]> {
        self.groups
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::group_not_found(name))
    }

    /// All category names
    pub fn group_names(&self) -> BTreeSet<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        LineId::new(id).is_some_and(|id| self.entries.contains_key(&id))
    }

    /// Every entry in ascending id order
    pub fn entries(&self) -> Vec<(LineId, &AudioEntry)> {
        let mut all: Vec<_> = self.entries.iter().map(|(id, e)| (*id, e)).collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    /// A category's entries resolved in group order
    pub fn group_entries(&self, name: &str) -> Result<Vec<(LineId, &AudioEntry)>> {
        let ids = self.group(name)?;
        Ok(ids
            .iter()
            .filter_map(|id| self.entries.get(id).map(|e| (*id, e)))
            .collect())
    }

    /// Names of the categories that list `id`, in name order
    pub fn groups_containing(&self, id: u32) -> Vec<&str> {
        let Some(id) = LineId::new(id) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .groups
            .iter()
            .filter(|(_, ids)| ids.contains(&id))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Grouped entries whose clip name points at another category
    ///
    /// Advisory only. Files outside the clip naming convention are skipped.
    pub fn naming_mismatches(&self) -> Vec<NamingMismatch> {
        let mut found = Vec::new();

        let mut names: Vec<&String> = self.groups.keys().collect();
        names.sort();

        for name in names {
            for id in &self.groups[name] {
                let Some(entry) = self.entries.get(id) else {
                    continue;
                };
                let Some(asset) = entry.asset_name() else {
                    continue;
                };
                if !asset.matches_group(name) {
                    warn!(
                        "Line {} in group {} uses clip of category {:?}: {}",
                        id, name, asset.category, entry.file
                    );
                    found.push(NamingMismatch {
                        group: name.clone(),
                        id: *id,
                        file: entry.file.clone(),
                    });
                }
            }
        }

        found
    }
}
