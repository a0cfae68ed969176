//! Asset presence checks against an asset root folder

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::LineId;
use crate::table::LineTable;

/// Entry whose asset file is not on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAsset {
    pub id: LineId,
    /// Full path that was checked
    pub path: PathBuf,
}

/// Result of checking every entry's file under one root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetReport {
    pub present: usize,
    pub missing: Vec<MissingAsset>,
}

impl AssetReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Turn missing files into `Error::MissingAssets`
    pub fn into_result(self) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(Error::MissingAssets(
                self.missing.into_iter().map(|m| m.path).collect(),
            ))
        }
    }
}

/// Check that each entry's `file` exists as a regular file under `root`
///
/// Entries are checked in ascending id order. Nothing is opened or decoded.
pub fn verify(table: &LineTable, root: &Path) -> AssetReport {
    let mut report = AssetReport::default();

    for (id, entry) in table.entries() {
        let path = root.join(&entry.file);
        if path.is_file() {
            report.present += 1;
        } else {
            warn!("Asset for line {} not found: {}", id, path.display());
            report.missing.push(MissingAsset { id, path });
        }
    }

    debug!(
        "Asset check under {}: {} present, {} missing",
        root.display(),
        report.present,
        report.missing.len()
    );
    report
}
