use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::record::{AuditRecord, RankedImage};
use crate::scan::{rank_top, CombinationScan};

/// class → subject → ranked images, as read by the gallery views.
pub type RankedIndex = BTreeMap<String, BTreeMap<String, Vec<RankedImage>>>;

/// Write pretty JSON, replacing any previous file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json)
}

pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// All kept records in grid order.
pub fn flatten(scans: &[CombinationScan]) -> Vec<&AuditRecord> {
    scans.iter().flat_map(|s| s.records()).collect()
}

/// Top `top` records per combination. Missing directories map to an empty list.
pub fn ranked_index(scans: &[CombinationScan], top: usize) -> RankedIndex {
    let mut index = RankedIndex::new();
    for scan in scans {
        let images = rank_top(scan.records(), top)
            .into_iter()
            .map(RankedImage::from)
            .collect();
        index
            .entry(scan.class.clone())
            .or_default()
            .insert(scan.subject.clone(), images);
    }
    index
}
