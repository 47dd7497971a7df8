//! Deterministic JSON snapshot output

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::normalizer::StockRecord;
use crate::error::SyncResult;

/// Sort records by SKU. Stable, so equal SKUs keep their table order.
pub fn sort_records(records: &mut [StockRecord]) {
    records.sort_by(|a, b| a.sku.cmp(&b.sku));
}

/// Render records as 2-space indented JSON with non-ASCII text left literal
pub fn render_snapshot(records: &[StockRecord]) -> SyncResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Sort, render and write the snapshot, replacing any previous file.
///
/// Content goes to a sibling temporary file first and is renamed into place,
/// so readers never see a partially written snapshot.
pub fn write_snapshot(path: &Path, mut records: Vec<StockRecord>) -> SyncResult<usize> {
    sort_records(&mut records);
    let content = render_snapshot(&records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    let staged = fs::write(&staging, content.as_bytes()).and_then(|_| fs::rename(&staging, path));
    if let Err(err) = staged {
        // Never leave a partial staging file next to the snapshot
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }

    info!("Wrote {} items -> {}", records.len(), path.display());
    Ok(records.len())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
