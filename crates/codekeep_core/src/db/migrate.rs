//! One-shot conversion of category-based rows into tag-based snippets.
//!
//! Legacy rows live in their own table and are never read by the request path;
//! this module is run explicitly from the server's `--migrate-legacy` flag.

use super::snippet::reverse_timestamp_key;
use super::tables::{LEGACY_SNIPPETS, SNIPPETS, SNIPPETS_BY_CREATED};
use super::Database;
use crate::error::AppError;
use crate::models::snippet::{LegacySnippet, Snippet};
use redb::ReadableTable;

/// Outcome counters for a legacy migration run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub migrated: usize,
    pub skipped_existing: usize,
}

/// Move every legacy row into the snippet table.
///
/// Each row keeps its id and timestamps; its `category` becomes the single
/// normalized tag. A row whose id already exists in the snippet table is
/// counted as skipped and stays in the legacy table untouched; the legacy
/// table is dropped only once it is empty. The whole run is one write
/// transaction.
///
/// # Errors
/// Returns an error when a legacy row cannot be decoded or storage fails; in
/// that case nothing is committed.
pub fn migrate_legacy_snippets(db: &Database) -> Result<MigrationReport, AppError> {
    let mut report = MigrationReport::default();
    let mut migrated_ids = Vec::new();
    let write_txn = db.db.begin_write()?;
    {
        let legacy_rows: Vec<LegacySnippet> = {
            let legacy = write_txn.open_table(LEGACY_SNIPPETS)?;
            let mut rows = Vec::new();
            for item in legacy.iter()? {
                let (_, value) = item?;
                rows.push(bincode::deserialize::<LegacySnippet>(value.value())?);
            }
            rows
        };

        let mut snippets = write_txn.open_table(SNIPPETS)?;
        let mut by_created = write_txn.open_table(SNIPPETS_BY_CREATED)?;
        for legacy in legacy_rows {
            if snippets.get(legacy.id.as_str())?.is_some() {
                tracing::warn!(
                    "Skipping legacy snippet '{}': id already present in snippet table",
                    legacy.id
                );
                report.skipped_existing += 1;
                continue;
            }
            let snippet = Snippet::from(legacy);
            let encoded = bincode::serialize(&snippet)?;
            snippets.insert(snippet.id.as_str(), encoded.as_slice())?;
            by_created.insert(
                (
                    reverse_timestamp_key(snippet.created_at),
                    snippet.id.as_str(),
                ),
                (),
            )?;
            migrated_ids.push(snippet.id);
        }
    }
    report.migrated = migrated_ids.len();

    if report.skipped_existing == 0 {
        write_txn.delete_table(LEGACY_SNIPPETS)?;
    } else {
        let mut legacy = write_txn.open_table(LEGACY_SNIPPETS)?;
        for id in &migrated_ids {
            legacy.remove(id.as_str())?;
        }
    }
    write_txn.commit()?;

    tracing::info!(
        "Legacy migration finished: {} migrated, {} skipped",
        report.migrated,
        report.skipped_existing
    );
    Ok(report)
}
