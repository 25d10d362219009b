//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Canonical snippet rows (`Snippet`, bincode-encoded).
pub const SNIPPETS: TableDefinition<&str, &[u8]> = TableDefinition::new("snippets_v2");

/// Creation-recency index ordered by reverse creation nanoseconds, then id.
pub const SNIPPETS_BY_CREATED: TableDefinition<(u64, &str), ()> =
    TableDefinition::new("snippets_by_created");

/// Rows written with the single-`category` schema, awaiting migration.
pub const LEGACY_SNIPPETS: TableDefinition<&str, &[u8]> = TableDefinition::new("snippets_v1");
