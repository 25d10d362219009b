//! Snippet storage operations backed by redb.

mod helpers;

use crate::{db::tables::*, error::AppError, models::snippet::*};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

use self::helpers::{apply_update_request, deserialize_snippet, snippet_matches};

pub(crate) use self::helpers::reverse_timestamp_key;

/// Accessor for snippet-related redb tables.
pub struct SnippetDb {
    db: Arc<redb::Database>,
}

impl SnippetDb {
    /// Initialize snippet tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(SNIPPETS)?;
        write_txn.open_table(SNIPPETS_BY_CREATED)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new snippet row and its recency index entry atomically.
    ///
    /// # Errors
    /// Returns an error when serialization fails, the id already exists, or
    /// storage operations fail.
    pub fn create(&self, snippet: &Snippet) -> Result<(), AppError> {
        let encoded = bincode::serialize(snippet)?;
        let recency_key = reverse_timestamp_key(snippet.created_at);

        let write_txn = self.db.begin_write()?;
        {
            let mut snippets = write_txn.open_table(SNIPPETS)?;
            let mut by_created = write_txn.open_table(SNIPPETS_BY_CREATED)?;

            if snippets.get(snippet.id.as_str())?.is_some() {
                return Err(AppError::Storage(format!(
                    "Snippet id '{}' already exists",
                    snippet.id
                )));
            }

            snippets.insert(snippet.id.as_str(), encoded.as_slice())?;
            by_created.insert((recency_key, snippet.id.as_str()), ())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Fetch a snippet by id.
    ///
    /// # Returns
    /// `Ok(Some(snippet))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<Snippet>, AppError> {
        let read_txn = self.db.begin_read()?;
        let snippets = read_txn.open_table(SNIPPETS)?;
        match snippets.get(id)? {
            Some(value) => Ok(Some(deserialize_snippet(value.value())?)),
            None => Ok(None),
        }
    }

    /// Apply a partial update to a snippet and bump `updated_at`.
    ///
    /// The creation index is untouched because `created_at` never changes.
    ///
    /// # Returns
    /// `Ok(Some(snippet))` when updated, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn update(
        &self,
        id: &str,
        update: &UpdateSnippetRequest,
    ) -> Result<Option<Snippet>, AppError> {
        self.mutate(id, |snippet| apply_update_request(snippet, update))
    }

    /// Flip `is_favorite` inside a single write transaction.
    ///
    /// # Returns
    /// `Ok(Some(snippet))` with the new flag, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn toggle_favorite(&self, id: &str) -> Result<Option<Snippet>, AppError> {
        self.mutate(id, |snippet| {
            snippet.is_favorite = !snippet.is_favorite;
            snippet.touch();
        })
    }

    fn mutate<F>(&self, id: &str, apply: F) -> Result<Option<Snippet>, AppError>
    where
        F: FnOnce(&mut Snippet),
    {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut snippets = write_txn.open_table(SNIPPETS)?;

            let Some(old_guard) = snippets.get(id)? else {
                return Ok(None);
            };
            let mut snippet = deserialize_snippet(old_guard.value())?;
            drop(old_guard);

            apply(&mut snippet);

            let encoded = bincode::serialize(&snippet)?;
            snippets.insert(id, encoded.as_slice())?;
            snippet
        };

        write_txn.commit()?;
        Ok(Some(updated))
    }

    /// Delete a snippet and return the deleted row.
    ///
    /// # Returns
    /// `Ok(Some(snippet))` when deleted, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn delete_and_return(&self, id: &str) -> Result<Option<Snippet>, AppError> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut snippets = write_txn.open_table(SNIPPETS)?;
            let mut by_created = write_txn.open_table(SNIPPETS_BY_CREATED)?;

            let Some(old_guard) = snippets.get(id)? else {
                return Ok(None);
            };
            let snippet = deserialize_snippet(old_guard.value())?;
            let recency_key = reverse_timestamp_key(snippet.created_at);
            drop(old_guard);

            let _ = by_created.remove((recency_key, id))?;
            let _ = snippets.remove(id)?;
            snippet
        };

        write_txn.commit()?;
        Ok(Some(deleted))
    }

    /// List snippets newest-created first, optionally filtered by a search text.
    ///
    /// A non-blank `search` keeps snippets whose title, description, or any tag
    /// contains it case-insensitively. Results are not ranked.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list(&self, search: Option<&str>) -> Result<Vec<Snippet>, AppError> {
        let query_lower = search
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase);

        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(SNIPPETS_BY_CREATED)?;
        let snippets_table = read_txn.open_table(SNIPPETS)?;
        let mut snippets = Vec::new();

        for item in index.iter()? {
            let (key, _) = item?;
            let (_, snippet_id) = key.value();
            let Some(guard) = snippets_table.get(snippet_id)? else {
                tracing::warn!("Recency index references missing snippet '{}'", snippet_id);
                continue;
            };
            let snippet = deserialize_snippet(guard.value())?;
            if let Some(query) = query_lower.as_deref() {
                if !snippet_matches(&snippet, query) {
                    continue;
                }
            }
            snippets.push(snippet);
        }

        Ok(snippets)
    }
}

#[cfg(test)]
mod tests;
