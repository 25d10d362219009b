//! Client-side snippet cache and filter logic.
//!
//! The cache mirrors the last list fetched from the service plus patches for
//! mutations the service has confirmed. It never applies request payloads.

use codekeep_core::models::snippet::Snippet;
use codekeep_core::tags::has_tag;
use codekeep_core::ALL_TAGS;

/// Keep only snippets carrying `tag` (case-insensitive exact match).
///
/// The sentinel [`ALL_TAGS`] keeps everything.
pub fn filter_by_tag(items: Vec<Snippet>, tag: &str) -> Vec<Snippet> {
    if is_all_tags(tag) {
        return items;
    }
    items
        .into_iter()
        .filter(|snippet| has_tag(&snippet.tags, tag))
        .collect()
}

fn is_all_tags(tag: &str) -> bool {
    let tag = tag.trim();
    tag.is_empty() || tag == ALL_TAGS
}

/// In-memory snippet list plus the active search/tag filters and selection.
#[derive(Debug, Clone)]
pub struct SnippetCache {
    snippets: Vec<Snippet>,
    search_text: String,
    active_tag: String,
    selected: Option<Snippet>,
}

impl Default for SnippetCache {
    fn default() -> Self {
        Self {
            snippets: Vec::new(),
            search_text: String::new(),
            active_tag: ALL_TAGS.to_string(),
            selected: None,
        }
    }
}

impl SnippetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snippets in fetched order.
    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    /// Search text to send with the next list request, `None` when blank.
    pub fn search_query(&self) -> Option<&str> {
        Some(self.search_text.trim()).filter(|text| !text.is_empty())
    }

    /// Update the search text.
    ///
    /// # Returns
    /// `true` when the value changed and a re-query is due.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.search_text {
            return false;
        }
        self.search_text = text;
        true
    }

    pub fn active_tag(&self) -> &str {
        &self.active_tag
    }

    /// Switch the tag filter; blank input selects [`ALL_TAGS`].
    ///
    /// # Returns
    /// `true` when the value changed and a re-query is due.
    pub fn set_active_tag(&mut self, tag: &str) -> bool {
        let tag = if is_all_tags(tag) {
            ALL_TAGS.to_string()
        } else {
            tag.trim().to_string()
        };
        if tag == self.active_tag {
            return false;
        }
        self.active_tag = tag;
        true
    }

    /// Replace the cached list with a fresh service response, applying the
    /// active tag filter.
    pub fn apply_list(&mut self, items: Vec<Snippet>) {
        self.snippets = filter_by_tag(items, &self.active_tag);
    }

    /// `"All"` followed by every distinct tag across loaded snippets,
    /// first-seen order, deduplicated case-insensitively.
    pub fn tag_vocabulary(&self) -> Vec<String> {
        let mut vocabulary = vec![ALL_TAGS.to_string()];
        let mut seen: Vec<String> = Vec::new();
        for tag in self.snippets.iter().flat_map(|snippet| snippet.tags.iter()) {
            let key = tag.trim().to_lowercase();
            if key.is_empty() || seen.contains(&key) {
                continue;
            }
            seen.push(key);
            vocabulary.push(tag.clone());
        }
        vocabulary
    }

    /// Favorites first, otherwise fetched order (stable partition).
    pub fn display_order(&self) -> Vec<&Snippet> {
        let (mut favorites, rest): (Vec<&Snippet>, Vec<&Snippet>) =
            self.snippets.iter().partition(|snippet| snippet.is_favorite);
        favorites.extend(rest);
        favorites
    }

    pub fn selected(&self) -> Option<&Snippet> {
        self.selected.as_ref()
    }

    /// Select a cached snippet by id.
    ///
    /// # Returns
    /// `false` when the id is not in the cache (selection unchanged).
    pub fn select(&mut self, id: &str) -> bool {
        match self.snippets.iter().find(|snippet| snippet.id == id) {
            Some(snippet) => {
                self.selected = Some(snippet.clone());
                true
            }
            None => false,
        }
    }

    /// Select a snippet loaded on its own (it may be outside the current list).
    pub fn select_loaded(&mut self, snippet: Snippet) {
        self.replace_in_place(&snippet);
        self.selected = Some(snippet);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Confirmed create: insert at the head and select it.
    pub fn apply_created(&mut self, snippet: Snippet) {
        self.snippets.retain(|existing| existing.id != snippet.id);
        self.snippets.insert(0, snippet.clone());
        self.selected = Some(snippet);
    }

    /// Confirmed update: replace in place and refresh the selection.
    pub fn apply_updated(&mut self, snippet: Snippet) {
        self.replace_in_place(&snippet);
        self.refresh_selection(snippet);
    }

    /// Confirmed favorite toggle: replace in place without reordering.
    pub fn apply_favorite_toggled(&mut self, snippet: Snippet) {
        self.replace_in_place(&snippet);
        self.refresh_selection(snippet);
    }

    /// Confirmed delete: remove by id and clear the selection if it matched.
    pub fn apply_deleted(&mut self, id: &str) {
        self.snippets.retain(|snippet| snippet.id != id);
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = None;
        }
    }

    fn replace_in_place(&mut self, snippet: &Snippet) {
        if let Some(slot) = self.snippets.iter_mut().find(|s| s.id == snippet.id) {
            *slot = snippet.clone();
        }
    }

    fn refresh_selection(&mut self, snippet: Snippet) {
        if self.selected.as_ref().is_some_and(|s| s.id == snippet.id) {
            self.selected = Some(snippet);
        }
    }
}
