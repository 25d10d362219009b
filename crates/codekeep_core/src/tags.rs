//! Tag normalization and matching helpers.
//!
//! Tags are stored lowercase and trimmed, deduplicated case-insensitively while
//! keeping first-occurrence order.

/// Normalize a single tag token.
///
/// # Returns
/// The trimmed, lowercased tag, or `None` when it is blank.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalize a tag list into the stored representation.
///
/// `["CSS", "css", "React"]` becomes `["css", "react"]`.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in raw {
        let Some(tag) = normalize_tag(tag.as_ref()) else {
            continue;
        };
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Case-insensitive exact membership test used by tag filters.
pub fn has_tag(tags: &[String], wanted: &str) -> bool {
    let wanted = wanted.trim();
    tags.iter()
        .any(|tag| tag.trim().to_lowercase() == wanted.to_lowercase())
}

/// Case-insensitive substring test. `needle_lower` must already be lowercase.
pub fn contains_case_insensitive(haystack: &str, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    if needle_lower.is_ascii() {
        let needle = needle_lower.as_bytes();
        let hay = haystack.as_bytes();
        if needle.len() > hay.len() {
            return false;
        }
        return hay
            .windows(needle.len())
            .any(|window| window.iter().map(u8::to_ascii_lowercase).eq(needle.iter().copied()));
    }
    haystack.to_lowercase().contains(needle_lower)
}
