//! Data models for snippets.

/// Snippet models and helpers.
pub mod snippet;

#[cfg(test)]
mod tests;
