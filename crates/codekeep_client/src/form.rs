//! Create/edit form state with discrete tag tokens.

use codekeep_core::models::snippet::{CreateSnippetRequest, Snippet, UpdateSnippetRequest};
use codekeep_core::tags::{has_tag, normalize_tag};
use thiserror::Error;

/// Client-side validation failure; nothing is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Code is required")]
    CodeRequired,
}

/// Keys with special meaning in the tag input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKey {
    Enter,
    Comma,
    Backspace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// A validated form ready to be sent to the service.
#[derive(Debug, Clone)]
pub enum FormSubmission {
    Create(CreateSnippetRequest),
    Update {
        id: String,
        request: UpdateSnippetRequest,
    },
}

#[derive(Debug, Clone)]
pub struct SnippetForm {
    mode: FormMode,
    pub title: String,
    pub description: String,
    pub code: String,
    tags: Vec<String>,
    tag_input: String,
}

impl SnippetForm {
    /// Empty form for a new snippet.
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            title: String::new(),
            description: String::new(),
            code: String::new(),
            tags: Vec::new(),
            tag_input: String::new(),
        }
    }

    /// Form pre-filled from an existing snippet.
    pub fn for_edit(snippet: &Snippet) -> Self {
        Self {
            mode: FormMode::Edit {
                id: snippet.id.clone(),
            },
            title: snippet.title.clone(),
            description: snippet.description.clone().unwrap_or_default(),
            code: snippet.code.clone(),
            tags: snippet.tags.clone(),
            tag_input: String::new(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn tag_input(&self) -> &str {
        &self.tag_input
    }

    /// Replace the in-progress tag text. Commas inside `text` act as
    /// delimiters, so pasting `"a, b, c"` commits `a` and `b` and leaves `c`.
    pub fn set_tag_input(&mut self, text: &str) {
        let mut parts: Vec<&str> = text.split(',').collect();
        let rest = parts.pop().unwrap_or_default();
        for part in parts {
            self.add_tag(part);
        }
        self.tag_input = rest.to_string();
    }

    /// Handle a key press in the tag input.
    ///
    /// # Returns
    /// `true` when the tag list changed.
    pub fn handle_tag_key(&mut self, key: TagKey) -> bool {
        match key {
            TagKey::Enter | TagKey::Comma => self.commit_tag_input(),
            TagKey::Backspace => self.tag_input.is_empty() && self.tags.pop().is_some(),
        }
    }

    /// Turn the in-progress text into a tag and clear the input.
    ///
    /// # Returns
    /// `true` when a new tag was added.
    pub fn commit_tag_input(&mut self) -> bool {
        let pending = std::mem::take(&mut self.tag_input);
        self.add_tag(&pending)
    }

    /// Add a tag token; blank or already-present tags are ignored.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let Some(tag) = normalize_tag(raw) else {
            return false;
        };
        if has_tag(&self.tags, &tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove the tag at `index`, if any.
    pub fn remove_tag(&mut self, index: usize) -> Option<String> {
        (index < self.tags.len()).then(|| self.tags.remove(index))
    }

    /// Check required fields without modifying the form.
    ///
    /// # Errors
    /// Returns the first missing required field.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::TitleRequired);
        }
        if self.code.trim().is_empty() {
            return Err(FormError::CodeRequired);
        }
        Ok(())
    }

    /// Commit any in-progress tag, validate, and build the request.
    ///
    /// # Errors
    /// Returns [`FormError`] when title or code is blank; the in-progress tag
    /// is still committed so the user does not lose it.
    pub fn finalize(&mut self) -> Result<FormSubmission, FormError> {
        self.commit_tag_input();
        self.validate()?;

        let title = self.title.trim().to_string();
        let tags = self.tags.clone();
        let code = self.code.clone();
        Ok(match &self.mode {
            FormMode::Create => FormSubmission::Create(CreateSnippetRequest {
                title: Some(title),
                tags: Some(tags),
                description: Some(self.description.trim().to_string())
                    .filter(|d| !d.is_empty()),
                code: Some(code),
            }),
            FormMode::Edit { id } => FormSubmission::Update {
                id: id.clone(),
                request: UpdateSnippetRequest {
                    title: Some(title),
                    tags: Some(tags),
                    // Empty string clears the stored description.
                    description: Some(self.description.trim().to_string()),
                    code: Some(code),
                    is_favorite: None,
                },
            },
        })
    }
}

impl Default for SnippetForm {
    fn default() -> Self {
        Self::new()
    }
}
