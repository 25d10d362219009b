//! Tag-driven syntect grammar resolution and terminal highlighting.

use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

const DEFAULT_THEME: &str = "base16-ocean.dark";
const PLAIN_TEXT_LABELS: &[&str] = &["text", "txt", "plain", "plaintext"];

fn normalized_syntax_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn alias_candidates(tag_lower: &str) -> &'static [&'static str] {
    match tag_lower {
        "cs" | "csharp" => &["C#", "cs"],
        "shell" | "bash" | "zsh" => &["Bourne Again Shell (bash)", "sh"],
        "cpp" | "c++" => &["C++", "cpp"],
        "objectivec" => &["Objective-C", "m"],
        "typescript" | "ts" | "react" | "jsx" => &["JavaScript", "js"],
        "golang" => &["Go", "go"],
        _ => &[],
    }
}

fn find_candidate<'a>(ps: &'a SyntaxSet, candidate: &str) -> Option<&'a SyntaxReference> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(syntax) = ps.find_syntax_by_name(trimmed) {
        return Some(syntax);
    }
    if let Some(syntax) = ps.find_syntax_by_extension(trimmed) {
        return Some(syntax);
    }

    let normalized = normalized_syntax_key(trimmed);
    if normalized.is_empty() {
        return None;
    }
    ps.syntaxes().iter().find(|syntax| {
        normalized_syntax_key(&syntax.name) == normalized
            || syntax
                .file_extensions
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(trimmed))
    })
}

/// Grammar for a single tag, if syntect knows it (directly or via alias).
fn syntax_for_tag<'a>(ps: &'a SyntaxSet, tag: &str) -> Option<&'a SyntaxReference> {
    let lower = tag.trim().to_ascii_lowercase();
    if lower.is_empty() || PLAIN_TEXT_LABELS.contains(&lower.as_str()) {
        return None;
    }
    find_candidate(ps, &lower).or_else(|| {
        alias_candidates(&lower)
            .iter()
            .find_map(|candidate| find_candidate(ps, candidate))
    })
}

/// Loaded syntect grammars and themes.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }
}

impl Highlighter {
    /// Grammar for a snippet: the first recognized tag wins, else plain text.
    pub fn syntax_for_tags(&self, tags: &[String]) -> &SyntaxReference {
        tags.iter()
            .find_map(|tag| syntax_for_tag(&self.syntaxes, tag))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    /// Display name of the grammar chosen for `tags` (e.g. `"Python"`).
    pub fn language_for_tags(&self, tags: &[String]) -> &str {
        self.syntax_for_tags(tags).name.as_str()
    }

    /// Render `code` with 24-bit ANSI colors for a terminal.
    ///
    /// # Errors
    /// Returns a syntect error when a line cannot be tokenized.
    pub fn highlight_for_terminal(
        &self,
        code: &str,
        tags: &[String],
    ) -> Result<String, syntect::Error> {
        let theme = self
            .themes
            .themes
            .get(DEFAULT_THEME)
            .or_else(|| self.themes.themes.values().next());
        let Some(theme) = theme else {
            return Ok(code.to_string());
        };

        let mut highlighter = HighlightLines::new(self.syntax_for_tags(tags), theme);
        let mut out = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            let ranges = highlighter.highlight_line(line, &self.syntaxes)?;
            out.push_str(&as_24_bit_terminal_escaped(&ranges, false));
        }
        out.push_str("\x1b[0m");
        Ok(out)
    }
}
