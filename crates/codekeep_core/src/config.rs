//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_MAX_SNIPPET_SIZE, DEFAULT_PORT};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Runtime configuration for the CodeKeep server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_snippet_size: usize,
    /// Extra browser origin allowed by CORS (e.g. a dev server for the web client).
    pub client_origin: Option<String>,
}

fn expand_tilde(path: String, home: Option<PathBuf>) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir<F>(lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(home) = non_blank("HOME") {
        return Some(PathBuf::from(home));
    }

    // Windows USERPROFILE
    if let Some(profile) = non_blank("USERPROFILE") {
        return Some(PathBuf::from(profile));
    }

    std::env::current_dir().ok()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

impl Config {
    /// Load configuration from process environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = resolve_home_dir(&lookup);
        let db_path = match lookup("DB_PATH").filter(|value| !value.trim().is_empty()) {
            Some(path) => expand_tilde(path, home),
            None => {
                let base = home.unwrap_or_else(|| PathBuf::from("."));
                base.join(".cache")
                    .join("codekeep")
                    .join("db")
                    .to_string_lossy()
                    .to_string()
            }
        };

        Self {
            db_path,
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            max_snippet_size: lookup("MAX_SNIPPET_SIZE")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_SNIPPET_SIZE),
            client_origin: lookup("CLIENT_ORIGIN")
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_env_flag, Config};
    use crate::constants::{DEFAULT_MAX_SNIPPET_SIZE, DEFAULT_PORT};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = Config::from_lookup(lookup_from(&[("HOME", "/home/keeper")]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_snippet_size, DEFAULT_MAX_SNIPPET_SIZE);
        assert_eq!(config.db_path, "/home/keeper/.cache/codekeep/db");
        assert!(config.client_origin.is_none());
    }

    #[test]
    fn explicit_values_override_defaults_and_expand_tilde() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOME", "/home/keeper"),
            ("DB_PATH", "~/snippets/db"),
            ("PORT", "6060"),
            ("MAX_SNIPPET_SIZE", "2048"),
            ("CLIENT_ORIGIN", "http://localhost:5173/"),
        ]));
        assert_eq!(config.db_path, "/home/keeper/snippets/db");
        assert_eq!(config.port, 6060);
        assert_eq!(config.max_snippet_size, 2048);
        assert_eq!(
            config.client_origin.as_deref(),
            Some("http://localhost:5173")
        );
    }

    #[test]
    fn unparseable_numbers_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOME", "/home/keeper"),
            ("PORT", "not-a-port"),
            ("MAX_SNIPPET_SIZE", "-1"),
        ]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_snippet_size, DEFAULT_MAX_SNIPPET_SIZE);
    }
}
