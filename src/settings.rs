//! Application settings
//!
//! Stored as JSON. Every field has a default, so a missing or partial file
//! is fine. Environment variables take precedence over the file.

use crate::roster::ExtractionOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Canvas instance root, without `/api/v1`
    #[serde(default = "default_canvas_base_url")]
    pub canvas_base_url: String,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory holding index.html and the frontend assets
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: PathBuf,
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default)]
    pub roster: ExtractionOptions,
}

fn default_canvas_base_url() -> String {
    "https://usflearn.instructure.com".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:8765".to_string()
}

fn default_frontend_dir() -> PathBuf {
    PathBuf::from("frontend")
}

fn default_upstream_timeout_secs() -> u64 {
    30
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_base_url: default_canvas_base_url(),
            bind: default_bind(),
            frontend_dir: default_frontend_dir(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
            roster: ExtractionOptions::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk or fall back to defaults
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Settings::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
                Settings::default()
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read settings file");
                Settings::default()
            }
        }
    }

    /// Apply overrides from a variable lookup (normally the process env)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(url) = var("CANVAS_BASE_URL") {
            self.canvas_base_url = url;
        }
        if let Some(bind) = var("ASSESSMENT_BIND") {
            self.bind = bind;
        }
        if let Some(dir) = var("ASSESSMENT_FRONTEND_DIR") {
            self.frontend_dir = PathBuf::from(dir);
        }
        if let Some(raw) = var("ROSTER_MAJOR_HEADER_MAX_LEN") {
            match raw.parse() {
                Ok(n) => self.roster.major_header_max_len = n,
                Err(_) => tracing::warn!(value = %raw, "ignoring non-numeric ROSTER_MAJOR_HEADER_MAX_LEN"),
            }
        }
    }

    pub fn with_env_overrides(mut self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok());
        self
    }

    /// Canvas REST root, e.g. `https://usflearn.instructure.com/api/v1`
    pub fn api_base(&self) -> String {
        format!("{}/api/v1", self.canvas_base_url.trim_end_matches('/'))
    }
}

/// Settings file location: explicit path, then `ASSESSMENT_CONFIG`, then
/// the per-user config directory
pub fn find_settings_file(arg: Option<&Path>) -> PathBuf {
    if let Some(path) = arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var("ASSESSMENT_CONFIG") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs::config_dir()
        .map(|p| p.join("assessment-bridge/settings.json"))
        .unwrap_or_else(|| PathBuf::from("settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json"));
        assert_eq!(settings.canvas_base_url, "https://usflearn.instructure.com");
        assert_eq!(settings.bind, "0.0.0.0:8765");
        assert_eq!(settings.roster.major_header_max_len, 50);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"canvas_base_url": "https://canvas.test", "roster": {"title_banner": "Class List"}}"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.canvas_base_url, "https://canvas.test");
        assert_eq!(settings.roster.title_banner, "Class List");
        assert_eq!(settings.roster.identifier_prefix, 'U');
        assert_eq!(settings.upstream_timeout_secs, 30);
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(Settings::load(&path).bind, "0.0.0.0:8765");
    }

    #[test]
    fn test_overrides_take_precedence() {
        let env: HashMap<&str, &str> = [
            ("CANVAS_BASE_URL", "https://other.instructure.com/"),
            ("ASSESSMENT_BIND", "127.0.0.1:9000"),
            ("ASSESSMENT_FRONTEND_DIR", ""),
            ("ROSTER_MAJOR_HEADER_MAX_LEN", "64"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.bind, "127.0.0.1:9000");
        assert_eq!(settings.frontend_dir, PathBuf::from("frontend"));
        assert_eq!(settings.roster.major_header_max_len, 64);
        assert_eq!(settings.api_base(), "https://other.instructure.com/api/v1");
    }

    #[test]
    fn test_bad_numeric_override_ignored() {
        let mut settings = Settings::default();
        settings.apply_overrides(|name| {
            (name == "ROSTER_MAJOR_HEADER_MAX_LEN").then(|| "lots".to_string())
        });
        assert_eq!(settings.roster.major_header_max_len, 50);
    }

    #[test]
    fn test_explicit_settings_path_wins() {
        let path = Path::new("/tmp/custom.json");
        assert_eq!(find_settings_file(Some(path)), PathBuf::from("/tmp/custom.json"));
    }
}
