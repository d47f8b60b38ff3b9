//! # Configuration
//!
//! Defaults < TOML file < environment < CLI flags (applied in `main`).
//!
//! ```toml
//! [view]
//! base_url = "http://localhost:8000"
//! html_out = "pipeline.html"
//!
//! [view.timing]
//! first_ms = 1000
//! second_ms = 1500
//! third_ms = 1500
//! ```
//!
//! Environment: `LESSONSTAGE_URL`, `LESSONSTAGE_API_KEY`.

use lessonstage_core::{LessonError, RevealTiming};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lessonstage-view.toml";

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    view: ViewSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewSection {
    base_url: Option<String>,
    html_out: Option<PathBuf>,
    #[serde(default)]
    timing: TimingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimingSection {
    first_ms: Option<u64>,
    second_ms: Option<u64>,
    third_ms: Option<u64>,
}

/// Fully resolved presenter configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Mirror the page to this HTML file as well as the terminal.
    pub html_out: Option<PathBuf>,
    pub timing: RevealTiming,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            html_out: None,
            timing: RevealTiming::default(),
        }
    }
}

impl ViewConfig {
    /// Load from an explicit file, or from `lessonstage-view.toml` if it
    /// exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, LessonError> {
        let mut config = Self::default();

        let path = match path {
            Some(p) => Some(p),
            None => Some(Path::new(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };
        if let Some(path) = path {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                LessonError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
            })?;
            config.apply_toml(&contents)?;
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_toml(&mut self, contents: &str) -> Result<(), LessonError> {
        let file: FileConfig =
            toml::from_str(contents).map_err(|e| LessonError::ConfigError(e.to_string()))?;
        let view = file.view;
        if let Some(url) = view.base_url {
            self.base_url = url;
        }
        if let Some(path) = view.html_out {
            self.html_out = Some(path);
        }
        if let Some(ms) = view.timing.first_ms {
            self.timing.generation = Duration::from_millis(ms);
        }
        if let Some(ms) = view.timing.second_ms {
            self.timing.review = Duration::from_millis(ms);
        }
        if let Some(ms) = view.timing.third_ms {
            self.timing.refinement = Duration::from_millis(ms);
        }
        Ok(())
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty("LESSONSTAGE_URL") {
            self.base_url = url;
        }
        if let Some(key) = non_empty("LESSONSTAGE_API_KEY") {
            self.api_key = Some(key);
        }
    }
}
