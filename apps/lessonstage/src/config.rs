//! # Configuration
//!
//! Layering, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. TOML file (`lessonstage.toml`, or the path given with `--config`)
//! 3. Environment variables
//! 4. CLI flags (applied by the caller)
//!
//! ## File Format
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [agents]
//! model = "gemini-2.5-flash"
//! gemini_url = "https://generativelanguage.googleapis.com"
//! ```
//!
//! ## Environment Variables
//!
//! - `GOOGLE_API_KEY`: enables model-backed agents; offline agents otherwise
//! - `LESSONSTAGE_MODEL`: model name override
//! - `LESSONSTAGE_GEMINI_URL`: API base URL override

use lessonstage_core::LessonError;
use serde::Deserialize;
use std::path::Path;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lessonstage.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

// =============================================================================
// FILE SCHEMA
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    agents: AgentSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AgentSection {
    model: Option<String>,
    gemini_url: Option<String>,
}

// =============================================================================
// RESOLVED CONFIG
// =============================================================================

/// Fully resolved backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub gemini_url: String,
    /// Model API key; `None` selects the offline agents.
    pub google_api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
            gemini_url: DEFAULT_GEMINI_URL.to_string(),
            google_api_key: None,
        }
    }
}

impl BackendConfig {
    /// Load from an explicit file, or from `lessonstage.toml` if it exists,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, LessonError> {
        let mut config = Self::default();

        let file = match path {
            Some(p) => Some(read_file(p)?),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Some(read_file(default_path)?)
                } else {
                    None
                }
            }
        };
        if let Some(contents) = file {
            config.apply_toml(&contents)?;
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values from TOML text.
    pub fn apply_toml(&mut self, contents: &str) -> Result<(), LessonError> {
        let file: FileConfig =
            toml::from_str(contents).map_err(|e| LessonError::ConfigError(e.to_string()))?;
        if let Some(host) = file.server.host {
            self.host = host;
        }
        if let Some(port) = file.server.port {
            self.port = port;
        }
        if let Some(model) = file.agents.model {
            self.model = model;
        }
        if let Some(url) = file.agents.gemini_url {
            self.gemini_url = url;
        }
        Ok(())
    }

    /// Overlay values from the environment, read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = non_empty("GOOGLE_API_KEY") {
            self.google_api_key = Some(key);
        }
        if let Some(model) = non_empty("LESSONSTAGE_MODEL") {
            self.model = model;
        }
        if let Some(url) = non_empty("LESSONSTAGE_GEMINI_URL") {
            self.gemini_url = url;
        }
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn read_file(path: &Path) -> Result<String, LessonError> {
    std::fs::read_to_string(path).map_err(|e| {
        LessonError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
    })
}

// =============================================================================
// TESTS
// =============================================================================
