use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HelpdeskError, Result};

/// Placeholder Gemini key shipped in the default configuration.
pub const DEMO_GEMINI_API_KEY: &str = "demo_key_for_testing";
/// Placeholder Appwrite project id shipped in the default configuration.
pub const DEMO_APPWRITE_PROJECT_ID: &str = "demo_project";
/// Placeholder Appwrite API key shipped in the default configuration.
pub const DEMO_APPWRITE_API_KEY: &str = "demo_api_key";

/// Top-level configuration for the helpdesk service.
///
/// Loaded from `~/.helpdesk/config.toml` by default, then overlaid with
/// environment variables. Every field has a default, so an empty file (or no
/// file at all) yields a working service in mock mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HelpdeskConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub appwrite: AppwriteConfig,
}

impl HelpdeskConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HelpdeskConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HelpdeskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Overlay values from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary key lookup.
    ///
    /// Keys are the upper-case environment names (`GEMINI_API_KEY`,
    /// `APPWRITE_PROJECT_ID`, ...). Values that fail to parse are ignored with
    /// a warning.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_overrides: [(&str, &mut String); 9] = [
            ("GEMINI_API_KEY", &mut self.gemini.api_key),
            ("GEMINI_MODEL", &mut self.gemini.model),
            ("APPWRITE_ENDPOINT", &mut self.appwrite.endpoint),
            ("APPWRITE_PROJECT_ID", &mut self.appwrite.project_id),
            ("APPWRITE_API_KEY", &mut self.appwrite.api_key),
            ("APPWRITE_DATABASE_ID", &mut self.appwrite.database_id),
            (
                "APPWRITE_CONVERSATIONS_COLLECTION_ID",
                &mut self.appwrite.conversations_collection_id,
            ),
            (
                "APPWRITE_MESSAGES_COLLECTION_ID",
                &mut self.appwrite.messages_collection_id,
            ),
            ("ENVIRONMENT", &mut self.general.environment),
        ];
        for (key, field) in string_overrides {
            if let Some(value) = lookup(key) {
                *field = value;
            }
        }

        if let Some(value) = lookup("DEBUG") {
            match parse_bool(&value) {
                Some(debug) => self.general.debug = debug,
                None => warn!(value = %value, "Ignoring unparseable DEBUG value"),
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// General service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Deployment environment name (informational).
    pub environment: String,
    /// Verbose logging for the service's own crates.
    pub debug: bool,
    /// Address the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Log level when `debug` is off: trace, debug, info, warn, error.
    pub log_level: String,
    /// Origins allowed by CORS (the chat widget's dev server by default).
    pub cors_origins: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            debug: true,
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// Gemini text-generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL of the Generative Language API, without trailing slash.
    pub endpoint: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl GeminiConfig {
    /// Whether a real API key replaced the placeholder.
    pub fn is_configured(&self) -> bool {
        self.api_key != DEMO_GEMINI_API_KEY
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: DEMO_GEMINI_API_KEY.to_string(),
            model: "gemini-1.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 1024,
        }
    }
}

/// Appwrite document database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppwriteConfig {
    /// REST endpoint including the version segment (e.g. `.../v1`).
    pub endpoint: String,
    pub project_id: String,
    pub api_key: String,
    pub database_id: String,
    pub conversations_collection_id: String,
    pub messages_collection_id: String,
}

impl AppwriteConfig {
    /// Whether both the project id and the API key replaced their placeholders.
    pub fn is_configured(&self) -> bool {
        self.api_key != DEMO_APPWRITE_API_KEY && self.project_id != DEMO_APPWRITE_PROJECT_ID
    }
}

impl Default for AppwriteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: DEMO_APPWRITE_PROJECT_ID.to_string(),
            api_key: DEMO_APPWRITE_API_KEY.to_string(),
            database_id: "main".to_string(),
            conversations_collection_id: "conversations".to_string(),
            messages_collection_id: "messages".to_string(),
        }
    }
}
