//! CLI argument definitions for the helpdesk server.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > HELPDESK_* env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

use helpdesk_core::config::HelpdeskConfig;

/// Helpdesk - AI customer support chat backend.
#[derive(Parser, Debug, Default)]
#[command(name = "helpdesk", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Address the API server binds to.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > HELPDESK_CONFIG env var > ~/.helpdesk/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.resolve_config_path_from(|key| std::env::var(key).ok())
    }

    fn resolve_config_path_from<F>(&self, lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = lookup("HELPDESK_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path(lookup("HOME"))
    }

    /// Overlay host and port from env vars and flags onto `config`.
    pub fn apply_overrides(&self, config: &mut HelpdeskConfig) {
        self.apply_overrides_from(config, |key| std::env::var(key).ok());
    }

    fn apply_overrides_from<F>(&self, config: &mut HelpdeskConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = self.host.clone().or_else(|| lookup("HELPDESK_HOST")) {
            config.general.host = host;
        }

        if let Some(port) = self.port {
            config.general.port = port;
        } else if let Some(val) = lookup("HELPDESK_PORT") {
            match val.parse::<u16>() {
                Ok(port) => config.general.port = port,
                Err(_) => warn!(value = %val, "Ignoring invalid HELPDESK_PORT value"),
            }
        }
    }

    /// Resolve the log filter used when `RUST_LOG` is unset.
    ///
    /// Priority: --log-level flag > HELPDESK_LOG_LEVEL env var > "debug" when
    /// `general.debug` is set > config file value.
    pub fn resolve_log_level(&self, config: &HelpdeskConfig) -> String {
        self.resolve_log_level_from(config, |key| std::env::var(key).ok())
    }

    fn resolve_log_level_from<F>(&self, config: &HelpdeskConfig, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Some(level) = lookup("HELPDESK_LOG_LEVEL") {
            return level;
        }
        if config.general.debug {
            return "debug".to_string();
        }
        config.general.log_level.clone()
    }
}

/// Default config file path under the user's home directory.
fn default_config_path(home: Option<String>) -> PathBuf {
    match home {
        Some(home) => PathBuf::from(home).join(".helpdesk").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}
