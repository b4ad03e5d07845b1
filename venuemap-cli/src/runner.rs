//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and search client
//! creation to reduce duplication across command handlers.

use std::path::Path;

use tracing::info;
use venuemap::config::{ConfigFile, EngineConfig};
use venuemap::logging::{init_logging, LogTarget, LoggingGuard};
use venuemap::search::HttpSearchClient;

use crate::error::CliError;

/// Loads configuration, honouring an explicit `--config` path.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
    engine_config: EngineConfig,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// Logs go to the configured file; with `debug_mode` they are also
    /// mirrored to stderr at debug level.
    pub fn new(config_path: Option<&Path>, debug_mode: bool) -> Result<Self, CliError> {
        let config = load_config(config_path)?;
        let engine_config = EngineConfig::try_from(&config)?;

        let target = if debug_mode {
            LogTarget::FileAndStderr
        } else {
            LogTarget::FileOnly
        };
        let logging_guard = init_logging(&config.logging.file, target, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
            engine_config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Engine settings derived from the configuration.
    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine_config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("venuemap v{}", venuemap::VERSION);
        info!("venuemap CLI: {} command", command);
    }

    /// Create the HTTP search client, preferring an explicit base URL.
    pub fn search_client(&self, base_url: Option<&str>) -> Result<HttpSearchClient, CliError> {
        let base_url = base_url
            .or(self.config.search.base_url.as_deref())
            .ok_or(CliError::MissingBaseUrl)?;

        let client = HttpSearchClient::new(base_url, self.config.search.timeout)?;
        info!(url = client.url(), "Search client created");
        Ok(client)
    }
}
