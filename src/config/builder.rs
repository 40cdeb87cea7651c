//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;
use std::path::Path;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    ///
    /// An explicit path must load; without one the default locations are
    /// searched and defaults are kept when none is found.
    pub fn with_file(mut self, path: Option<&Path>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default(),
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override with CLI notify URLs
    ///
    /// Replaces the configured push list rather than extending it.
    pub fn with_notify_urls(mut self, urls: Vec<String>) -> Self {
        if !urls.is_empty() {
            self.config.notify.urls = urls;
        }
        self
    }

    /// Override with CLI app URL
    pub fn with_app_url(mut self, app_url: Option<String>) -> Self {
        if let Some(u) = app_url {
            self.config.general.app_url = u;
        }
        self
    }

    /// Override with CLI timeout
    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        if let Some(t) = timeout_secs {
            self.config.notify.timeout_secs = t;
        }
        self
    }

    /// Override with CLI dry-run flag
    pub fn with_dry_run(mut self, dry_run: Option<bool>) -> Self {
        if let Some(d) = dry_run {
            self.config.general.dry_run = d;
        }
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
