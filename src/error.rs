//! Unified error types for hostalert
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from domain type validation
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// Error from a notification channel
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Error from the rule store
    #[error("Rule store error: {0}")]
    Store(#[from] StoreError),

    /// Some alerts were not accepted by any channel
    #[error("{undelivered} alert(s) could not be delivered on any channel")]
    DeliveryFailed { undelivered: usize },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Percentage outside 0-100 or not a finite number
    #[error("Invalid percentage: {0} (must be 0-100)")]
    InvalidPercent(f64),

    /// Unknown rule kind
    #[error("Unknown rule kind: {0}")]
    UnknownRuleKind(String),

    /// Threshold missing or not finite on a value rule
    #[error("Invalid threshold {value} for {kind} rule")]
    InvalidThreshold { kind: String, value: f64 },
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Failed to parse config file
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Destination URL could not be parsed
    #[error("Invalid destination '{url}': {reason}")]
    InvalidDestination { url: String, reason: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Errors from a single delivery attempt
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Endpoint could not be derived from the destination
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request could not be completed (unreachable, timed out, ...)
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Endpoint answered with a non-success status
    #[error("Endpoint returned status {0}")]
    Status(u16),

    /// Mail could not be built or submitted
    #[error("Email error: {0}")]
    Email(String),

    /// No registered adapter handles this destination kind
    #[error("No adapter registered for {0} destinations")]
    NoAdapter(String),
}

impl From<reqwest::Error> for ChannelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChannelError::Transport(format!("timed out: {}", err))
        } else {
            ChannelError::Transport(err.to_string())
        }
    }
}

/// Errors from the rule store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Rule to update does not exist
    #[error("Rule not found: {0}")]
    RuleNotFound(String),

    /// Backing file could not be read or written
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file could not be parsed
    #[error("Store parse error: {0}")]
    Parse(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
