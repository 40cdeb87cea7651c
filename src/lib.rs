//! hostalert - threshold alerting for monitored hosts
//!
//! This library evaluates per-host threshold rules against snapshot updates,
//! formats the resulting alerts for each destination's capabilities, and
//! delivers them through an ordered list of channels with fallback.
//!
//! # Modules
//!
//! - [`alerts`]: Rule evaluation and alert events
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Domain models with validation
//! - [`error`]: Error types
//! - [`notify`]: Message formatting and channel delivery
//! - [`services`]: Business logic services
//! - [`store`]: Rule storage

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod services;
pub mod store;

#[cfg(test)]
pub mod mock;

pub use error::{AppError, Result};
