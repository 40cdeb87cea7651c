//! Monitored entity types
//!
//! Provides the validated status and metric types carried by a snapshot.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource usage percentage (0-100)
///
/// Validated on construction to ensure the value is finite and within range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percent(f64);

impl Percent {
    /// Minimum valid percentage
    pub const MIN: f64 = 0.0;
    /// Maximum valid percentage
    pub const MAX: f64 = 100.0;

    /// Create a new Percent with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPercent` if value is NaN, infinite or outside 0-100
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::InvalidPercent(value));
        }
        Ok(Self(value))
    }

    /// Get the raw value
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Self(0.0)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl TryFrom<f64> for Percent {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percent> for f64 {
    fn from(p: Percent) -> Self {
        p.0
    }
}

/// Observed reachability of an entity
///
/// Anything other than `up` or `down` (paused, pending, ...) reads as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Up,
    Down,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Latest resource metrics of an entity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// CPU usage
    #[serde(default)]
    pub cpu: Percent,
    /// Memory usage
    #[serde(default)]
    pub memory: Percent,
    /// Disk usage
    #[serde(default)]
    pub disk: Percent,
}

impl Metrics {
    /// Create metrics from raw percentages
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPercent` for the first out-of-range value
    pub fn new(cpu: f64, memory: f64, disk: f64) -> Result<Self, DomainError> {
        Ok(Self {
            cpu: Percent::new(cpu)?,
            memory: Percent::new(memory)?,
            disk: Percent::new(disk)?,
        })
    }
}

/// A monitored host or service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier
    pub id: String,
    /// Display name used in messages and links
    pub name: String,
    /// Latest observed status
    #[serde(default)]
    pub status: EntityStatus,
    /// Latest observed metrics
    #[serde(default)]
    pub metrics: Metrics,
}

impl Entity {
    /// Create a new entity with zeroed metrics
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: EntityStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            metrics: Metrics::default(),
        }
    }

    /// Set metrics
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }
}

/// One change notification for an entity: its previous status and current record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotUpdate {
    /// Status before this update
    #[serde(default)]
    pub previous_status: EntityStatus,
    /// Entity as of this update
    pub entity: Entity,
}

impl SnapshotUpdate {
    /// Create a new snapshot update
    pub fn new(previous_status: EntityStatus, entity: Entity) -> Self {
        Self {
            previous_status,
            entity,
        }
    }
}
