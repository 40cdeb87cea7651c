//! Domain models for hostalert
//!
//! This module contains the entity and rule types with validation.
//! Types are validated on construction (fail-fast pattern).

pub mod entity;
pub mod rule;

pub use entity::{Entity, EntityStatus, Metrics, Percent, SnapshotUpdate};
pub use rule::{Recipient, RecipientLookup, RuleKind, ThresholdRule};
