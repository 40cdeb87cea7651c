//! Alert event types
//!
//! Defines the transient events produced by rule evaluation.

use crate::domain::{Recipient, RuleKind, ThresholdRule};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Condition started (metric breached, entity went down)
    Raised,
    /// Condition ended (metric recovered, entity came back up)
    Cleared,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raised => write!(f, "RAISED"),
            Self::Cleared => write!(f, "CLEARED"),
        }
    }
}

/// Channel-independent message content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Subject line
    pub title: String,
    /// Message text
    pub body: String,
    /// Deep link to the entity's detail view
    pub link: String,
}

impl Notification {
    /// Create a new notification
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            link: link.into(),
        }
    }
}

/// A single rule transition, produced once and consumed immediately
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Rule that changed state
    pub rule_id: String,
    /// Who to notify
    pub recipient: Recipient,
    /// Entity display name
    pub entity_name: String,
    /// Rule kind
    pub kind: RuleKind,
    /// Triggered state after this transition
    pub triggered: bool,
    /// Raised or cleared
    pub severity: AlertSeverity,
    /// Metric value that caused the transition (value rules only)
    pub value: Option<f64>,
    /// Rendered message
    pub notification: Notification,
}

/// Result of evaluating one rule that changed state
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Rule with its triggered flag updated, to be persisted by the caller
    pub rule: ThresholdRule,
    /// Event to deliver
    pub event: AlertEvent,
}
