//! Threshold rule and recipient types

use super::entity::{Metrics, Percent};
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// What a rule watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Up/down transitions
    Status,
    /// CPU usage percentage
    Cpu,
    /// Memory usage percentage
    Memory,
    /// Disk usage percentage
    Disk,
}

impl RuleKind {
    /// All kinds in display order
    pub const ALL: [RuleKind; 4] = [Self::Status, Self::Cpu, Self::Memory, Self::Disk];

    /// Whether this kind compares a metric against a threshold
    pub fn is_sliding_value(&self) -> bool {
        !matches!(self, Self::Status)
    }

    /// Select this kind's value from a metrics snapshot
    ///
    /// Returns `None` for `Status`, which has no associated metric.
    pub fn metric(&self, metrics: &Metrics) -> Option<Percent> {
        match self {
            Self::Status => None,
            Self::Cpu => Some(metrics.cpu),
            Self::Memory => Some(metrics.memory),
            Self::Disk => Some(metrics.disk),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status => write!(f, "Status"),
            Self::Cpu => write!(f, "CPU"),
            Self::Memory => write!(f, "Memory"),
            Self::Disk => write!(f, "Disk"),
        }
    }
}

impl FromStr for RuleKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "status" => Ok(Self::Status),
            "cpu" => Ok(Self::Cpu),
            "memory" => Ok(Self::Memory),
            "disk" => Ok(Self::Disk),
            _ => Err(DomainError::UnknownRuleKind(s.to_string())),
        }
    }
}

/// A configured alert condition on one entity, owned by one recipient
///
/// `triggered` is the only state that changes between evaluations and is
/// meaningless for `Status` rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    /// Stable identifier used when persisting the triggered flag
    pub id: String,
    /// Entity this rule belongs to
    pub entity_id: String,
    /// Recipient (owner) identifier
    pub recipient: String,
    /// What the rule watches
    pub kind: RuleKind,
    /// Threshold value (ignored for `Status`)
    #[serde(default)]
    pub threshold: f64,
    /// Whether the rule was in breach at the last evaluation
    #[serde(default)]
    pub triggered: bool,
}

impl ThresholdRule {
    /// Create a status rule
    pub fn status(
        id: impl Into<String>,
        entity_id: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            entity_id: entity_id.into(),
            recipient: recipient.into(),
            kind: RuleKind::Status,
            threshold: 0.0,
            triggered: false,
        }
    }

    /// Create a sliding-value rule
    ///
    /// # Errors
    /// Returns `DomainError::InvalidThreshold` if the threshold is not finite,
    /// and `DomainError::UnknownRuleKind` if `kind` is `Status`
    pub fn sliding(
        id: impl Into<String>,
        entity_id: impl Into<String>,
        recipient: impl Into<String>,
        kind: RuleKind,
        threshold: f64,
    ) -> Result<Self, DomainError> {
        if !kind.is_sliding_value() {
            return Err(DomainError::UnknownRuleKind(format!(
                "{} does not take a threshold",
                kind
            )));
        }
        if !threshold.is_finite() {
            return Err(DomainError::InvalidThreshold {
                kind: kind.to_string(),
                value: threshold,
            });
        }

        Ok(Self {
            id: id.into(),
            entity_id: entity_id.into(),
            recipient: recipient.into(),
            kind,
            threshold,
            triggered: false,
        })
    }

    /// Set the triggered flag
    pub fn with_triggered(mut self, triggered: bool) -> Self {
        self.triggered = triggered;
        self
    }
}

/// The person or account a rule notifies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Identifier referenced by rules
    pub id: String,
    /// Mail address used as the fallback channel
    pub email: String,
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Recipient {
    /// Create a new recipient
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
        }
    }
}

/// Resolves recipient identifiers to recipients
///
/// Returns `None` when the recipient no longer exists; such rules are skipped.
pub trait RecipientLookup {
    fn resolve(&self, id: &str) -> Option<Recipient>;
}

impl RecipientLookup for HashMap<String, Recipient> {
    fn resolve(&self, id: &str) -> Option<Recipient> {
        self.get(id).cloned()
    }
}

impl RecipientLookup for [Recipient] {
    fn resolve(&self, id: &str) -> Option<Recipient> {
        self.iter().find(|r| r.id == id).cloned()
    }
}

impl RecipientLookup for Vec<Recipient> {
    fn resolve(&self, id: &str) -> Option<Recipient> {
        self.as_slice().resolve(id)
    }
}
