//! Alert evaluation
//!
//! Turns snapshot transitions into alert events.

mod config;
mod evaluator;
mod types;

pub use config::{AlertRuleConfig, RuleFile};
pub use evaluator::{AlertEvaluator, EvaluatorConfig};
pub use types::{AlertEvent, AlertSeverity, Evaluation, Notification};
