//! Alert evaluator implementation
//!
//! Decides which rules changed state between two snapshots of an entity.
//! Status rules are edge-triggered on up/down transitions. CPU, memory and
//! disk rules are level-triggered and de-duplicated through the rule's
//! triggered flag: a breach notifies once, then stays silent until it clears.

use super::types::{AlertEvent, AlertSeverity, Evaluation, Notification};
use crate::domain::{Entity, EntityStatus, Percent, RecipientLookup, RuleKind, ThresholdRule};

/// Evaluator configuration
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Base URL of the web UI, used to build deep links
    pub app_url: String,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            app_url: "http://localhost:8090".to_string(),
        }
    }
}

/// Alert evaluator
///
/// Holds no state between calls; safe to share across threads evaluating
/// different entities.
#[derive(Debug, Clone, Default)]
pub struct AlertEvaluator {
    config: EvaluatorConfig,
}

impl AlertEvaluator {
    /// Create a new evaluator
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// Evaluate an entity's rules against its previous status and current record
    ///
    /// Returns one `Evaluation` per rule that changed state. Rules belonging to
    /// other entities and rules whose recipient cannot be resolved are skipped.
    pub fn evaluate<R>(
        &self,
        previous: EntityStatus,
        entity: &Entity,
        rules: &[ThresholdRule],
        recipients: &R,
    ) -> Vec<Evaluation>
    where
        R: RecipientLookup + ?Sized,
    {
        let mut evaluations = Vec::new();

        for rule in rules {
            if rule.entity_id != entity.id {
                log::debug!(
                    "Ignoring rule {} for entity {} while evaluating {}",
                    rule.id,
                    rule.entity_id,
                    entity.id
                );
                continue;
            }

            let Some(recipient) = recipients.resolve(&rule.recipient) else {
                log::debug!(
                    "Skipping rule {}: recipient {} not found",
                    rule.id,
                    rule.recipient
                );
                continue;
            };

            let transition = match rule.kind {
                RuleKind::Status => self.status_transition(previous, entity),
                kind => {
                    if entity.status != EntityStatus::Up {
                        continue;
                    }
                    match kind.metric(&entity.metrics) {
                        Some(value) => self.value_transition(rule, entity, value),
                        None => None,
                    }
                }
            };

            let Some((severity, notification, value)) = transition else {
                continue;
            };

            let mut updated = rule.clone();
            if rule.kind.is_sliding_value() {
                updated.triggered = severity == AlertSeverity::Raised;
            }

            log::debug!(
                "Rule {} ({}) on {}: {}",
                rule.id,
                rule.kind,
                entity.name,
                severity
            );

            evaluations.push(Evaluation {
                event: AlertEvent {
                    rule_id: rule.id.clone(),
                    recipient,
                    entity_name: entity.name.clone(),
                    kind: rule.kind,
                    triggered: updated.triggered,
                    severity,
                    value,
                    notification,
                },
                rule: updated,
            });
        }

        evaluations
    }

    /// Detect an up/down edge
    fn status_transition(
        &self,
        previous: EntityStatus,
        entity: &Entity,
    ) -> Option<(AlertSeverity, Notification, Option<f64>)> {
        let (severity, emoji) = match (previous, entity.status) {
            (EntityStatus::Up, EntityStatus::Down) => (AlertSeverity::Raised, "\u{1F534}"),
            (EntityStatus::Down, EntityStatus::Up) => (AlertSeverity::Cleared, "\u{2705}"),
            _ => return None,
        };

        let name = &entity.name;
        let status = entity.status;
        let notification = Notification::new(
            format!("Connection to {} is {} {}", name, status, emoji),
            format!("Connection to {} is {}", name, status),
            self.entity_link(name),
        );

        Some((severity, notification, None))
    }

    /// Compare a metric against the rule threshold
    ///
    /// Raises on `value > threshold`, clears on `value <= threshold`.
    fn value_transition(
        &self,
        rule: &ThresholdRule,
        entity: &Entity,
        value: Percent,
    ) -> Option<(AlertSeverity, Notification, Option<f64>)> {
        let current = value.value();
        let kind = rule.kind;
        let name = &entity.name;

        let (severity, title, body) = if !rule.triggered && current > rule.threshold {
            (
                AlertSeverity::Raised,
                format!("{} usage above threshold on {}", kind, name),
                format!("{} usage on {} is {:.1}%.", kind, name, current),
            )
        } else if rule.triggered && current <= rule.threshold {
            (
                AlertSeverity::Cleared,
                format!("{} usage below threshold on {}", kind, name),
                format!(
                    "{} usage on {} is below threshold at {:.1}%.",
                    kind, name, current
                ),
            )
        } else {
            return None;
        };

        let notification = Notification::new(title, body, self.entity_link(name));
        Some((severity, notification, Some(current)))
    }

    /// Deep link to the entity's detail view
    fn entity_link(&self, name: &str) -> String {
        let escaped: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
        format!(
            "{}/system/{}",
            self.config.app_url.trim_end_matches('/'),
            escaped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Metrics, Recipient};

    fn recipients() -> Vec<Recipient> {
        vec![Recipient::new("u1", "ops@example.com")]
    }

    fn entity(status: EntityStatus, cpu: f64, memory: f64, disk: f64) -> Entity {
        Entity::new("web1", "web1", status).with_metrics(Metrics::new(cpu, memory, disk).unwrap())
    }

    fn cpu_rule(threshold: f64, triggered: bool) -> ThresholdRule {
        ThresholdRule::sliding("cpu", "web1", "u1", RuleKind::Cpu, threshold)
            .unwrap()
            .with_triggered(triggered)
    }

    #[test]
    fn test_raise_and_clear_once_per_crossing() {
        let evaluator = AlertEvaluator::default();
        let mut rule = cpu_rule(80.0, false);
        let mut events = Vec::new();

        for value in [10.0, 50.0, 79.0, 81.0, 90.0, 99.0, 85.0, 70.0, 20.0, 5.0] {
            let e = entity(EntityStatus::Up, value, 0.0, 0.0);
            for eval in evaluator.evaluate(EntityStatus::Up, &e, &[rule.clone()], &recipients()) {
                rule = eval.rule;
                events.push(eval.event);
            }
        }

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].severity, AlertSeverity::Raised);
        assert_eq!(events[0].value, Some(81.0));
        assert_eq!(events[1].severity, AlertSeverity::Cleared);
        assert_eq!(events[1].value, Some(70.0));
        assert!(!rule.triggered);
    }

    #[test]
    fn test_same_input_without_persisting_repeats_event() {
        let evaluator = AlertEvaluator::default();
        let rule = cpu_rule(80.0, false);
        let e = entity(EntityStatus::Up, 92.0, 0.0, 0.0);

        let first = evaluator.evaluate(EntityStatus::Up, &e, &[rule.clone()], &recipients());
        let second = evaluator.evaluate(EntityStatus::Up, &e, &[rule], &recipients());

        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_threshold_boundary() {
        let evaluator = AlertEvaluator::default();
        let rule = cpu_rule(80.0, false);

        let at = entity(EntityStatus::Up, 80.0, 0.0, 0.0);
        assert!(evaluator
            .evaluate(EntityStatus::Up, &at, &[rule.clone()], &recipients())
            .is_empty());

        let above = entity(EntityStatus::Up, 80.1, 0.0, 0.0);
        assert_eq!(
            evaluator
                .evaluate(EntityStatus::Up, &above, &[rule], &recipients())
                .len(),
            1
        );

        // Sitting exactly at the threshold clears a triggered rule
        let triggered = cpu_rule(80.0, true);
        let evals = evaluator.evaluate(EntityStatus::Up, &at, &[triggered], &recipients());
        assert_eq!(evals.len(), 1);
        assert_eq!(evals[0].event.severity, AlertSeverity::Cleared);
    }

    #[test]
    fn test_status_transitions() {
        let evaluator = AlertEvaluator::default();
        let rule = ThresholdRule::status("st", "web1", "u1");
        let cases = [
            (EntityStatus::Up, EntityStatus::Up, None),
            (EntityStatus::Down, EntityStatus::Down, None),
            (EntityStatus::Up, EntityStatus::Down, Some(AlertSeverity::Raised)),
            (EntityStatus::Down, EntityStatus::Up, Some(AlertSeverity::Cleared)),
            (EntityStatus::Unknown, EntityStatus::Up, None),
            (EntityStatus::Unknown, EntityStatus::Down, None),
            (EntityStatus::Up, EntityStatus::Unknown, None),
            (EntityStatus::Down, EntityStatus::Unknown, None),
        ];

        for (old, new, expected) in cases {
            let e = entity(new, 0.0, 0.0, 0.0);
            let evals = evaluator.evaluate(old, &e, &[rule.clone()], &recipients());
            assert_eq!(
                evals.first().map(|ev| ev.event.severity),
                expected,
                "{} -> {}",
                old,
                new
            );
            assert!(evals.len() <= 1);
        }
    }

    #[test]
    fn test_status_message() {
        let evaluator = AlertEvaluator::new(EvaluatorConfig {
            app_url: "https://mon.example.com/".to_string(),
        });
        let rule = ThresholdRule::status("st", "web1", "u1");
        let e = Entity::new("web1", "web 1", EntityStatus::Down);

        let evals = evaluator.evaluate(EntityStatus::Up, &e, &[rule], &recipients());
        let n = &evals[0].event.notification;
        assert_eq!(n.title, "Connection to web 1 is down \u{1F534}");
        assert_eq!(n.body, "Connection to web 1 is down");
        assert_eq!(n.link, "https://mon.example.com/system/web+1");
        assert!(!evals[0].rule.triggered);
    }

    #[test]
    fn test_value_rules_skipped_when_not_up() {
        let evaluator = AlertEvaluator::default();
        let rule = cpu_rule(50.0, false);

        for status in [EntityStatus::Down, EntityStatus::Unknown] {
            let e = entity(status, 99.0, 0.0, 0.0);
            assert!(evaluator
                .evaluate(EntityStatus::Up, &e, &[rule.clone()], &recipients())
                .is_empty());
        }
    }

    #[test]
    fn test_missing_recipient_skipped() {
        let evaluator = AlertEvaluator::default();
        let orphan = ThresholdRule::sliding("mem", "web1", "deleted", RuleKind::Memory, 10.0)
            .unwrap();
        let rule = cpu_rule(10.0, false);
        let e = entity(EntityStatus::Up, 50.0, 50.0, 0.0);

        let evals = evaluator.evaluate(EntityStatus::Up, &e, &[orphan, rule], &recipients());
        assert_eq!(evals.len(), 1);
        assert_eq!(evals[0].rule.id, "cpu");
    }

    #[test]
    fn test_rules_for_other_entities_ignored() {
        let evaluator = AlertEvaluator::default();
        let rule = ThresholdRule::sliding("cpu", "db1", "u1", RuleKind::Cpu, 10.0).unwrap();
        let e = entity(EntityStatus::Up, 50.0, 0.0, 0.0);

        assert!(evaluator
            .evaluate(EntityStatus::Up, &e, &[rule], &recipients())
            .is_empty());
    }

    #[test]
    fn test_disk_raise_message() {
        let evaluator = AlertEvaluator::default();
        let rule = ThresholdRule::sliding("disk", "web1", "u1", RuleKind::Disk, 90.0).unwrap();
        let e = entity(EntityStatus::Up, 0.0, 0.0, 95.0);

        let evals = evaluator.evaluate(EntityStatus::Up, &e, &[rule], &recipients());
        assert_eq!(evals.len(), 1);
        assert!(evals[0].rule.triggered);
        assert_eq!(
            evals[0].event.notification.title,
            "Disk usage above threshold on web1"
        );
        assert_eq!(
            evals[0].event.notification.body,
            "Disk usage on web1 is 95.0%."
        );
    }

    #[test]
    fn test_clear_message() {
        let evaluator = AlertEvaluator::default();
        let rule = ThresholdRule::sliding("mem", "web1", "u1", RuleKind::Memory, 90.0)
            .unwrap()
            .with_triggered(true);
        let e = entity(EntityStatus::Up, 0.0, 42.0, 0.0);

        let evals = evaluator.evaluate(EntityStatus::Up, &e, &[rule], &recipients());
        assert_eq!(
            evals[0].event.notification.body,
            "Memory usage on web1 is below threshold at 42.0%."
        );
        assert!(!evals[0].event.triggered);
    }
}
