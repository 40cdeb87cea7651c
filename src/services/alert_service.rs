//! Alert service
//!
//! Runs one snapshot update through evaluation, persistence and delivery.

use crate::alerts::{AlertEvaluator, AlertSeverity};
use crate::domain::{RecipientLookup, RuleKind, SnapshotUpdate};
use crate::notify::{
    channels_for, CapabilityRegistry, DispatchOutcome, DispatchState, NotificationDispatcher,
};
use crate::store::RuleStore;
use serde::Serialize;
use url::Url;

/// Channel routing for alert delivery
#[derive(Debug, Clone, Default)]
pub struct DeliveryConfig {
    /// Push destinations tried first, in order
    pub push_urls: Vec<Url>,
    /// Fall back to the recipient's mail address
    pub email_fallback: bool,
}

/// Alert service
pub struct AlertService {
    evaluator: AlertEvaluator,
    dispatcher: NotificationDispatcher,
    registry: CapabilityRegistry,
    delivery: DeliveryConfig,
}

impl AlertService {
    /// Create a new alert service
    pub fn new(
        evaluator: AlertEvaluator,
        dispatcher: NotificationDispatcher,
        registry: CapabilityRegistry,
        delivery: DeliveryConfig,
    ) -> Self {
        Self {
            evaluator,
            dispatcher,
            registry,
            delivery,
        }
    }

    /// Process one snapshot update
    ///
    /// Each changed rule's flag is written back before its notification is
    /// sent. A failed write is logged and the notification still goes out, so
    /// a later update may repeat it. When no channel accepts the notification
    /// the previous flag is restored, so the next update raises it again.
    pub fn process<S, R>(
        &self,
        update: &SnapshotUpdate,
        store: &mut S,
        recipients: &R,
    ) -> ProcessReport
    where
        S: RuleStore + ?Sized,
        R: RecipientLookup + ?Sized,
    {
        let entity = &update.entity;
        let mut report = ProcessReport {
            entity_id: entity.id.clone(),
            entity_name: entity.name.clone(),
            notifications: Vec::new(),
        };

        let rules = match store.rules_for(&entity.id) {
            Ok(rules) => rules,
            Err(e) => {
                log::error!("Failed to load rules for {}: {}", entity.id, e);
                return report;
            }
        };

        log::debug!("Evaluating {} rule(s) for {}", rules.len(), entity.id);

        let evaluations = self
            .evaluator
            .evaluate(update.previous_status, entity, &rules, recipients);

        for evaluation in evaluations {
            let rule = &evaluation.rule;
            let event = &evaluation.event;

            let persisted = if rule.kind.is_sliding_value() {
                match store.save_triggered(&rule.id, rule.triggered) {
                    Ok(()) => true,
                    Err(e) => {
                        log::warn!(
                            "Failed to persist triggered={} for rule {}, alert may repeat: {}",
                            rule.triggered,
                            rule.id,
                            e
                        );
                        false
                    }
                }
            } else {
                true
            };

            let fallback = self
                .delivery
                .email_fallback
                .then_some(event.recipient.email.as_str());
            let channels = channels_for(&self.delivery.push_urls, fallback, &self.registry);
            let outcome = self.dispatcher.dispatch_event(event, &channels);

            let rolled_back = persisted
                && rule.kind.is_sliding_value()
                && outcome.state == DispatchState::AllFailed
                && self.restore_flag(store, &rule.id, !rule.triggered);

            report.notifications.push(NotificationReport {
                rule_id: rule.id.clone(),
                kind: rule.kind,
                severity: event.severity,
                recipient: event.recipient.id.clone(),
                title: event.notification.title.clone(),
                persisted,
                rolled_back,
                outcome,
            });
        }

        report
    }

    fn restore_flag<S>(&self, store: &mut S, rule_id: &str, triggered: bool) -> bool
    where
        S: RuleStore + ?Sized,
    {
        match store.save_triggered(rule_id, triggered) {
            Ok(()) => {
                log::warn!(
                    "No channel accepted rule {}, restored triggered={} to retry on next update",
                    rule_id,
                    triggered
                );
                true
            }
            Err(e) => {
                log::error!(
                    "No channel accepted rule {} and triggered={} could not be restored: {}",
                    rule_id,
                    triggered,
                    e
                );
                false
            }
        }
    }
}

/// Result of processing one snapshot update
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub entity_id: String,
    pub entity_name: String,
    pub notifications: Vec<NotificationReport>,
}

impl ProcessReport {
    /// Number of notifications no channel accepted
    pub fn undelivered(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| !n.outcome.is_sent())
            .count()
    }
}

/// One rule transition and its delivery
#[derive(Debug, Clone, Serialize)]
pub struct NotificationReport {
    pub rule_id: String,
    pub kind: RuleKind,
    pub severity: AlertSeverity,
    pub recipient: String,
    pub title: String,
    pub persisted: bool,
    /// Flag reverted after a failed delivery
    pub rolled_back: bool,
    pub outcome: DispatchOutcome,
}
