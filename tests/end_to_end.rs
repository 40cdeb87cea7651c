//! End-to-end alert flow through the public API

use hostalert::alerts::{AlertEvaluator, AlertSeverity, EvaluatorConfig};
use hostalert::domain::{Entity, EntityStatus, Metrics, Recipient, SnapshotUpdate};
use hostalert::error::ChannelError;
use hostalert::notify::{
    CapabilityRegistry, ChannelAdapter, Destination, DestinationKind, DispatchState,
    MessageFormatter, NotificationDispatcher, Payload,
};
use hostalert::services::{AlertService, DeliveryConfig};
use hostalert::store::{FileRuleStore, RuleStore};
use std::sync::{Arc, Mutex};
use url::Url;

const RULES: &str = r#"
[[recipients]]
id = "u1"
email = "ops@example.com"

[[rules]]
id = "web1-disk"
entity_id = "web1"
recipient = "u1"
kind = "disk"
threshold = 90.0

[[rules]]
id = "web1-status"
entity_id = "web1"
recipient = "u1"
kind = "status"
"#;

#[derive(Clone, Default)]
struct Recorder {
    sent: Arc<Mutex<Vec<Payload>>>,
}

impl ChannelAdapter for Recorder {
    fn send(&self, _destination: &Destination, payload: &Payload) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(payload.clone());
        Ok(())
    }

    fn handles(&self, kind: DestinationKind) -> bool {
        kind == DestinationKind::Push
    }

    fn name(&self) -> &str {
        "recorder"
    }
}

fn service(recorder: &Recorder) -> AlertService {
    let dispatcher = NotificationDispatcher::new(MessageFormatter::new("hostalert"))
        .with_adapter(Box::new(recorder.clone()));

    AlertService::new(
        AlertEvaluator::new(EvaluatorConfig {
            app_url: "http://localhost:8090".to_string(),
        }),
        dispatcher,
        CapabilityRegistry::builtin(),
        DeliveryConfig {
            // unregistered scheme: no title, no link actions
            push_urls: vec![Url::parse("plainhook://hooks.example.com/alerts").unwrap()],
            email_fallback: false,
        },
    )
}

fn snapshot(previous: EntityStatus, status: EntityStatus, disk: f64) -> SnapshotUpdate {
    let entity = Entity::new("web1", "web1", status)
        .with_metrics(Metrics::new(5.0, 30.0, disk).unwrap());
    SnapshotUpdate::new(previous, entity)
}

#[test]
fn disk_breach_raises_once_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    std::fs::write(&path, RULES).unwrap();

    let recorder = Recorder::default();
    let service = service(&recorder);
    let mut store = FileRuleStore::open(&path).unwrap();
    let recipients: Vec<Recipient> = store.recipients().to_vec();

    let report = service.process(
        &snapshot(EntityStatus::Up, EntityStatus::Up, 95.0),
        &mut store,
        &recipients,
    );

    assert_eq!(report.notifications.len(), 1);
    assert_eq!(report.notifications[0].severity, AlertSeverity::Raised);
    assert_eq!(report.notifications[0].outcome.state, DispatchState::Sent(0));

    let sent = recorder.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, None);
    assert!(sent[0].body.contains("Disk usage on web1 is 95.0%."));
    assert_eq!(
        sent[0].body,
        "Disk usage above threshold on web1\n\nDisk usage on web1 is 95.0%.\n\nhttp://localhost:8090/system/web1"
    );

    let reopened = FileRuleStore::open(&path).unwrap();
    let rules = reopened.rules_for("web1").unwrap();
    let disk = rules.iter().find(|r| r.id == "web1-disk").unwrap();
    assert!(disk.triggered);
}

#[test]
fn breach_then_recovery_yields_two_events() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    std::fs::write(&path, RULES).unwrap();

    let recorder = Recorder::default();
    let service = service(&recorder);
    let mut store = FileRuleStore::open(&path).unwrap();
    let recipients = store.recipients().to_vec();

    let severities: Vec<AlertSeverity> = [95.0, 96.0, 50.0, 40.0]
        .iter()
        .flat_map(|&disk| {
            service
                .process(
                    &snapshot(EntityStatus::Up, EntityStatus::Up, disk),
                    &mut store,
                    &recipients,
                )
                .notifications
                .into_iter()
                .map(|n| n.severity)
        })
        .collect();

    assert_eq!(severities, vec![AlertSeverity::Raised, AlertSeverity::Cleared]);
    assert_eq!(recorder.sent.lock().unwrap().len(), 2);
}

#[test]
fn host_going_down_sends_status_alert_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    std::fs::write(&path, RULES).unwrap();

    let recorder = Recorder::default();
    let service = service(&recorder);
    let mut store = FileRuleStore::open(&path).unwrap();
    let recipients = store.recipients().to_vec();

    let report = service.process(
        &snapshot(EntityStatus::Up, EntityStatus::Down, 99.0),
        &mut store,
        &recipients,
    );

    assert_eq!(report.notifications.len(), 1);
    assert_eq!(report.notifications[0].rule_id, "web1-status");
    let sent = recorder.sent.lock().unwrap().clone();
    assert!(sent[0].body.starts_with("Connection to web1 is down"));
}
