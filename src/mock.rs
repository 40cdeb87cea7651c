//! Mock implementations for testing
//!
//! Provides a scripted channel adapter and a rule store that can be told to
//! fail, for unit testing without network access.

use crate::domain::ThresholdRule;
use crate::error::{ChannelError, StoreError};
use crate::notify::{ChannelAdapter, Destination, DestinationKind, Payload};
use crate::store::{MemoryRuleStore, RuleStore};

use std::sync::{Arc, Mutex};

/// Mock channel adapter
///
/// Clones share recorded state, so a test can keep one handle while the
/// dispatcher owns another.
#[derive(Debug, Clone)]
pub struct MockAdapter {
    kind: DestinationKind,
    failure: Option<String>,
    attempts: Arc<Mutex<usize>>,
    sent: Arc<Mutex<Vec<(Destination, Payload)>>>,
}

impl MockAdapter {
    /// Adapter that accepts every message
    pub fn new(kind: DestinationKind) -> Self {
        Self {
            kind,
            failure: None,
            attempts: Arc::new(Mutex::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adapter that rejects every message with `reason`
    pub fn failing(kind: DestinationKind, reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::new(kind)
        }
    }

    /// Number of send calls
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    /// Messages accepted so far
    pub fn sent(&self) -> Vec<(Destination, Payload)> {
        self.sent.lock().unwrap().clone()
    }
}

impl ChannelAdapter for MockAdapter {
    fn send(&self, destination: &Destination, payload: &Payload) -> Result<(), ChannelError> {
        *self.attempts.lock().unwrap() += 1;

        if let Some(reason) = &self.failure {
            return Err(ChannelError::Transport(reason.clone()));
        }

        self.sent
            .lock()
            .unwrap()
            .push((destination.clone(), payload.clone()));
        Ok(())
    }

    fn handles(&self, kind: DestinationKind) -> bool {
        kind == self.kind
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Rule store whose writes always fail
#[derive(Debug, Default)]
pub struct ReadOnlyStore {
    inner: MemoryRuleStore,
}

impl ReadOnlyStore {
    /// Wrap a set of rules
    pub fn new(rules: Vec<ThresholdRule>) -> Self {
        Self {
            inner: MemoryRuleStore::new(rules),
        }
    }
}

impl RuleStore for ReadOnlyStore {
    fn rules_for(&self, entity_id: &str) -> Result<Vec<ThresholdRule>, StoreError> {
        self.inner.rules_for(entity_id)
    }

    fn save_triggered(&mut self, _rule_id: &str, _triggered: bool) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only store",
        )))
    }
}
