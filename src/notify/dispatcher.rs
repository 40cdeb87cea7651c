//! Notification dispatcher
//!
//! Delivers one notification through an ordered list of channels, falling
//! back to the next channel when an attempt fails:
//!
//! ```text
//! Pending -> Trying(0) -> Sent(0)
//!                      -> Trying(1) -> Sent(1)
//!                                   -> ...  -> AllFailed
//! ```
//!
//! Channels are tried one at a time and never retried within a call.

use super::capabilities::CapabilityRegistry;
use super::channels::ChannelAdapter;
use super::destination::{ChannelConfig, Destination};
use super::formatter::MessageFormatter;
use crate::alerts::{AlertEvent, Notification};
use crate::error::{ChannelError, Result};
use serde::Serialize;
use std::fmt;

/// Dispatch progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "channel")]
pub enum DispatchState {
    /// Nothing attempted yet
    Pending,
    /// Attempting the channel at this index
    Trying(usize),
    /// Delivered through the channel at this index
    Sent(usize),
    /// Every channel failed (or there were none)
    AllFailed,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Trying(i) => write!(f, "TRYING({})", i),
            Self::Sent(i) => write!(f, "SENT({})", i),
            Self::AllFailed => write!(f, "ALL_FAILED"),
        }
    }
}

/// Record of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelAttempt {
    /// Index into the channel list
    pub channel: usize,
    /// Log-safe destination
    pub destination: String,
    /// Adapter used, if one handled the destination
    pub adapter: Option<String>,
    /// Failure reason, `None` on success
    pub error: Option<String>,
}

impl ChannelAttempt {
    /// Whether the attempt delivered the message
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Final result of a dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    /// Terminal state (`Sent` or `AllFailed`)
    pub state: DispatchState,
    /// Attempts in order
    pub attempts: Vec<ChannelAttempt>,
}

impl DispatchOutcome {
    /// Whether some channel accepted the message
    pub fn is_sent(&self) -> bool {
        matches!(self.state, DispatchState::Sent(_))
    }

    /// Failed attempts
    pub fn failures(&self) -> impl Iterator<Item = &ChannelAttempt> {
        self.attempts.iter().filter(|a| !a.succeeded())
    }
}

/// Notification dispatcher
///
/// Owns the channel adapters and picks, per destination, the first adapter
/// that handles its kind.
pub struct NotificationDispatcher {
    adapters: Vec<Box<dyn ChannelAdapter>>,
    formatter: MessageFormatter,
}

impl NotificationDispatcher {
    /// Create a dispatcher with no adapters
    pub fn new(formatter: MessageFormatter) -> Self {
        Self {
            adapters: Vec::new(),
            formatter,
        }
    }

    /// Add an adapter
    pub fn add_adapter(&mut self, adapter: Box<dyn ChannelAdapter>) {
        self.adapters.push(adapter);
    }

    /// Add an adapter (builder form)
    pub fn with_adapter(mut self, adapter: Box<dyn ChannelAdapter>) -> Self {
        self.add_adapter(adapter);
        self
    }

    /// Get number of registered adapters
    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    /// Deliver an alert event
    pub fn dispatch_event(
        &self,
        event: &AlertEvent,
        channels: &[ChannelConfig],
    ) -> DispatchOutcome {
        self.dispatch(&event.notification, channels)
    }

    /// Deliver a notification through the first channel that accepts it
    pub fn dispatch(
        &self,
        notification: &Notification,
        channels: &[ChannelConfig],
    ) -> DispatchOutcome {
        let mut state = DispatchState::Pending;
        let mut attempts = Vec::with_capacity(channels.len());

        loop {
            state = match state {
                DispatchState::Pending if channels.is_empty() => DispatchState::AllFailed,
                DispatchState::Pending => DispatchState::Trying(0),
                DispatchState::Trying(i) => {
                    let channel = &channels[i];
                    let adapter = self.adapter_for(&channel.destination);
                    let result = self.attempt(notification, channel);

                    attempts.push(ChannelAttempt {
                        channel: i,
                        destination: channel.destination.redacted(),
                        adapter: adapter.map(|a| a.name().to_string()),
                        error: result.as_ref().err().map(|e| e.to_string()),
                    });

                    match result {
                        Ok(()) => {
                            log::info!(
                                "Sent \"{}\" via {}",
                                notification.title,
                                channel.destination
                            );
                            DispatchState::Sent(i)
                        }
                        Err(e) if i + 1 < channels.len() => {
                            log::warn!(
                                "Failed to send via {}, falling back to next channel: {}",
                                channel.destination,
                                e
                            );
                            DispatchState::Trying(i + 1)
                        }
                        Err(e) => {
                            log::warn!("Failed to send via {}: {}", channel.destination, e);
                            DispatchState::AllFailed
                        }
                    }
                }
                DispatchState::Sent(_) | DispatchState::AllFailed => break,
            };
        }

        if state == DispatchState::AllFailed {
            log::error!(
                "All {} channel(s) failed for \"{}\"",
                attempts.len(),
                notification.title
            );
        }

        DispatchOutcome { state, attempts }
    }

    /// Send the fixed test message to an arbitrary destination URL
    ///
    /// Used to validate channel configuration; no rule state is involved.
    ///
    /// # Errors
    /// `ConfigError::InvalidDestination` for a malformed URL, or the
    /// `ChannelError` from the delivery attempt
    pub fn send_test(
        &self,
        url: &str,
        registry: &CapabilityRegistry,
        app_url: &str,
    ) -> Result<()> {
        let destination = Destination::parse(url)?;
        let channel = ChannelConfig::resolve(destination, registry);
        let notification = Notification::new(
            "Test Alert",
            format!("This is a notification from {}.", self.formatter.app_name()),
            app_url,
        );

        self.attempt(&notification, &channel)?;
        log::info!("Sent test notification via {}", channel.destination);
        Ok(())
    }

    fn adapter_for(&self, destination: &Destination) -> Option<&dyn ChannelAdapter> {
        let kind = destination.kind();
        self.adapters
            .iter()
            .find(|a| a.handles(kind))
            .map(|a| &**a)
    }

    fn attempt(
        &self,
        notification: &Notification,
        channel: &ChannelConfig,
    ) -> std::result::Result<(), ChannelError> {
        let adapter = self
            .adapter_for(&channel.destination)
            .ok_or_else(|| ChannelError::NoAdapter(channel.destination.kind().to_string()))?;

        let payload = self
            .formatter
            .format_notification(notification, channel.capabilities);

        log::debug!(
            "Trying {} via {} adapter",
            channel.destination,
            adapter.name()
        );
        adapter.send(&channel.destination, &payload)
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new(MessageFormatter::default())
    }
}
