//! Notification formatting and delivery
//!
//! Formats alert events per destination capabilities and delivers them
//! through an ordered list of channels with fallback.

pub mod capabilities;
pub mod channels;
pub mod destination;
pub mod dispatcher;
pub mod formatter;

pub use capabilities::{CapabilityRegistry, ChannelCapabilities};
pub use channels::{ChannelAdapter, DryRunAdapter, EmailAdapter, SmtpSettings, WebhookAdapter};
pub use destination::{channels_for, ChannelConfig, Destination, DestinationKind};
pub use dispatcher::{ChannelAttempt, DispatchOutcome, DispatchState, NotificationDispatcher};
pub use formatter::{MessageFormatter, Payload};
