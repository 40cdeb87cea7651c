//! Channel adapters
//!
//! Transports that deliver a formatted payload to a destination.

mod dry_run;
mod email;
mod webhook;

pub use dry_run::DryRunAdapter;
pub use email::{EmailAdapter, SmtpSettings};
pub use webhook::WebhookAdapter;

use super::destination::{Destination, DestinationKind};
use super::formatter::Payload;
use crate::error::ChannelError;

/// Delivery transport trait
///
/// `send` must return an error for any message that was not accepted;
/// duplicate deliveries are tolerated by callers, silent loss is not.
pub trait ChannelAdapter: Send + Sync {
    /// Deliver a payload
    fn send(&self, destination: &Destination, payload: &Payload) -> Result<(), ChannelError>;

    /// Whether this adapter can deliver to a kind of destination
    fn handles(&self, kind: DestinationKind) -> bool;

    /// Adapter name for identification
    fn name(&self) -> &str;
}
