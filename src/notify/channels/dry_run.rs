//! Logging adapter used in dry-run mode

use super::ChannelAdapter;
use crate::error::ChannelError;
use crate::notify::destination::{Destination, DestinationKind};
use crate::notify::formatter::Payload;

/// Accepts every destination and logs the payload instead of sending it
#[derive(Debug, Default)]
pub struct DryRunAdapter;

impl ChannelAdapter for DryRunAdapter {
    fn send(&self, destination: &Destination, payload: &Payload) -> Result<(), ChannelError> {
        log::info!(
            "[dry-run] {} title={:?} params={:?} body={:?}",
            destination,
            payload.title,
            payload.params,
            payload.body
        );
        Ok(())
    }

    fn handles(&self, _kind: DestinationKind) -> bool {
        true
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}
