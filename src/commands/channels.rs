//! Channels command implementation
//!
//! Shows the configured delivery channels and the capability table.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, ChannelEntry, ChannelList};
use crate::config::Config;
use crate::error::Result;
use crate::notify::{ChannelConfig, Destination};

/// Execute the channels command
pub fn run_channels(config: &Config, format: OutputFormat) -> Result<()> {
    let registry = config.registry();

    let channels = config
        .push_urls()?
        .into_iter()
        .map(|url| {
            let channel = ChannelConfig::resolve(Destination::Push(url), &registry);
            ChannelEntry {
                destination: channel.destination.redacted(),
                capabilities: channel.capabilities,
            }
        })
        .collect();

    let list = ChannelList {
        channels,
        email_fallback: config.notify.email_fallback,
        dry_run: config.general.dry_run,
        schemes: ChannelList::schemes_from(&registry),
    };

    print_output(&list, format)?;

    Ok(())
}
