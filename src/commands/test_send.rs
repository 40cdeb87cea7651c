//! Test-send command implementation
//!
//! Sends the fixed test notification to one destination.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, TestSendResult};
use crate::config::Config;
use crate::error::Result;
use crate::notify::Destination;

/// Execute the test-send command
pub fn run_test_send(url: &str, config: &Config, format: OutputFormat) -> Result<()> {
    let destination = Destination::parse(url)?;
    let dispatcher = config.dispatcher()?;

    dispatcher.send_test(url, &config.registry(), &config.general.app_url)?;

    let result = TestSendResult {
        destination: destination.redacted(),
        sent: true,
    };
    print_output(&result, format)?;

    Ok(())
}
