//! Evaluate command implementation
//!
//! Runs one snapshot update through the alert service.

use crate::cli::args::{EvaluateArgs, OutputFormat};
use crate::cli::output::print_output;
use crate::config::Config;
use crate::domain::SnapshotUpdate;
use crate::error::{AppError, ConfigError, Result};
use crate::store::FileRuleStore;
use std::io::{self, Read};
use std::path::Path;

/// Execute the evaluate command
pub fn run_evaluate(args: &EvaluateArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let update = read_snapshot(&args.snapshot)?;

    let rules_path = args.rules.clone().unwrap_or_else(|| config.rules_path());
    let mut store = FileRuleStore::open(&rules_path)?;
    let recipients = store.recipients().to_vec();

    let service = config.alert_service()?;
    let report = service.process(&update, &mut store, &recipients);

    print_output(&report, format)?;

    match report.undelivered() {
        0 => Ok(()),
        undelivered => Err(AppError::DeliveryFailed { undelivered }),
    }
}

/// Read a snapshot update from a JSON file, or stdin for `-`
pub fn read_snapshot(path: &Path) -> Result<SnapshotUpdate> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?
    };

    let update = serde_json::from_str(&content).map_err(ConfigError::from)?;
    Ok(update)
}
