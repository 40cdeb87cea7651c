//! Rules command implementation
//!
//! Lists recipients and rules with their triggered state.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, RuleList};
use crate::config::Config;
use crate::error::Result;
use crate::store::FileRuleStore;
use std::path::Path;

/// Execute the rules command
pub fn run_rules(rules: Option<&Path>, config: &Config, format: OutputFormat) -> Result<()> {
    let path = rules.map_or_else(|| config.rules_path(), Path::to_path_buf);
    let store = FileRuleStore::open(&path)?;

    let list = RuleList {
        path: store.path().display().to_string(),
        recipients: store.recipients().to_vec(),
        rules: store.rules().to_vec(),
    };

    print_output(&list, format)?;

    Ok(())
}
