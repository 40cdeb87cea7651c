//! TOML file-backed rule store

use super::{MemoryRuleStore, RuleStore};
use crate::alerts::{AlertRuleConfig, RuleFile};
use crate::domain::{Recipient, ThresholdRule};
use crate::error::{AppError, Result, StoreError};
use std::path::{Path, PathBuf};

/// Rule store persisted to a rule file
///
/// Every flag update rewrites the whole file before returning.
#[derive(Debug)]
pub struct FileRuleStore {
    path: PathBuf,
    recipients: Vec<Recipient>,
    rules: MemoryRuleStore,
}

impl FileRuleStore {
    /// Open and validate a rule file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = RuleFile::load(&path)?;
        let rules = file.to_threshold_rules()?;

        log::info!(
            "Loaded {} rule(s) and {} recipient(s) from {}",
            rules.len(),
            file.recipients.len(),
            path.display()
        );

        Ok(Self {
            path,
            recipients: file.recipients,
            rules: MemoryRuleStore::new(rules),
        })
    }

    /// Known recipients
    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    /// All rules
    pub fn rules(&self) -> &[ThresholdRule] {
        self.rules.rules()
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, rules: &MemoryRuleStore) -> std::result::Result<(), StoreError> {
        let file = RuleFile {
            recipients: self.recipients.clone(),
            rules: rules.rules().iter().map(AlertRuleConfig::from).collect(),
        };

        file.save(&self.path).map_err(|e| match e {
            AppError::Io(io) => StoreError::Io(io),
            other => StoreError::Parse(other.to_string()),
        })
    }
}

impl RuleStore for FileRuleStore {
    fn rules_for(&self, entity_id: &str) -> std::result::Result<Vec<ThresholdRule>, StoreError> {
        self.rules.rules_for(entity_id)
    }

    /// Memory only changes once the file has been replaced.
    fn save_triggered(
        &mut self,
        rule_id: &str,
        triggered: bool,
    ) -> std::result::Result<(), StoreError> {
        let mut updated = self.rules.clone();
        updated.save_triggered(rule_id, triggered)?;
        self.write(&updated)?;
        self.rules = updated;
        Ok(())
    }
}
