//! Rule file configuration
//!
//! Provides the TOML format for rules and recipients.

use crate::domain::{Recipient, RuleKind, ThresholdRule};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Rule file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleFile {
    /// Known recipients
    #[serde(default)]
    pub recipients: Vec<Recipient>,
    /// Alert rules
    #[serde(default)]
    pub rules: Vec<AlertRuleConfig>,
}

impl RuleFile {
    /// Load rules from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        Ok(toml::from_str(&contents).map_err(|e| ConfigError::ParseError(format!("{}", e)))?)
    }

    /// Save rules to file
    ///
    /// Writes a sibling temp file and renames it over `path`, so readers see
    /// either the old or the new contents.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize: {}", e)))?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, contents)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        Ok(())
    }

    /// Get default rule file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("hostalert").join("rules.toml")
        } else {
            PathBuf::from("rules.toml")
        }
    }

    /// Convert to validated rules
    pub fn to_threshold_rules(&self) -> Result<Vec<ThresholdRule>> {
        self.rules.iter().map(|r| r.to_threshold_rule()).collect()
    }
}

/// Rule configuration (TOML-friendly format)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRuleConfig {
    /// Rule identifier
    pub id: String,
    /// Entity the rule belongs to
    pub entity_id: String,
    /// Recipient identifier
    pub recipient: String,
    /// Rule kind (string form)
    pub kind: String,
    /// Threshold, required for value rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Persisted triggered flag
    #[serde(default)]
    pub triggered: bool,
}

impl AlertRuleConfig {
    /// Convert to ThresholdRule
    pub fn to_threshold_rule(&self) -> Result<ThresholdRule> {
        let kind: RuleKind = self.kind.parse()?;

        if !kind.is_sliding_value() {
            return Ok(ThresholdRule::status(
                self.id.clone(),
                self.entity_id.clone(),
                self.recipient.clone(),
            ));
        }

        let threshold = self.threshold.ok_or_else(|| ConfigError::InvalidValue {
            key: format!("rules.{}.threshold", self.id),
            message: format!("{} rules require a threshold", kind),
        })?;

        let rule = ThresholdRule::sliding(
            self.id.clone(),
            self.entity_id.clone(),
            self.recipient.clone(),
            kind,
            threshold,
        )?;

        Ok(rule.with_triggered(self.triggered))
    }
}

impl From<&ThresholdRule> for AlertRuleConfig {
    fn from(rule: &ThresholdRule) -> Self {
        Self {
            id: rule.id.clone(),
            entity_id: rule.entity_id.clone(),
            recipient: rule.recipient.clone(),
            kind: rule.kind.to_string().to_lowercase(),
            threshold: rule.kind.is_sliding_value().then_some(rule.threshold),
            triggered: rule.kind.is_sliding_value() && rule.triggered,
        }
    }
}
