//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::alerts::{AlertEvaluator, EvaluatorConfig, RuleFile};
use crate::error::{ConfigError, Result};
use crate::notify::{
    CapabilityRegistry, ChannelCapabilities, Destination, DryRunAdapter, EmailAdapter,
    MessageFormatter, NotificationDispatcher, SmtpSettings, WebhookAdapter,
};
use crate::services::{AlertService, DeliveryConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Delivery settings
    pub notify: NotifyConfig,
    /// SMTP settings for mail delivery
    pub email: SmtpSettings,
    /// Per-scheme capability overrides
    pub capabilities: BTreeMap<String, ChannelCapabilities>,
}

/// General configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Base URL of the web UI, used for deep links
    pub app_url: String,
    /// Application name shown in messages
    pub app_name: String,
    /// Rule file location
    pub rules_path: Option<PathBuf>,
    /// Log notifications instead of sending them
    pub dry_run: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            app_url: EvaluatorConfig::default().app_url,
            app_name: "hostalert".to_string(),
            rules_path: None,
            dry_run: false,
        }
    }
}

/// Notification delivery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Push destination URLs, tried in order
    pub urls: Vec<String>,
    /// Fall back to the recipient's mail address after the push URLs
    pub email_fallback: bool,
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            email_fallback: true,
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Check values that serde cannot
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.notify.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "notify.timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        Url::parse(&self.general.app_url).map_err(|e| ConfigError::InvalidValue {
            key: "general.app_url".to_string(),
            message: e.to_string(),
        })?;

        self.push_urls()?;
        Ok(())
    }

    /// Parsed push destinations
    ///
    /// Mail addresses are not accepted here; mail delivery goes to each
    /// rule's recipient through `email_fallback`.
    pub fn push_urls(&self) -> std::result::Result<Vec<Url>, ConfigError> {
        self.notify
            .urls
            .iter()
            .map(|raw| match Destination::parse(raw) {
                Ok(Destination::Push(url)) => Ok(url),
                Ok(Destination::Email(_)) => Err(ConfigError::InvalidDestination {
                    url: raw.clone(),
                    reason: "mail destinations come from recipients, use email_fallback"
                        .to_string(),
                }),
                Err(e) => Err(e),
            })
            .collect()
    }

    /// Built-in capabilities with the configured overrides applied
    pub fn registry(&self) -> CapabilityRegistry {
        CapabilityRegistry::builtin().with_overrides(
            self.capabilities
                .iter()
                .map(|(scheme, caps)| (scheme.clone(), *caps)),
        )
    }

    /// Per-attempt timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.notify.timeout_secs)
    }

    /// Rule file location, falling back to the per-user default
    pub fn rules_path(&self) -> PathBuf {
        self.general
            .rules_path
            .clone()
            .unwrap_or_else(RuleFile::default_path)
    }

    /// Evaluator for this configuration
    pub fn evaluator(&self) -> AlertEvaluator {
        AlertEvaluator::new(EvaluatorConfig {
            app_url: self.general.app_url.clone(),
        })
    }

    /// Dispatcher with the adapters for this configuration
    ///
    /// In dry-run mode every destination goes to the logging adapter.
    pub fn dispatcher(&self) -> Result<NotificationDispatcher> {
        let formatter = MessageFormatter::new(self.general.app_name.clone());

        if self.general.dry_run {
            let dispatcher =
                NotificationDispatcher::new(formatter).with_adapter(Box::new(DryRunAdapter));
            return Ok(dispatcher);
        }

        let webhook = WebhookAdapter::new(self.timeout())?;
        let email = EmailAdapter::new(self.email.clone(), self.timeout());

        Ok(NotificationDispatcher::new(formatter)
            .with_adapter(Box::new(webhook))
            .with_adapter(Box::new(email)))
    }

    /// Fully wired alert service
    pub fn alert_service(&self) -> Result<AlertService> {
        let delivery = DeliveryConfig {
            push_urls: self.push_urls()?,
            email_fallback: self.notify.email_fallback,
        };

        Ok(AlertService::new(
            self.evaluator(),
            self.dispatcher()?,
            self.registry(),
            delivery,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.app_url, "http://localhost:8090");
        assert_eq!(config.notify.timeout_secs, 10);
        assert!(config.notify.email_fallback);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
[general]
app_url = "https://monitor.example.com"
app_name = "Monitor"

[notify]
urls = ["ntfy://ntfy.sh/alerts", "discord://token@channel"]
email_fallback = false
timeout_secs = 5

[email]
smtp_host = "smtp.example.com"

[capabilities.pushdeer]
supports_title = true
"#,
        )
        .unwrap();

        assert_eq!(config.general.app_name, "Monitor");
        assert_eq!(config.push_urls().unwrap().len(), 2);
        assert_eq!(config.email.smtp_host, "smtp.example.com");
        assert_eq!(config.email.smtp_port, 587);
        assert_eq!(config.timeout(), Duration::from_secs(5));

        let registry = config.registry();
        assert!(registry.lookup("pushdeer").supports_title);
        assert!(!registry.lookup("pushdeer").supports_link_action);
        assert!(registry.lookup("ntfy").supports_link_action);
    }

    #[test]
    fn test_capability_override_replaces_builtin() {
        let mut config = Config::default();
        config
            .capabilities
            .insert("ntfy".to_string(), ChannelCapabilities::PLAIN);

        assert_eq!(config.registry().lookup("ntfy"), ChannelCapabilities::PLAIN);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.notify.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_push_urls_reject_mailto_and_garbage() {
        let mut config = Config::default();
        config.notify.urls = vec!["mailto:ops@example.com".to_string()];
        assert!(config.push_urls().is_err());

        config.notify.urls = vec!["not a url".to_string()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDestination { .. })
        ));
    }

    #[test]
    fn test_rules_path_override() {
        let mut config = Config::default();
        assert_eq!(config.rules_path(), RuleFile::default_path());

        config.general.rules_path = Some(PathBuf::from("/srv/rules.toml"));
        assert_eq!(config.rules_path(), PathBuf::from("/srv/rules.toml"));
    }

    #[test]
    fn test_dry_run_dispatcher() {
        let mut config = Config::default();
        config.general.dry_run = true;

        let dispatcher = config.dispatcher().unwrap();
        assert_eq!(dispatcher.adapter_count(), 1);
    }
}
