//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::domain::{Recipient, ThresholdRule};
use crate::notify::{CapabilityRegistry, ChannelCapabilities, DispatchState};
use crate::services::{NotificationReport, ProcessReport};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

fn flags(caps: &ChannelCapabilities) -> String {
    let mut names = Vec::new();
    if caps.supports_title {
        names.push("title");
    }
    if caps.supports_link_action {
        names.push("link-action");
    }
    if caps.is_structured_sink {
        names.push("structured");
    }
    if names.is_empty() {
        "plain".to_string()
    } else {
        names.join(", ")
    }
}

impl TableDisplay for NotificationReport {
    fn to_table(&self) -> String {
        let mut output = format!(
            "  [{}] {} ({}) -> {}: {}\n",
            self.severity, self.rule_id, self.kind, self.recipient, self.title
        );

        for attempt in &self.outcome.attempts {
            match &attempt.error {
                None => output.push_str(&format!("    sent via {}\n", attempt.destination)),
                Some(e) => output.push_str(&format!(
                    "    failed via {}: {}\n",
                    attempt.destination, e
                )),
            }
        }

        if self.outcome.state == DispatchState::AllFailed {
            output.push_str("    NOT DELIVERED\n");
        }
        if !self.persisted {
            output.push_str("    warning: triggered state not saved\n");
        }
        if self.rolled_back {
            output.push_str("    triggered state restored, will retry on next update\n");
        }

        output
    }

    fn to_compact(&self) -> String {
        format!("{}:{}:{}", self.rule_id, self.severity, self.outcome.state)
    }
}

impl TableDisplay for ProcessReport {
    fn to_table(&self) -> String {
        let mut output = format!("Entity: {} ({})\n", self.entity_name, self.entity_id);

        if self.notifications.is_empty() {
            output.push_str("No rule changed state\n");
            return output;
        }

        output.push_str(&format!("Alerts: {}\n\n", self.notifications.len()));
        for notification in &self.notifications {
            output.push_str(&notification.to_table());
        }

        output
    }

    fn to_compact(&self) -> String {
        let alerts: Vec<String> = self.notifications.iter().map(|n| n.to_compact()).collect();
        format!("{} [{}]", self.entity_id, alerts.join(", "))
    }
}

/// Configured channel for display
#[derive(Debug, Clone, Serialize)]
pub struct ChannelEntry {
    pub destination: String,
    pub capabilities: ChannelCapabilities,
}

/// Channel overview for display
#[derive(Debug, Clone, Serialize)]
pub struct ChannelList {
    pub channels: Vec<ChannelEntry>,
    pub email_fallback: bool,
    pub dry_run: bool,
    pub schemes: Vec<(String, ChannelCapabilities)>,
}

impl ChannelList {
    /// Build the capability listing from a registry
    pub fn schemes_from(registry: &CapabilityRegistry) -> Vec<(String, ChannelCapabilities)> {
        registry
            .iter()
            .map(|(scheme, caps)| (scheme.to_string(), *caps))
            .collect()
    }
}

impl TableDisplay for ChannelList {
    fn to_table(&self) -> String {
        let mut output = String::from("Push Channels:\n");

        if self.channels.is_empty() {
            output.push_str("  (none)\n");
        }
        for (i, channel) in self.channels.iter().enumerate() {
            output.push_str(&format!(
                "  [{}] {} ({})\n",
                i,
                channel.destination,
                flags(&channel.capabilities)
            ));
        }

        output.push_str(&format!(
            "Email Fallback: {}\n",
            if self.email_fallback { "enabled" } else { "disabled" }
        ));
        if self.dry_run {
            output.push_str("Mode: dry-run\n");
        }

        output.push_str("\nKnown Schemes:\n");
        for (scheme, caps) in &self.schemes {
            output.push_str(&format!("  {:<12} {}\n", scheme, flags(caps)));
        }

        output
    }

    fn to_compact(&self) -> String {
        self.channels
            .iter()
            .map(|c| c.destination.clone())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Rule listing for display
#[derive(Debug, Clone, Serialize)]
pub struct RuleList {
    pub path: String,
    pub recipients: Vec<Recipient>,
    pub rules: Vec<ThresholdRule>,
}

impl TableDisplay for RuleList {
    fn to_table(&self) -> String {
        let mut output = format!("Rule File: {}\n", self.path);

        output.push_str(&format!("Recipients: {}\n", self.recipients.len()));
        for recipient in &self.recipients {
            output.push_str(&format!("  {} <{}>\n", recipient.id, recipient.email));
        }

        output.push_str(&format!("\nRules: {}\n", self.rules.len()));
        for rule in &self.rules {
            let threshold = if rule.kind.is_sliding_value() {
                format!(" > {:.1}%", rule.threshold)
            } else {
                String::new()
            };
            output.push_str(&format!(
                "  {} {} {}{} -> {}{}\n",
                rule.id,
                rule.entity_id,
                rule.kind,
                threshold,
                rule.recipient,
                if rule.triggered { " [TRIGGERED]" } else { "" }
            ));
        }

        output
    }

    fn to_compact(&self) -> String {
        format!(
            "{} rule(s), {} recipient(s)",
            self.rules.len(),
            self.recipients.len()
        )
    }
}

/// Test-send result for display
#[derive(Debug, Clone, Serialize)]
pub struct TestSendResult {
    pub destination: String,
    pub sent: bool,
}

impl TableDisplay for TestSendResult {
    fn to_table(&self) -> String {
        format!("Test notification sent to {}", self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RuleKind;

    #[test]
    fn test_flags() {
        assert_eq!(flags(&ChannelCapabilities::PLAIN), "plain");
        assert_eq!(
            flags(&ChannelCapabilities::TITLED_WITH_ACTIONS),
            "title, link-action"
        );
    }

    #[test]
    fn test_rule_list_table() {
        let list = RuleList {
            path: "rules.toml".to_string(),
            recipients: vec![Recipient::new("u1", "ops@example.com")],
            rules: vec![
                ThresholdRule::sliding("r1", "web1", "u1", RuleKind::Disk, 90.0)
                    .unwrap()
                    .with_triggered(true),
                ThresholdRule::status("r2", "web1", "u1"),
            ],
        };

        let table = list.to_table();
        assert!(table.contains("u1 <ops@example.com>"));
        assert!(table.contains("r1 web1 Disk > 90.0% -> u1 [TRIGGERED]"));
        assert!(table.contains("r2 web1 Status -> u1"));
        assert_eq!(list.to_compact(), "2 rule(s), 1 recipient(s)");
    }

    #[test]
    fn test_empty_report() {
        let report = ProcessReport {
            entity_id: "web1".to_string(),
            entity_name: "Web 1".to_string(),
            notifications: Vec::new(),
        };
        assert!(report.to_table().contains("No rule changed state"));
        assert_eq!(report.to_compact(), "web1 []");
    }
}
