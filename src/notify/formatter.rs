//! Message formatting
//!
//! Renders a notification for one destination based only on the
//! destination's declared capabilities:
//!
//! | capability             | supported                          | not supported                  |
//! |------------------------|------------------------------------|--------------------------------|
//! | `supports_title`       | title sent as its own field        | `title + "\n\n" + body`        |
//! | `supports_link_action` | `actions` parameter with the link  | `"\n\n" + link` appended       |
//! | `is_structured_sink`   | `template=json`, `$title` params   | nothing extra                  |

use super::capabilities::ChannelCapabilities;
use crate::alerts::{AlertEvent, Notification};
use serde::Serialize;

/// Parameter carrying a clickable action
pub const PARAM_ACTIONS: &str = "actions";
/// Parameter selecting the structured template
pub const PARAM_TEMPLATE: &str = "template";
/// Parameter carrying the raw title for structured sinks
pub const PARAM_RAW_TITLE: &str = "$title";

/// Rendered message for one destination
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Payload {
    /// Separate title, only set when the destination supports one
    pub title: Option<String>,
    /// Message text
    pub body: String,
    /// Extra destination parameters in insertion order
    pub params: Vec<(String, String)>,
}

impl Payload {
    /// Look up a parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether this payload targets a structured sink
    pub fn is_structured(&self) -> bool {
        self.param(PARAM_TEMPLATE) == Some("json")
    }
}

/// Message formatter
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    /// Application name used in action labels
    app_name: String,
}

impl MessageFormatter {
    /// Create a new formatter
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    /// Application name used in action labels
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Format an alert event for a destination
    pub fn format(&self, event: &AlertEvent, caps: ChannelCapabilities) -> Payload {
        self.format_notification(&event.notification, caps)
    }

    /// Format a bare notification for a destination
    pub fn format_notification(&self, n: &Notification, caps: ChannelCapabilities) -> Payload {
        let mut payload = Payload::default();

        let mut body = if caps.supports_title {
            payload.title = Some(n.title.clone());
            n.body.clone()
        } else {
            format!("{}\n\n{}", n.title, n.body)
        };

        if !n.link.is_empty() {
            if caps.supports_link_action {
                payload.params.push((
                    PARAM_ACTIONS.to_string(),
                    format!("view, Open {}, {}", self.app_name, n.link),
                ));
            } else {
                body.push_str("\n\n");
                body.push_str(&n.link);
            }
        }

        if caps.is_structured_sink {
            payload
                .params
                .push((PARAM_TEMPLATE.to_string(), "json".to_string()));
            payload
                .params
                .push((PARAM_RAW_TITLE.to_string(), n.title.clone()));
        }

        payload.body = body;
        payload
    }
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new("hostalert")
    }
}
