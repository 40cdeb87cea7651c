//! Channel capability registry
//!
//! Maps a destination URL scheme to the message features the service behind
//! it understands. The formatter only ever looks at these flags, so adding a
//! channel type means adding one entry here (or in the config file).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Features a destination understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelCapabilities {
    /// Accepts a title separate from the body
    pub supports_title: bool,
    /// Accepts a clickable link/action
    pub supports_link_action: bool,
    /// Generic sink that wants machine-readable fields alongside the text
    pub is_structured_sink: bool,
}

impl ChannelCapabilities {
    /// No optional features
    pub const PLAIN: Self = Self {
        supports_title: false,
        supports_link_action: false,
        is_structured_sink: false,
    };

    /// Separate title only
    pub const TITLED: Self = Self {
        supports_title: true,
        supports_link_action: false,
        is_structured_sink: false,
    };

    /// Separate title and link actions
    pub const TITLED_WITH_ACTIONS: Self = Self {
        supports_title: true,
        supports_link_action: true,
        is_structured_sink: false,
    };

    /// Structured generic sink
    pub const STRUCTURED: Self = Self {
        supports_title: false,
        supports_link_action: false,
        is_structured_sink: true,
    };
}

/// Built-in capability declarations
const BUILTIN: &[(&str, ChannelCapabilities)] = &[
    ("bark", ChannelCapabilities::TITLED),
    ("discord", ChannelCapabilities::TITLED),
    ("gotify", ChannelCapabilities::TITLED),
    ("ifttt", ChannelCapabilities::TITLED),
    ("join", ChannelCapabilities::TITLED),
    ("matrix", ChannelCapabilities::TITLED),
    ("ntfy", ChannelCapabilities::TITLED_WITH_ACTIONS),
    ("opsgenie", ChannelCapabilities::TITLED),
    ("pushbullet", ChannelCapabilities::TITLED),
    ("pushover", ChannelCapabilities::TITLED),
    ("slack", ChannelCapabilities::TITLED),
    ("teams", ChannelCapabilities::TITLED),
    ("telegram", ChannelCapabilities::TITLED),
    ("zulip", ChannelCapabilities::TITLED),
    ("generic", ChannelCapabilities::STRUCTURED),
    // Mail: the title becomes the subject, links go in the text
    ("mailto", ChannelCapabilities::TITLED),
];

/// Scheme to capability lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRegistry {
    entries: BTreeMap<String, ChannelCapabilities>,
}

impl CapabilityRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Create a registry with the built-in declarations
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(scheme, caps)| (scheme.to_string(), *caps))
            .collect();
        Self { entries }
    }

    /// Add or replace a scheme's capabilities
    pub fn register(&mut self, scheme: impl Into<String>, caps: ChannelCapabilities) {
        self.entries.insert(scheme.into().to_lowercase(), caps);
    }

    /// Add or replace several entries
    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, ChannelCapabilities)>,
        S: Into<String>,
    {
        for (scheme, caps) in overrides {
            self.register(scheme, caps);
        }
        self
    }

    /// Look up a scheme
    ///
    /// Unknown schemes get no optional features.
    pub fn lookup(&self, scheme: &str) -> ChannelCapabilities {
        self.entries
            .get(&scheme.to_lowercase())
            .copied()
            .unwrap_or(ChannelCapabilities::PLAIN)
    }

    /// Iterate over registered schemes in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChannelCapabilities)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered schemes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no schemes are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
