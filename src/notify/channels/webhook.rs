//! Webhook-style push adapter
//!
//! Delivers to push services addressed by service URLs such as
//! `ntfy://ntfy.sh/alerts` or `generic://hooks.example.com/notify`. The
//! service scheme selects capabilities; the request itself goes to
//! `https://host[:port]/path` (plain `http` with `disabletls=yes`).

use super::ChannelAdapter;
use crate::error::ChannelError;
use crate::notify::destination::{Destination, DestinationKind};
use crate::notify::formatter::{Payload, PARAM_TEMPLATE};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

/// Query flag selecting plain HTTP
const DISABLE_TLS: &str = "disabletls";

/// HTTP push adapter
pub struct WebhookAdapter {
    client: Client,
}

impl WebhookAdapter {
    /// Create an adapter whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, ChannelError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hostalert/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Derive the HTTP endpoint for a service URL and payload
    ///
    /// The service URL's query is kept. For plain payloads the title and all
    /// formatter parameters are appended as query parameters; structured
    /// payloads carry them in the JSON body instead.
    pub fn endpoint(url: &Url, payload: &Payload) -> Result<Url, ChannelError> {
        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let insecure = pairs
            .iter()
            .any(|(k, v)| k == DISABLE_TLS && matches!(v.as_str(), "yes" | "true" | "1"));
        pairs.retain(|(k, _)| k != DISABLE_TLS);

        let scheme = match url.scheme() {
            s @ ("http" | "https") => s,
            _ if insecure => "http",
            _ => "https",
        };

        let host = url
            .host_str()
            .ok_or_else(|| ChannelError::InvalidEndpoint(format!("{} has no host", url)))?;

        let mut endpoint = Url::parse(&format!("{}://{}", scheme, host))
            .map_err(|e| ChannelError::InvalidEndpoint(e.to_string()))?;
        endpoint
            .set_port(url.port())
            .map_err(|_| ChannelError::InvalidEndpoint(format!("cannot set port on {}", host)))?;
        endpoint.set_path(url.path());

        if !payload.is_structured() {
            if let Some(title) = &payload.title {
                pairs.push(("title".to_string(), title.clone()));
            }
            pairs.extend(payload.params.iter().cloned());
        } else {
            pairs.extend(
                payload
                    .params
                    .iter()
                    .filter(|(k, _)| k != PARAM_TEMPLATE && !k.starts_with('$'))
                    .cloned(),
            );
        }

        if !pairs.is_empty() {
            endpoint.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(endpoint)
    }

    /// JSON body for structured sinks
    ///
    /// `$name` parameters become top-level `name` fields next to `message`.
    pub fn structured_body(payload: &Payload) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert(
            "message".to_string(),
            serde_json::Value::String(payload.body.clone()),
        );
        for (key, value) in &payload.params {
            if let Some(field) = key.strip_prefix('$') {
                object.insert(field.to_string(), serde_json::Value::String(value.clone()));
            }
        }
        serde_json::Value::Object(object)
    }
}

impl ChannelAdapter for WebhookAdapter {
    fn send(&self, destination: &Destination, payload: &Payload) -> Result<(), ChannelError> {
        let Destination::Push(url) = destination else {
            return Err(ChannelError::NoAdapter(destination.kind().to_string()));
        };

        let endpoint = Self::endpoint(url, payload)?;

        let mut request = if payload.is_structured() {
            self.client
                .post(endpoint)
                .json(&Self::structured_body(payload))
        } else {
            self.client
                .post(endpoint)
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(payload.body.clone())
        };

        if !url.username().is_empty() {
            request = request.basic_auth(url.username(), url.password());
        }

        let response = request.send()?;

        if !response.status().is_success() {
            return Err(ChannelError::Status(response.status().as_u16()));
        }

        log::debug!("Webhook notification sent to {}", destination);
        Ok(())
    }

    fn handles(&self, kind: DestinationKind) -> bool {
        kind == DestinationKind::Push
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
