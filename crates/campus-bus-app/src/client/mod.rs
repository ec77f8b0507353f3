//! Clients for a running fleet service
//!
//! - [`FleetClient`]: typed HTTP calls for every endpoint
//! - [`Broadcaster`]: the driver side, publishing positions on a timer
//! - [`Poller`]: the rider/admin side, polling the fleet and diffing snapshots

pub mod broadcaster;
pub mod poller;

pub use broadcaster::{BroadcastSession, BroadcastStats, Broadcaster, LogOnlySink, ReportSink, SampleFeed};
pub use poller::{PollStats, Poller};

use std::time::Duration;

use campus_bus_domain::model::{FleetEntry, PositionReport, Route};
use campus_bus_domain::service::FleetSummary;
use campus_bus_types::TransportError;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::routes::{AssistantReply, AssistantRequest};
use crate::app::Ack;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the fleet service API
#[derive(Debug, Clone)]
pub struct FleetClient {
    base_url: Url,
    http: reqwest::Client,
}

impl FleetClient {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TransportError::Http(format!("invalid server URL '{base_url}': {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::Http(format!("cannot use '{}' as a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, TransportError> {
        let response = self
            .http
            .get(self.url(segments)?)
            .query(query)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, TransportError> {
        let response = self
            .http
            .post(self.url(segments)?)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Self::decode(response).await
    }

    pub async fn health(&self) -> Result<Value, TransportError> {
        self.get_json(&["api", "health"], &[]).await
    }

    /// Publish one position report
    pub async fn report(&self, report: &PositionReport) -> Result<Ack, TransportError> {
        self.post_json(&["api", "update"], report).await
    }

    /// Current fleet, optionally filtered by exact route name
    pub async fn locations(&self, route: Option<&str>) -> Result<Vec<FleetEntry>, TransportError> {
        match route {
            Some(route) => self.get_json(&["api", "locations"], &[("route", route)]).await,
            None => self.get_json(&["api", "locations"], &[]).await,
        }
    }

    pub async fn bus(&self, bus_id: &str) -> Result<FleetEntry, TransportError> {
        self.get_json(&["api", "locations", bus_id], &[]).await
    }

    pub async fn routes(&self) -> Result<Vec<Route>, TransportError> {
        self.get_json(&["api", "routes"], &[]).await
    }

    pub async fn stats(&self) -> Result<FleetSummary, TransportError> {
        self.get_json(&["api", "stats"], &[]).await
    }

    pub async fn ask(&self, message: &str) -> Result<String, TransportError> {
        let request = AssistantRequest {
            message: message.to_string(),
        };
        let reply: AssistantReply = self.post_json(&["api", "assistant"], &request).await?;
        Ok(reply.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = FleetClient::new("http://127.0.0.1:8000").unwrap();
        assert_eq!(
            client.url(&["api", "locations", "DIU 7"]).unwrap().as_str(),
            "http://127.0.0.1:8000/api/locations/DIU%207"
        );

        let prefixed = FleetClient::new("http://example.com/bus/").unwrap();
        assert_eq!(
            prefixed.url(&["api", "health"]).unwrap().as_str(),
            "http://example.com/bus/api/health"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            FleetClient::new("not a url"),
            Err(TransportError::Http(_))
        ));
    }
}
