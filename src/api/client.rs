//! HTTP client for the NPI application API
//!
//! Wraps a configured `reqwest::Client`. Every call is made once; failures are
//! classified into [`GatewayError`] and handed back to the caller.

use super::error::GatewayError;
use super::traits::ApiClientTrait;
use super::wire::{
    application_payload, ApplicationDetail, ApplicationList, SubmissionReceipt,
};
use crate::config::WizardConfig;
use crate::wizard::FormRecord;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Client for the application API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client from configuration and the `NPI_API_URL` override
    pub fn new(config: &WizardConfig) -> Result<Self> {
        let base_url = config.api_base_url()?;
        Self::with_base_url(base_url, config)
    }

    fn with_base_url(base_url: String, config: &WizardConfig) -> Result<Self> {
        let base_url =
            Url::parse(&base_url).with_context(|| format!("parse API URL '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            bail!("API URL '{base_url}' cannot hold endpoint paths");
        }

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder()
            .default_headers(default_headers)
            .user_agent(concat!("npi-wizard/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build http client")?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Endpoint below the base URL; each segment is percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "API request");
        self.http.request(method, url)
    }

    /// Send a request and decode a JSON success body
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request.send().await.map_err(|error| {
            warn!(%error, "API request failed before a response arrived");
            GatewayError::from_transport(&error)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "API returned an error");
            return Err(GatewayError::from_response(status.as_u16(), &body));
        }

        response.json::<T>().await.map_err(|error| {
            warn!(%error, "could not decode API response");
            GatewayError::Unknown(error.to_string())
        })
    }
}

#[async_trait]
impl ApiClientTrait for ApiClient {
    async fn check_health(&self) -> bool {
        match self.request(Method::GET, &["health"]).send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                debug!(%error, "health check failed");
                false
            }
        }
    }

    async fn submit_application(
        &self,
        record: &FormRecord,
    ) -> Result<SubmissionReceipt, GatewayError> {
        let payload = application_payload(record)?;
        self.send_json(self.request(Method::POST, &["applications"]).json(&payload))
            .await
    }

    async fn list_applications(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<ApplicationList, GatewayError> {
        let request = self
            .request(Method::GET, &["applications"])
            .query(&[("limit", limit), ("offset", offset)]);
        self.send_json(request).await
    }

    async fn get_application(
        &self,
        application_id: &str,
    ) -> Result<ApplicationDetail, GatewayError> {
        let request = self.request(Method::GET, &["applications", application_id.trim()]);
        self.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::controller::tests::wizard_at_review;

    /// Nothing listens on port 1 on a test machine
    fn unreachable_client() -> ApiClient {
        ApiClient::with_base_url("http://127.0.0.1:1/api".to_string(), &WizardConfig::default())
            .unwrap()
    }

    #[test]
    fn test_client_keeps_base_url() {
        let config = WizardConfig {
            request_timeout_secs: Some(5),
            ..Default::default()
        };
        let client =
            ApiClient::with_base_url("https://npi.example.gov/api".to_string(), &config).unwrap();
        assert_eq!(client.base_url(), "https://npi.example.gov/api");
    }

    #[test]
    fn test_endpoint_segments_are_encoded() {
        let client = ApiClient::with_base_url(
            "https://npi.example.gov/api".to_string(),
            &WizardConfig::default(),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(&["applications", "7"]).as_str(),
            "https://npi.example.gov/api/applications/7"
        );
        assert_eq!(
            client.endpoint(&["applications", "../admin?x=1 #"]).as_str(),
            "https://npi.example.gov/api/applications/..%2Fadmin%3Fx=1%20%23"
        );
    }

    #[test]
    fn test_host_only_base_url() {
        let client =
            ApiClient::with_base_url("http://localhost:8000".to_string(), &WizardConfig::default())
                .unwrap();
        assert_eq!(
            client.endpoint(&["health"]).as_str(),
            "http://localhost:8000/health"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        let client = unreachable_client();
        let result = client.submit_application(wizard_at_review().record()).await;
        assert_eq!(result, Err(GatewayError::Network));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unhealthy() {
        assert!(!unreachable_client().check_health().await);
    }

    #[tokio::test]
    async fn test_incomplete_record_is_not_sent() {
        let client = unreachable_client();
        let result = client.submit_application(&FormRecord::new()).await;
        assert!(matches!(result, Err(GatewayError::Unknown(_))));
    }
}
