use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

use crate::config::RegistryTarget;
use crate::error::{PublishError, Result};

const USER_AGENT: &str = concat!("webui-publish/", env!("CARGO_PKG_VERSION"));

/// One-shot HTTP client for the plugin registry.
///
/// Every HTTP response, success or error status, comes back as `Ok(status)`.
/// Only failures with no response at all (connect, DNS, timeout) are errors.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    target: RegistryTarget,
}

impl RegistryClient {
    pub fn new(target: RegistryTarget) -> Self {
        Self { target }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.target.base_url.trim_end_matches('/'), path)
    }

    pub async fn publish<T: Serialize>(&self, path: &str, payload: &T) -> Result<u16> {
        let body = serde_json::to_vec(payload)?;
        let url = self.endpoint(path);

        // A fresh client per call so no connection is reused between publishes.
        let http = reqwest::Client::builder()
            .timeout(self.target.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(PublishError::TransportFailure)?;

        tracing::debug!(url = %url, bytes = body.len(), "POST to registry");

        let response = http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.target.api_key))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %url, error = %e, "Registry unreachable");
                PublishError::TransportFailure(e)
            })?;

        let status = response.status().as_u16();
        if response.status().is_success() {
            tracing::debug!(url = %url, status, "Registry accepted request");
        } else {
            tracing::debug!(url = %url, status, "Registry returned error status");
        }
        Ok(status)
    }
}
