use crate::error::TriggerError;
use crate::traits::CiClient;
use crate::trigger::TriggerRequest;
use async_trait::async_trait;
use color_eyre::eyre::{eyre, Result};
use std::time::Duration;

const USER_AGENT: &str = concat!("deployw/", env!("CARGO_PKG_VERSION"));

/// [`CiClient`] over HTTP.
pub struct HttpCiClient {
    client: reqwest::Client,
}

impl HttpCiClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {e}"))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CiClient for HttpCiClient {
    async fn trigger_pipeline(&self, request: &TriggerRequest) -> Result<(), TriggerError> {
        let mut builder = self.client.post(&request.url);
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TriggerError::Status(status.as_u16()));
        }
        tracing::debug!(environment = %request.environment, %status, "trigger accepted");
        Ok(())
    }

    async fn fetch_badge(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| eyre!("Badge request failed: {e}"))?
            .error_for_status()
            .map_err(|e| eyre!("Badge request failed: {e}"))?;
        resp.text()
            .await
            .map_err(|e| eyre!("Failed to read badge body: {e}"))
    }
}
