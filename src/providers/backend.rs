use crate::core::config::{BackendConfig, IndicatorsConfig};
use crate::core::payload::HealthStatus;
use crate::core::source::{DashboardClient, ErrorKind, FetchError, SourceKind, SourcePayload};
use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Client for the stability prediction API.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
    indicators: IndicatorsConfig,
}

impl HttpBackend {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        indicators: IndicatorsConfig,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("esd/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            indicators,
        })
    }

    pub fn from_config(
        backend: &BackendConfig,
        indicators: &IndicatorsConfig,
    ) -> anyhow::Result<Self> {
        Self::new(&backend.base_url, backend.timeout(), indicators.clone())
    }

    fn url(&self, kind: SourceKind) -> String {
        let mut url = format!("{}{}", self.base_url, kind.path());
        if kind == SourceKind::Stability {
            let params: Vec<String> = [
                ("inflation_rate", self.indicators.inflation_rate),
                ("repo_rate", self.indicators.repo_rate),
            ]
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| format!("{name}={v}")))
            .collect();
            if !params.is_empty() {
                url.push('?');
                url.push_str(&params.join("&"));
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("Requesting {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(e, url))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| classify(e, url))?;

        if !status.is_success() {
            debug!(%status, body = %text, "Backend reported a failure");
            return Err(FetchError::remote(remote_detail(&text)));
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, response = %text, "Failed to parse backend response");
            FetchError::new(
                ErrorKind::Unknown,
                format!("Failed to parse JSON response from {url}: {e}"),
            )
        })
    }

    pub async fn health(&self) -> Result<HealthStatus, FetchError> {
        let url = format!("{}/health", self.base_url);
        self.get_json(&url).await
    }
}

#[async_trait]
impl DashboardClient for HttpBackend {
    #[instrument(name = "BackendFetch", skip(self), fields(source = %kind))]
    async fn fetch(&self, kind: SourceKind) -> Result<SourcePayload, FetchError> {
        let url = self.url(kind);
        let payload = match kind {
            SourceKind::Market => SourcePayload::Market(self.get_json(&url).await?),
            SourceKind::Forecast => SourcePayload::Forecast(self.get_json(&url).await?),
            SourceKind::Sentiment => SourcePayload::Sentiment(self.get_json(&url).await?),
            SourceKind::Stability => SourcePayload::Stability(self.get_json(&url).await?),
        };
        Ok(payload)
    }
}

/// Maps a transport error onto the failure taxonomy.
fn classify(e: reqwest::Error, url: &str) -> FetchError {
    if e.is_timeout() {
        FetchError::timeout()
    } else if e.is_connect() {
        FetchError::new(ErrorKind::Unreachable, format!("Unable to reach {url}"))
    } else if let Some(status) = e.status() {
        FetchError::remote(Some(format!("HTTP error: {status}")))
    } else {
        FetchError::new(ErrorKind::Unknown, e.to_string())
    }
}

/// Extracts the `detail` message of a failure body, if it has one.
fn remote_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
}
