use anyhow::Context;
use timeline_core::{Fetch, FetchResponse, LoadError};

/// Transport `reqwest` cho loader của timeline.
pub struct HttpFetch {
    client: reqwest::Client,
}

impl HttpFetch {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("timeline-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Không tạo được HTTP client")?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetch {
    async fn get(&self, url: &str) -> Result<FetchResponse, LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| LoadError::Network(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| LoadError::Network(err.to_string()))?;

        Ok(FetchResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
