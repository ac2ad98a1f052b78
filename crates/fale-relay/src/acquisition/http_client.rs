//! Async HTTP client wrapping reqwest.
//!
//! One GET per call, no retries. Redirects and the timeout come from
//! [`RelayConfig`]. Upstream status codes are reported, not judged: a 404
//! page is still a page to rewrite.

use std::time::Duration;

use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};

/// Response from an upstream GET request.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Content-Type header, if sent.
    pub content_type: Option<String>,
    /// Response body, decoded with the declared charset (UTF-8 otherwise).
    pub body: String,
}

impl FetchResult {
    /// Whether the upstream declared an HTML document (or declared nothing).
    pub fn is_html(&self) -> bool {
        self.content_type.as_deref().map_or(true, |ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("text/html") || ct.contains("application/xhtml")
        })
    }

    /// Whether the upstream declared a non-HTML XML type (`*/xml`, `*+xml`).
    pub fn is_xml(&self) -> bool {
        !self.is_html()
            && self.content_type.as_deref().is_some_and(|ct| {
                let mime = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
                mime.ends_with("/xml") || mime.ends_with("+xml")
            })
    }
}

/// HTTP client used to pull pages for rewriting.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(config: &RelayConfig) -> RelayResult<Self> {
        let timeout = Duration::from_millis(config.fetch_timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Perform a single GET request.
    ///
    /// Transport failures (DNS, refused connection, timeout, unreadable
    /// body) become [`RelayError::Fetch`].
    pub async fn get(&self, url: &str) -> RelayResult<FetchResult> {
        tracing::debug!(%url, "fetching upstream");

        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = resp.text().await?;

        tracing::info!(%url, status, bytes = body.len(), "fetched upstream");

        Ok(FetchResult {
            url: url.to_string(),
            final_url,
            status,
            content_type,
            body,
        })
    }
}
