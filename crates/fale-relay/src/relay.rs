// Copyright 2026 Fale Relay Contributors
// SPDX-License-Identifier: Apache-2.0

//! The validate → fetch → rewrite pipeline.
//!
//! Shared by the REST handler and the one-shot CLI commands. Holds no
//! per-request state, so one [`Relay`] serves any number of concurrent
//! requests.

use serde::{Deserialize, Serialize};

use crate::acquisition::HttpClient;
use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::rewrite::Rewriter;

/// Inbound `/fetch` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Successful `/fetch` reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    pub success: bool,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    pub original_url: String,
    /// URL the content was served from, after redirects.
    pub final_url: String,
    /// Upstream HTTP status.
    pub status: u16,
}

/// Require a non-empty `url`.
///
/// Only absence is a client error. A URL that is present but cannot be
/// fetched (unparseable, relative, non-http scheme) fails like any other
/// fetch, before any network traffic.
pub fn validate_url(raw: Option<&str>) -> RelayResult<url::Url> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(RelayError::MissingUrl);
    }

    let parsed = url::Url::parse(raw).map_err(|e| RelayError::Fetch(format!("{raw}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(RelayError::Fetch(format!(
            "{raw}: unsupported scheme '{other}'"
        ))),
    }
}

pub struct Relay {
    client: HttpClient,
    rewriter: Rewriter,
}

impl Relay {
    pub fn new(config: &RelayConfig) -> RelayResult<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
            rewriter: Rewriter::new(config.rules.clone()),
        })
    }

    /// Run the full pipeline for one request.
    pub async fn handle(&self, request: FetchRequest) -> RelayResult<FetchResponse> {
        let url = validate_url(request.url.as_deref())?;
        let fetched = self.client.get(url.as_str()).await?;

        let rewritten = if fetched.is_xml() {
            self.rewriter.rewrite_markup_xml(&fetched.body)
        } else {
            self.rewriter.rewrite_html(&fetched.body)
        };

        Ok(FetchResponse {
            success: true,
            content: rewritten.html,
            title: rewritten.title,
            original_url: fetched.url,
            final_url: fetched.final_url,
            status: fetched.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_validate_missing_and_empty() {
        assert!(matches!(validate_url(None), Err(RelayError::MissingUrl)));
        assert!(matches!(validate_url(Some("")), Err(RelayError::MissingUrl)));
        assert!(matches!(validate_url(Some("   ")), Err(RelayError::MissingUrl)));
    }

    #[test]
    fn test_validate_unfetchable_url_is_fetch_error() {
        for raw in ["not-a-url", "example.com/page", "file:///etc/passwd"] {
            let err = validate_url(Some(raw)).unwrap_err();
            assert!(matches!(err, RelayError::Fetch(_)), "{raw}");
            assert!(err.to_string().starts_with("Failed to fetch content"));
            assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_validate_accepts_http_and_https() {
        assert_eq!(
            validate_url(Some(" https://example.com/ ")).unwrap().as_str(),
            "https://example.com/"
        );
        assert!(validate_url(Some("http://localhost:8080/x")).is_ok());
    }

    #[test]
    fn test_fetch_request_defaults_url() {
        let req: FetchRequest = serde_json::from_str("{}").unwrap();
        assert!(req.url.is_none());
    }

    #[test]
    fn test_response_uses_camel_case() {
        let resp = FetchResponse {
            success: true,
            content: "<p>Fale</p>".to_string(),
            title: None,
            original_url: "https://example.com/".to_string(),
            final_url: "https://www.example.com/".to_string(),
            status: 200,
        };
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["originalUrl"], "https://example.com/");
        assert_eq!(v["finalUrl"], "https://www.example.com/");
        assert!(v.get("title").is_none());
    }

    async fn relay_body(body: &str, mime: &str) -> FetchResponse {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), mime))
            .mount(&server)
            .await;

        Relay::new(&RelayConfig::default())
            .unwrap()
            .handle(FetchRequest {
                url: Some(server.uri()),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_handle_atom_feed_keeps_link_targets() {
        let resp = relay_body(
            r#"<feed><title>Yale News</title><link href="https://www.yale.edu/news"/></feed>"#,
            "application/atom+xml",
        )
        .await;
        assert!(resp.content.contains(r#"href="https://www.yale.edu/news""#));
        assert!(resp.content.contains("<title>Fale News</title>"));
        assert_eq!(resp.title.as_deref(), Some("Fale News"));
    }

    #[tokio::test]
    async fn test_handle_plain_text_is_parsed_as_markup() {
        let resp = relay_body(r#"Go Yale! <a href="https://yale.edu">yale</a>"#, "text/plain").await;
        assert!(resp.content.contains("Go Fale!"));
        assert!(resp.content.contains(r#"href="https://yale.edu""#));
        assert_eq!(resp.title, None);
    }

    #[tokio::test]
    async fn test_handle_missing_url_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let relay = Relay::new(&RelayConfig::default()).unwrap();
        let err = relay.handle(FetchRequest::default()).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingUrl));
    }
}
