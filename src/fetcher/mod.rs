use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::FetchConfig;
use crate::error::{AppError, AppResult};

pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Outbound HTTP access for the preview pipeline.
///
/// Wraps one pooled `reqwest` client built with the configured deadline and
/// browser-like headers. Cloning is cheap and shares the pool.
#[derive(Clone, Debug)]
pub struct HtmlFetcher {
    client: ReqwestClient,
    max_content_length: usize,
}

impl HtmlFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );

        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(HtmlFetcher {
            client,
            max_content_length: config.max_content_length,
        })
    }

    pub fn max_content_length(&self) -> usize {
        self.max_content_length
    }

    /// GET `url` and return its body as text. Only 2xx responses succeed;
    /// the body is capped at `max_content_length` bytes.
    pub async fn fetch_html(&self, url: &Url) -> AppResult<String> {
        let body = self.fetch_bytes(url.as_str()).await?;
        tracing::debug!(url = %url, bytes = body.len(), "Fetched page");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// GET `url` and decode its body as JSON, under the same status check
    /// and size cap as [`fetch_html`](Self::fetch_html).
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        let body = self.fetch_bytes(url).await?;
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Extraction(format!("invalid JSON response: {e}")))
    }

    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::FetchFailed {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        if let Some(declared) = response.content_length() {
            if declared > self.max_content_length as u64 {
                return Err(self.too_large());
            }
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(classify_transport_error)? {
            if body.len() + chunk.len() > self.max_content_length {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    fn too_large(&self) -> AppError {
        AppError::Network(format!(
            "response body exceeds {} bytes",
            self.max_content_length
        ))
    }
}

/// Map a `reqwest` failure that happened before a status was available (or
/// while streaming the body) onto the preview error taxonomy.
pub fn classify_transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Timeout
    } else {
        AppError::Network(e.to_string())
    }
}
