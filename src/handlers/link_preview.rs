use axum::async_trait;
use axum::extract::{FromRequest, Request, State};
use axum::Json;
use bytes::Bytes;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::extractor::extract_metadata;
use crate::models::{PreviewMetadata, PreviewRequest};
use crate::state::AppState;
use crate::video;

// ── Validation ─────────────────────────────────────────────────────────────

/// A request target that has passed validation: the caller's string with
/// surrounding whitespace trimmed, plus its parsed form.
#[derive(Debug, Clone)]
pub struct PreviewTarget {
    pub raw: String,
    pub url: Url,
}

/// Parse `raw` as an absolute URL. No scheme allow-list is applied here;
/// schemes the fetcher cannot speak fail later as network errors.
pub fn validate_url(raw: &str) -> AppResult<Url> {
    Url::parse(raw).map_err(|_| AppError::InvalidUrl)
}

impl PreviewTarget {
    /// Validate the `url` member of a request body.
    ///
    /// Absent, `null`, `false`, `0` and `""` count as missing. Any other
    /// non-string value is an invalid URL.
    pub fn from_value(value: Option<Value>) -> AppResult<Self> {
        let raw = match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => {
                return Err(AppError::MissingUrl)
            }
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => return Err(AppError::MissingUrl),
            Some(Value::String(s)) if s.is_empty() => return Err(AppError::MissingUrl),
            Some(Value::String(s)) => s,
            Some(_) => return Err(AppError::InvalidUrl),
        };

        let raw = raw.trim().to_string();
        let url = validate_url(&raw)?;
        Ok(PreviewTarget { raw, url })
    }

    /// Validate a raw request body. A body that is not a JSON object carries
    /// no `url`, so it is reported as missing.
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        let request: PreviewRequest = serde_json::from_slice(body).unwrap_or_default();
        Self::from_value(request.url)
    }
}

#[async_trait]
impl<S> FromRequest<S> for PreviewTarget
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::MissingUrl)?;
        Self::from_body(&body)
    }
}

// ── Pipeline ───────────────────────────────────────────────────────────────

/// Fetch the target page, extract its metadata and apply the video override.
///
/// A failed oEmbed lookup keeps the page's own metadata.
pub async fn build_preview(state: &AppState, target: &PreviewTarget) -> AppResult<PreviewMetadata> {
    let html = state.fetcher.fetch_html(&target.url).await?;

    let raw = target.raw.clone();
    let source = target.url.clone();
    let mut metadata = tokio::task::spawn_blocking(move || extract_metadata(&html, &raw, &source))
        .await
        .map_err(|e| AppError::Extraction(e.to_string()))??;

    if let Some(id) = video::video_id(&target.url) {
        match video::fetch_oembed(&state.fetcher, &state.oembed_endpoint, id).await {
            Ok(oembed) => video::apply_oembed(&mut metadata, id, &oembed),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    video_id = id,
                    "oEmbed lookup failed; keeping page metadata"
                );
            }
        }
    }

    Ok(metadata)
}

// ── Handler ────────────────────────────────────────────────────────────────

/// POST /api/preview  `{ "url": "<absolute url>" }`
///
/// Returns the page's social-preview metadata. Input errors are 400s; any
/// failure while fetching or extracting is a 500 with a descriptive message.
pub async fn create_preview(
    State(state): State<AppState>,
    target: PreviewTarget,
) -> AppResult<Json<PreviewMetadata>> {
    let metadata = build_preview(&state, &target).await?;
    tracing::debug!(
        url = %target.raw,
        title = %metadata.title,
        site_name = %metadata.site_name,
        "Built link preview"
    );
    Ok(Json(metadata))
}

// ── Unit tests ─────────────────────────────────────────────────────────────
