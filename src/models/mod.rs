use serde::Deserialize;
use serde_json::Value;

mod link_preview;

pub use link_preview::PreviewMetadata;

// ============================================================================
// Request Models
// ============================================================================

/// Body of `POST /api/preview`. `url` is kept as raw JSON so that absent,
/// `null`, and non-string values can be told apart during validation.
#[derive(Debug, Default, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub url: Option<Value>,
}

// ============================================================================
// oEmbed Models
// ============================================================================

/// The subset of an oEmbed JSON response the video override uses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OEmbedResponse {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: String,
}
