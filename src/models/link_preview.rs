use serde::{Deserialize, Serialize};

/// Social-preview metadata returned by `POST /api/preview`.
///
/// Every field is always present; a value that no source yields is an empty
/// string. `image`, when non-empty, is an absolute URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMetadata {
    pub url: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub site_name: String,
}

impl PreviewMetadata {
    pub fn new(url: impl Into<String>) -> Self {
        PreviewMetadata {
            url: url.into(),
            ..Default::default()
        }
    }
}
