use std::sync::Arc;

use crate::config::Config;
use crate::fetcher::HtmlFetcher;

/// Shared application state passed to all handlers.
/// Built once at startup and never mutated; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: HtmlFetcher,
    pub oembed_endpoint: Arc<str>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(AppState {
            fetcher: HtmlFetcher::new(&config.fetch)?,
            oembed_endpoint: Arc::from(config.oembed_endpoint.as_str()),
        })
    }
}
