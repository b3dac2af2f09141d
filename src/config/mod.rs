use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 5 * 1024 * 1024;
pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("OEMBED_ENDPOINT is not an absolute URL: {0}")]
    InvalidOembedEndpoint(String),
}

/// Settings for every outbound request the service makes.
#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_content_length: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout: DEFAULT_FETCH_TIMEOUT,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub is_dev: bool,
    pub fetch: FetchConfig,
    pub oembed_endpoint: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let timeout = env::var("FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT);

        let oembed_endpoint =
            env::var("OEMBED_ENDPOINT").unwrap_or_else(|_| DEFAULT_OEMBED_ENDPOINT.to_string());
        if Url::parse(&oembed_endpoint).is_err() {
            return Err(ConfigError::InvalidOembedEndpoint(oembed_endpoint));
        }

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            is_dev: env::var("APP_ENV").as_deref() != Ok("production"),
            fetch: FetchConfig {
                timeout,
                max_content_length: env::var("MAX_CONTENT_LENGTH")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_CONTENT_LENGTH),
                user_agent: env::var("PREVIEW_USER_AGENT")
                    .ok()
                    .filter(|ua| !ua.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            },
            oembed_endpoint,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
