use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use super::errors::FetchError;

/// Retrieves raw CRL bytes from a distribution point
#[async_trait]
pub trait CrlFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP(S) fetcher backed by `reqwest`.
///
/// Idle connections are never kept in the pool, so each fetch opens its own
/// connection and releases it when the call returns. No timeout is applied;
/// a fetch lasts until the transport resolves or fails.
#[derive(Debug, Clone)]
pub struct HttpCrlFetcher {
    client: Client,
}

impl HttpCrlFetcher {
    /// Returns an error if the HTTP client cannot be initialized
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder().pool_max_idle_per_host(0).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CrlFetcher for HttpCrlFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        info!("Downloading CRL from {}", url);

        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let response = self.client.get(parsed).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body = response.bytes().await?.to_vec();
        debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
