//! Downloads random placeholder images over HTTP.

use reqwest::Client;

use crate::Error;

const UA: &str = concat!("carteira/", env!("CARGO_PKG_VERSION"));

/// The image service queried for random 600x600 pictures.
pub const DEFAULT_BASE_URL: &str = "https://picsum.photos";

/// Fetches random images from a picsum-style HTTP endpoint.
///
/// The service returns a different picture for each value of the `random`
/// query parameter, so callers pass a fresh cache buster (typically the
/// current time in milliseconds) on every fetch.
#[derive(Debug, Clone)]
pub struct RandomImageFetcher {
    client: Client,
    base_url: String,
}

impl RandomImageFetcher {
    /// Create a fetcher pointed at [DEFAULT_BASE_URL].
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a fetcher pointed at a custom endpoint, e.g. a local test
    /// server.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// The URL queried for the given cache buster.
    pub fn request_url(&self, cache_buster: i64) -> String {
        format!("{}/600?random={cache_buster}", self.base_url)
    }

    /// Download one random image and return its raw encoded bytes.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Network] if the request fails or the server responds with
    ///   an error status,
    /// - or [Error::ImageDecode] if the response body is not a decodable
    ///   image.
    pub async fn fetch(&self, cache_buster: i64) -> Result<Vec<u8>, Error> {
        let url = self.request_url(cache_buster);
        tracing::debug!("fetching random image from {url}");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, UA)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?.to_vec();

        validate_image(&bytes)?;

        Ok(bytes)
    }
}

impl Default for RandomImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that `bytes` decode as an image in a known format.
fn validate_image(bytes: &[u8]) -> Result<(), Error> {
    image::load_from_memory(bytes)
        .map(|_| ())
        .map_err(|error| Error::ImageDecode(error.to_string()))
}
