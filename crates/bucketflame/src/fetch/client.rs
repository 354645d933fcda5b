//! HTTP client for downloading processed profiles.

use crate::utils::config::DEFAULT_HTTP_TIMEOUT;
use crate::utils::error::FetchError;
use log::{debug, info};
use reqwest::blocking::Client;

/// Client for fetching profile JSON documents
pub struct ProfileClient {
    client: Client,
}

impl ProfileClient {
    /// Create a new client with the default timeout
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(FetchError::RequestFailed)?;

        Ok(Self { client })
    }

    /// Download and decode a profile
    pub fn fetch_profile(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        info!("Fetching profile: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(FetchError::RequestFailed)?;

        if !response.status().is_success() {
            return Err(FetchError::InvalidResponse(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().unwrap_or_default()
            )));
        }

        let value: serde_json::Value = response.json().map_err(FetchError::RequestFailed)?;
        if !value.is_object() {
            return Err(FetchError::InvalidResponse(
                "Profile is not a JSON object".to_string(),
            ));
        }

        debug!("Profile downloaded");
        Ok(value)
    }
}

/// Whether an input argument names a remote profile
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
