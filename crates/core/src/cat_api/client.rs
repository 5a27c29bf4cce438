//! HTTP client for the cat image API.
//!
//! The upstream API requires an API key; requests without one are
//! rejected, so construction fails early on an empty key.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::types::{CatImage, ImageSearchQuery};
use super::{ImageSource, ImageSourceError};
use crate::config::CatApiConfig;

const DEFAULT_BASE_URL: &str = "https://api.thecatapi.com/v1";

/// Image API client.
pub struct CatApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CatApiClient {
    /// Create a new client from config.
    pub fn new(config: CatApiConfig) -> Result<Self, ImageSourceError> {
        if config.api_key.is_empty() {
            return Err(ImageSourceError::NotConfigured(
                "image API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }
}

#[async_trait::async_trait]
impl ImageSource for CatApiClient {
    fn name(&self) -> &'static str {
        "cat_api"
    }

    async fn search_images(
        &self,
        query: &ImageSearchQuery,
    ) -> Result<Vec<CatImage>, ImageSourceError> {
        let url = format!("{}/images/search", self.base_url);

        debug!(
            "image search: limit={}, mime_types={:?}",
            query.limit, query.mime_types
        );

        let mut request = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .query(&[("limit", query.limit.to_string())]);

        if let Some(ref mime_types) = query.mime_types {
            request = request.query(&[("mime_types", mime_types)]);
        }

        let response = request.send().await?;

        let status = response.status();
        if status == 401 {
            return Err(ImageSourceError::NotConfigured(
                "Invalid image API key".to_string(),
            ));
        }
        if status == 429 {
            return Err(ImageSourceError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageSourceError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let images: Vec<CatImage> = response.json().await.map_err(|e| {
            ImageSourceError::ParseError(format!("Failed to parse image search response: {}", e))
        })?;

        Ok(images)
    }
}
