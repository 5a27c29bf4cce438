//! Upstream image API integration.
//!
//! This module provides the client for the external cat image search
//! endpoint. Fetched images are display-only until the gallery ingests
//! them; the client itself knows nothing about persistence.

mod client;
mod types;

pub use client::CatApiClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the image API.
#[derive(Debug, Error)]
pub enum ImageSourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for image search backends.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Name of this backend.
    fn name(&self) -> &'static str;

    /// Search for images matching the query.
    async fn search_images(
        &self,
        query: &ImageSearchQuery,
    ) -> Result<Vec<CatImage>, ImageSourceError>;
}
