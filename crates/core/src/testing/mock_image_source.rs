//! Mock image source for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cat_api::{CatImage, ImageSearchQuery, ImageSource, ImageSourceError};

/// Mock implementation of the ImageSource trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable image results
/// - Track search queries for assertions
/// - Simulate a one-shot upstream failure
pub struct MockImageSource {
    /// Configured results to return.
    results: Arc<RwLock<Vec<CatImage>>>,
    /// Recorded search queries.
    queries: Arc<RwLock<Vec<ImageSearchQuery>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<ImageSourceError>>>,
}

impl Default for MockImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockImageSource {
    /// Create a new mock source with empty results.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the results to return for subsequent searches.
    pub async fn set_results(&self, results: Vec<CatImage>) {
        *self.results.write().await = results;
    }

    /// Clear all results.
    pub async fn clear_results(&self) {
        self.results.write().await.clear();
    }

    /// Get recorded search queries.
    pub async fn recorded_queries(&self) -> Vec<ImageSearchQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: ImageSourceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<ImageSourceError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl ImageSource for MockImageSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search_images(
        &self,
        query: &ImageSearchQuery,
    ) -> Result<Vec<CatImage>, ImageSourceError> {
        // Check for injected error
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        // Record the query
        self.queries.write().await.push(query.clone());

        let results = self.results.read().await;
        Ok(results.iter().take(query.limit as usize).cloned().collect())
    }
}
