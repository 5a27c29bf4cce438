//! Testing utilities and mock implementations for E2E tests.
//!
//! Provides a mock image source so server tests can exercise the fetch
//! and ingestion paths without real upstream infrastructure.

mod mock_image_source;

pub use mock_image_source::MockImageSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::cat_api::CatImage;

    /// Create a test image with reasonable defaults.
    pub fn cat_image(id: &str) -> CatImage {
        CatImage {
            id: id.to_string(),
            url: format!("https://cdn.example/{}.jpg", id),
            width: 640,
            height: 480,
            breeds: vec![],
        }
    }

    /// Create a batch of test images with sequential ids.
    pub fn cat_images(prefix: &str, count: usize) -> Vec<CatImage> {
        (0..count)
            .map(|i| cat_image(&format!("{}{}", prefix, i)))
            .collect()
    }
}
