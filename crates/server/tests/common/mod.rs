//! Common test utilities for E2E testing with mocks.
//!
//! Provides a test fixture that creates an in-process server with a mock
//! image source injected, enabling comprehensive E2E testing without
//! external infrastructure.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use whiskerboard_core::{
    testing::MockImageSource, AuthConfig, AuthMethod, Authenticator, Config, DatabaseConfig,
    GalleryService, ImageSource, ServerConfig, SqliteGallery, TrustedHeaderAuthenticator,
};

/// Re-export fixtures for test convenience
pub use whiskerboard_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with:
/// - A controllable mock image source
/// - A real SQLite gallery on a temp file
/// - Trusted-header auth, so tests pick a user per request
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock image source - configure fetch results
    pub image_source: Arc<MockImageSource>,
    /// Gallery service backed by the same store the server uses
    pub gallery: GalleryService,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let image_source = Arc::new(MockImageSource::new());

        let config = Config {
            auth: AuthConfig {
                method: AuthMethod::TrustedHeader,
                user_header: None,
            },
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            cat_api: None,
        };

        let authenticator: Arc<dyn Authenticator> = Arc::new(TrustedHeaderAuthenticator::new(
            TrustedHeaderAuthenticator::DEFAULT_HEADER.to_string(),
        ));

        let store = Arc::new(SqliteGallery::new(&db_path).expect("Failed to create gallery"));
        let gallery = GalleryService::new(store);

        let state = Arc::new(whiskerboard_server::state::AppState::new(
            config,
            authenticator,
            gallery.clone(),
            Some(Arc::clone(&image_source) as Arc<dyn ImageSource>),
        ));

        let router = whiskerboard_server::api::create_router(state);

        Self {
            router,
            image_source,
            gallery,
            temp_dir,
        }
    }

    /// Send an anonymous GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, None).await
    }

    /// Send a GET request as the given user.
    pub async fn get_as(&self, user: &str, path: &str) -> TestResponse {
        self.request("GET", path, None, Some(user)).await
    }

    /// Send an anonymous POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), None).await
    }

    /// Send a POST request as the given user.
    pub async fn post_as(&self, user: &str, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), Some(user)).await
    }

    /// Send an empty-bodied POST request as the given user.
    pub async fn post_empty_as(&self, user: &str, path: &str) -> TestResponse {
        self.request("POST", path, None, Some(user)).await
    }

    /// Send an anonymous empty-bodied POST request.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None, None).await
    }

    /// Send a request to the test server.
    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Option<&str>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(user) = user {
            request_builder = request_builder.header("x-user-id", user);
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    /// Wait until the gallery holds the expected number of cats.
    ///
    /// Ingestion is detached from the response path, so tests asserting
    /// on its effects poll instead of assuming it ran synchronously.
    pub async fn wait_for_cat_count(&self, expected: u64) {
        for _ in 0..200 {
            let stats = self.gallery.store().stats().expect("stats failed");
            if stats.total_cats == expected {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!(
            "gallery never reached {} cats (currently {})",
            expected,
            self.gallery.store().stats().unwrap().total_cats
        );
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
