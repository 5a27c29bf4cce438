//! Authenticator for deployments without a session provider.

use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Identity};

/// Authenticator used when auth is disabled.
///
/// Never yields an identity: every request browses anonymously and
/// per-user operations fail their precondition downstream instead of
/// being rejected at the HTTP boundary.
#[derive(Debug, Default)]
pub struct NoneAuthenticator;

impl NoneAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Authenticator for NoneAuthenticator {
    async fn authenticate(&self, _request: &AuthRequest) -> Result<Identity, AuthError> {
        Err(AuthError::NotAuthenticated)
    }

    fn method_name(&self) -> &'static str {
        "none"
    }
}
