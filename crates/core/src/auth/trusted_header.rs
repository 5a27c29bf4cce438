//! Trusted identity-header authentication.

use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Identity};

/// Authenticator that trusts an identity header set by the fronting
/// auth provider (the hosted session backend or a reverse proxy that
/// has already verified the session).
///
/// The header name is configurable; matching is case-insensitive since
/// `AuthRequest` carries lower-cased header names.
pub struct TrustedHeaderAuthenticator {
    header: String,
}

impl TrustedHeaderAuthenticator {
    pub const DEFAULT_HEADER: &'static str = "x-user-id";

    pub fn new(header: String) -> Self {
        Self {
            header: header.to_lowercase(),
        }
    }
}

#[async_trait]
impl Authenticator for TrustedHeaderAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let user_id = request
            .headers
            .get(&self.header)
            .ok_or(AuthError::NotAuthenticated)?;

        if user_id.trim().is_empty() {
            return Err(AuthError::InvalidCredentials(format!(
                "empty {} header",
                self.header
            )));
        }

        Ok(Identity {
            user_id: user_id.trim().to_string(),
            method: "trusted_header".to_string(),
        })
    }

    fn method_name(&self) -> &'static str {
        "trusted_header"
    }
}
