mod none;
mod traits;
mod trusted_header;
mod types;

pub use none::*;
pub use traits::*;
pub use trusted_header::*;
pub use types::*;

use crate::config::AuthConfig;

/// Factory function to create authenticator from config
pub fn create_authenticator(config: &AuthConfig) -> Result<Box<dyn Authenticator>, AuthError> {
    use crate::config::AuthMethod;

    match config.method {
        AuthMethod::None => Ok(Box::new(NoneAuthenticator::new())),
        AuthMethod::TrustedHeader => {
            let header = config
                .user_header
                .clone()
                .unwrap_or_else(|| TrustedHeaderAuthenticator::DEFAULT_HEADER.to_string());
            Ok(Box::new(TrustedHeaderAuthenticator::new(header)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthMethod;

    #[test]
    fn test_create_authenticator_none() {
        let config = AuthConfig {
            method: AuthMethod::None,
            user_header: None,
        };
        let auth = create_authenticator(&config).unwrap();
        assert_eq!(auth.method_name(), "none");
    }

    #[test]
    fn test_create_authenticator_trusted_header() {
        let config = AuthConfig {
            method: AuthMethod::TrustedHeader,
            user_header: None,
        };
        let auth = create_authenticator(&config).unwrap();
        assert_eq!(auth.method_name(), "trusted_header");
    }

    #[test]
    fn test_create_authenticator_custom_header() {
        let config = AuthConfig {
            method: AuthMethod::TrustedHeader,
            user_header: Some("x-forwarded-user".to_string()),
        };
        let auth = create_authenticator(&config);
        assert!(auth.is_ok());
    }
}
