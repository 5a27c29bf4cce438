pub mod auth;
pub mod cat_api;
pub mod config;
pub mod gallery;
pub mod metrics;
pub mod testing;

pub use auth::{
    create_authenticator, AuthError, AuthRequest, Authenticator, Identity, NoneAuthenticator,
    TrustedHeaderAuthenticator,
};
pub use cat_api::{
    CatApiClient, CatBreed, CatImage, ImageSearchQuery, ImageSource, ImageSourceError,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthConfig, AuthMethod, CatApiConfig,
    Config, ConfigError, DatabaseConfig, SanitizedConfig, ServerConfig,
};
pub use gallery::{
    Cat, CatWithLikes, GalleryError, GalleryService, GalleryStats, GalleryStore, NewCat,
    SqliteGallery, ToggleResult,
};
