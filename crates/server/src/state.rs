use std::sync::Arc;
use whiskerboard_core::{
    Authenticator, Config, GalleryService, ImageSource, SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    gallery: GalleryService,
    image_source: Option<Arc<dyn ImageSource>>,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        gallery: GalleryService,
        image_source: Option<Arc<dyn ImageSource>>,
    ) -> Self {
        Self {
            config,
            authenticator,
            gallery,
            image_source,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn gallery(&self) -> &GalleryService {
        &self.gallery
    }

    pub fn image_source(&self) -> Option<&Arc<dyn ImageSource>> {
        self.image_source.as_ref()
    }
}
