//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::ShortenerService;
use crate::domain::repositories::{UrlGuardian, UrlRepository};

/// State cloned into every request handler.
///
/// Services are behind `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
    pub guardian: Arc<dyn UrlGuardian>,
    pub url_repository: Arc<dyn UrlRepository>,
}

impl AppState {
    pub fn new(
        shortener: Arc<ShortenerService>,
        guardian: Arc<dyn UrlGuardian>,
        url_repository: Arc<dyn UrlRepository>,
    ) -> Self {
        Self {
            shortener,
            guardian,
            url_repository,
        }
    }
}
