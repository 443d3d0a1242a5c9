//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::CacheService;

/// Application state shared across all handlers.
///
/// Cloned per request by axum; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub cache: Arc<dyn CacheService>,
    /// `max-age` advertised on redirect responses, in seconds.
    pub redirect_max_age: u64,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService<dyn LinkRepository>>,
        cache: Arc<dyn CacheService>,
        redirect_max_age: u64,
    ) -> Self {
        Self {
            link_service,
            cache,
            redirect_max_age,
        }
    }
}
