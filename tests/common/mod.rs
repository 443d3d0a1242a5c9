#![allow(dead_code)]

use std::sync::Arc;

use dwarf::application::services::LinkService;
use dwarf::domain::entities::{NewShortLink, ShortLink};
use dwarf::domain::repositories::LinkRepository;
use dwarf::infrastructure::cache::{CacheService, NullCache};
use dwarf::infrastructure::persistence::MemoryLinkRepository;
use dwarf::state::AppState;

pub const BASE_URL: &str = "http://localhost:3000";
pub const REDIRECT_MAX_AGE: u64 = 86_400;

pub fn create_test_state() -> (AppState, Arc<MemoryLinkRepository>) {
    create_test_state_with_cache(Arc::new(NullCache::new()))
}

pub fn create_test_state_with_cache(
    cache: Arc<dyn CacheService>,
) -> (AppState, Arc<MemoryLinkRepository>) {
    let repo = Arc::new(MemoryLinkRepository::new());
    let link_repository: Arc<dyn LinkRepository> = repo.clone();

    let link_service = Arc::new(LinkService::new(link_repository, BASE_URL, 64));
    let state = AppState::new(link_service, cache, REDIRECT_MAX_AGE);

    (state, repo)
}

pub async fn create_test_link(repo: &MemoryLinkRepository, code: &str, url: &str) -> ShortLink {
    repo.insert(NewShortLink {
        url: url.to_string(),
        code: code.to_string(),
    })
    .await
    .unwrap()
}
