//! In-memory implementation of the link repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::{LinkRepository, Page};
use crate::error::AppError;

/// Process-local link store keyed by code.
///
/// The DashMap entry API makes check-and-insert atomic per code, so it upholds
/// the same uniqueness guarantee as the PostgreSQL constraint. Lookups by id
/// scan the map; this store is meant for development and tests.
#[derive(Debug)]
pub struct MemoryLinkRepository {
    links: DashMap<String, ShortLink>,
    next_id: AtomicI64,
}

impl MemoryLinkRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    fn sorted_links(&self) -> Vec<ShortLink> {
        let mut links: Vec<ShortLink> = self.links.iter().map(|e| e.value().clone()).collect();
        links.sort_by_key(|link| link.id);
        links
    }
}

impl Default for MemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn exists(&self, code: &str, exclude_url: &str) -> Result<bool, AppError> {
        Ok(self
            .links
            .get(code)
            .is_some_and(|link| !link.points_to(exclude_url)))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get(code).map(|link| link.clone()))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self
            .links
            .iter()
            .filter(|entry| entry.points_to(url))
            .min_by_key(|entry| entry.id)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        Ok(self
            .links
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.value().clone()))
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        match self.links.entry(new_link.code.clone()) {
            Entry::Occupied(existing) if existing.get().points_to(&new_link.url) => {
                Ok(existing.get().clone())
            }
            Entry::Occupied(_) => Err(AppError::conflict(
                "Code already taken",
                json!({ "code": new_link.code }),
            )),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let link = ShortLink::new(
                    self.next_id.fetch_add(1, Ordering::Relaxed),
                    new_link.url,
                    new_link.code,
                    now,
                    now,
                );
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn list(&self, page: Option<Page>) -> Result<Vec<ShortLink>, AppError> {
        let links = self.sorted_links();

        Ok(match page {
            Some(page) => links
                .into_iter()
                .skip(page.offset.max(0) as usize)
                .take(page.limit.max(0) as usize)
                .collect(),
            None => links,
        })
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.links.len() as i64)
    }

    async fn delete(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let code = self
            .links
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.key().clone());

        Ok(code.and_then(|code| self.links.remove(&code).map(|(_, link)| link)))
    }
}
