//! Link shortening, lookup and deletion service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::collision::{Resolution, resolve_collision};
use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::{LinkRepository, Page};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{generate_code, is_well_formed_code};
use crate::utils::url_validator::validate_url;

/// Default cap on collision resolution attempts per URL.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;

/// Service for creating and resolving short links.
///
/// Codes are derived deterministically from the URL, so shortening the same URL
/// twice yields the same code. The repository enforces code uniqueness; an insert
/// that loses a race to a different URL resumes collision resolution from the
/// next attempt.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    base_url: String,
    max_attempts: u32,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    ///
    /// # Arguments
    ///
    /// - `link_repository` - backing store
    /// - `base_url` - public origin used to build short URLs
    /// - `max_attempts` - collision resolution budget per URL
    pub fn new(link_repository: Arc<L>, base_url: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            link_repository,
            base_url: base_url.into(),
            max_attempts,
        }
    }

    /// Decides the code for `url` without storing anything.
    ///
    /// Returns the URL's existing code if it is already stored, otherwise the
    /// first candidate not held by another URL. Accepts any string.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ExhaustedRetries`] if every attempt collided.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn shorten(&self, url: &str) -> Result<String, AppError> {
        if let Some(existing) = self.link_repository.find_by_url(url).await? {
            return Ok(existing.code);
        }

        let resolution = self.resolve_from(url, 0).await?;
        Ok(resolution.code)
    }

    /// Shortens and stores `url`, returning the stored link.
    ///
    /// Idempotent: an already shortened URL returns its existing link, even when
    /// the link that pushed it off its first candidate has since been deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is malformed.
    /// Returns [`AppError::ExhaustedRetries`] if no free code was found.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn create_short_link(&self, url: String) -> Result<ShortLink, AppError> {
        validate_url(&url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(existing) = self.link_repository.find_by_url(&url).await? {
            debug!(id = existing.id, code = %existing.code, "URL already shortened");
            return Ok(existing);
        }

        let mut start_attempt = 0;

        loop {
            let Resolution { code, attempt } = self.resolve_from(&url, start_attempt).await?;

            let new_link = NewShortLink {
                url: url.clone(),
                code,
            };

            match self.link_repository.insert(new_link).await {
                Ok(link) => {
                    info!(id = link.id, code = %link.code, attempt, "Short link stored");
                    metrics::counter!("dwarf_links_shortened_total").increment(1);
                    return Ok(link);
                }
                Err(AppError::Conflict { details, .. }) => {
                    warn!(attempt, ?details, "Code taken concurrently, resuming resolution");
                    metrics::counter!("dwarf_insert_conflicts_total").increment(1);
                    start_attempt = attempt + 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Retrieves a link by its exact code.
    ///
    /// Codes that the generator could never produce are reported as absent
    /// without querying the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        if !is_well_formed_code(code) {
            return Ok(None);
        }

        self.link_repository.find_by_code(code).await
    }

    /// Resolves a code to its original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve_url(&self, code: &str) -> Result<Option<String>, AppError> {
        Ok(self.get_by_code(code).await?.map(|link| link.url))
    }

    /// Retrieves a link by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        self.link_repository.find_by_id(id).await
    }

    /// Lists stored links, all of them when `page` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_links(&self, page: Option<Page>) -> Result<Vec<ShortLink>, AppError> {
        self.link_repository.list(page).await
    }

    /// Counts stored links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.link_repository.count().await
    }

    /// Deletes a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn delete_link(&self, id: i64) -> Result<ShortLink, AppError> {
        let link = self
            .link_repository
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "id": id })))?;

        info!(id, code = %link.code, "Short link deleted");
        Ok(link)
    }

    /// Deletes a link by id and evicts its code from the redirect cache.
    ///
    /// A failed eviction is logged; the link stays deleted and the cached
    /// redirect expires with its TTL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn delete_link_and_evict(
        &self,
        id: i64,
        cache: &dyn CacheService,
    ) -> Result<ShortLink, AppError> {
        let link = self.delete_link(id).await?;

        if let Err(e) = cache.invalidate(&link.code).await {
            warn!(error = ?e, code = %link.code, "Failed to invalidate cache after delete");
        }

        Ok(link)
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }

    async fn resolve_from(&self, url: &str, start_attempt: u32) -> Result<Resolution, AppError> {
        let generated = generate_code(url);
        let repository = &self.link_repository;

        resolve_collision(
            &generated,
            url,
            start_attempt,
            self.max_attempts,
            |code, url| async move { repository.exists(&code, url).await },
        )
        .await
    }
}
