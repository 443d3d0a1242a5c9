//! Repository trait for short link storage.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// A window into the link listing, ordered by ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

/// Storage interface for short links.
///
/// The store owns identity and timestamps and is the final authority on code
/// uniqueness: implementations must reject a second URL for an existing code.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - process-local
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Returns true if `code` is stored for a URL other than `exclude_url`.
    ///
    /// A code stored for `exclude_url` itself does not count, which is what makes
    /// re-shortening a URL idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn exists(&self, code: &str, exclude_url: &str) -> Result<bool, AppError>;

    /// Finds a link by its exact, case-sensitive code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds the link stored for exactly `url`, the oldest one if several exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_url(&self, url: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError>;

    /// Stores a new link.
    ///
    /// If the same `(url, code)` pair is already stored, the existing link is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is held by a different URL.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Lists links ordered by id, optionally restricted to a page.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(&self, page: Option<Page>) -> Result<Vec<ShortLink>, AppError>;

    /// Counts stored links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Deletes a link by id, returning it if it existed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete(&self, id: i64) -> Result<Option<ShortLink>, AppError>;
}
