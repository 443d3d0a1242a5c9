//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache of short code to original URL mappings.
///
/// Links are immutable once stored, so an entry only goes stale when its link is
/// deleted; callers invalidate on delete. Cache failures must never fail a
/// request: the redirect path falls back to the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the original URL for a code.
    ///
    /// Returns `Ok(None)` on a miss.
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping; `ttl_seconds = None` uses the implementation default.
    async fn set_url(&self, code: &str, url: &str, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes a mapping.
    async fn invalidate(&self, code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;

    /// Human-readable backend name for health reports.
    fn backend(&self) -> &'static str;
}
