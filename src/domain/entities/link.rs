//! Short link entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored mapping between an original URL and its short code.
///
/// Both `url` and `code` are immutable once stored. The URL is kept exactly as
/// submitted: case, trailing slashes and query order are all significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortLink {
    pub id: i64,
    pub url: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(
        id: i64,
        url: String,
        code: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            url,
            code,
            created_at,
            updated_at,
        }
    }

    /// Returns true if this link stores `url` byte for byte.
    pub fn points_to(&self, url: &str) -> bool {
        self.url == url
    }
}

/// Input data for storing a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortLink {
    pub url: String,
    pub code: String,
}
