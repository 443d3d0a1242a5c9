//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortLink;
use crate::utils::url_validator::MAX_URL_LENGTH;

const MAX_URL_CHARS: u64 = MAX_URL_LENGTH as u64;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    #[validate(length(max = MAX_URL_CHARS, message = "URL is too long"))]
    pub url: String,
}

/// JSON representation of a stored link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub url: String,
    pub code: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            id: link.id,
            url: link.url,
            code: link.code,
            short_url,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Envelope wrapping every successful payload in a `data` field.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
