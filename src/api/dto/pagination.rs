//! Pagination query parameters.

use serde::Deserialize;
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::repositories::Page;
use crate::error::AppError;

/// Default number of links per page when only `page` is given.
pub const DEFAULT_PAGE_SIZE: u32 = 25;
/// Largest accepted `page_size`.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
/// Both parameters are optional; without either the full listing is returned.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// Validates the parameters and converts them to a store page.
    ///
    /// Returns `Ok(None)` when neither parameter is present.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 25
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` is 0 or `page_size` is
    /// outside `1..=1000`.
    pub fn to_page(&self) -> Result<Option<Page>, AppError> {
        if self.page.is_none() && self.page_size.is_none() {
            return Ok(None);
        }

        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "page_size": page_size }),
            ));
        }

        Ok(Some(Page {
            offset: i64::from(page - 1) * i64::from(page_size),
            limit: i64::from(page_size),
        }))
    }
}
