//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoints
///
/// `GET /{code}` and `GET /urls/{code}/redirect`
///
/// # Request Flow
///
/// 1. Check cache for the code
/// 2. On cache miss, query the store
/// 3. Asynchronously update cache
/// 4. Return 302 Found with `Cache-Control: public, max-age=...`
///
/// # Cache Strategy
///
/// - **Cache hit**: Immediate redirect
/// - **Cache miss**: Query store, spawn async cache write
/// - **Cache error**: Log and fall back to store
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let url = match state.cache.get_url(&code).await {
        Ok(Some(cached_url)) => {
            debug!("Cache HIT for {}", code);
            cached_url
        }
        Ok(None) => {
            debug!("Cache MISS for {}", code);

            let url = lookup(&state, &code).await?;

            let cache = state.cache.clone();
            let cache_code = code.clone();
            let cache_url = url.clone();
            tokio::spawn(async move {
                if let Err(e) = cache.set_url(&cache_code, &cache_url, None).await {
                    error!("Failed to cache URL: {}", e);
                }
            });

            url
        }
        Err(e) => {
            error!("Cache error: {}", e);
            lookup(&state, &code).await?
        }
    };

    let location = HeaderValue::from_str(&url).map_err(|_| {
        AppError::internal("Stored URL is not a valid header value", json!({ "code": code }))
    })?;
    let cache_control =
        HeaderValue::from_str(&format!("public, max-age={}", state.redirect_max_age)).map_err(
            |_| AppError::internal("Invalid Cache-Control value", json!({})),
        )?;

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, location),
            (header::CACHE_CONTROL, cache_control),
        ],
    )
        .into_response())
}

async fn lookup(state: &AppState, code: &str) -> Result<String, AppError> {
    state
        .link_service
        .resolve_url(code)
        .await?
        .ok_or_else(|| AppError::not_found("URL not found", json!({ "code": code })))
}
