//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{CreateUrlRequest, DataResponse, LinkResponse};
use crate::api::dto::pagination::PaginationParams;
use crate::domain::entities::ShortLink;
use crate::error::AppError;
use crate::state::AppState;

fn to_response(state: &AppState, link: ShortLink) -> LinkResponse {
    let short_url = state.link_service.short_url(&link.code);
    LinkResponse::new(link, short_url)
}

fn url_not_found(details: serde_json::Value) -> AppError {
    AppError::not_found("URL not found", details)
}

/// Lists stored links ordered by id.
///
/// # Endpoint
///
/// `GET /api/urls?page=1&page_size=25`
///
/// Without query parameters every link is returned.
///
/// # Errors
///
/// Returns 400 Bad Request for invalid pagination parameters.
pub async fn link_list_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<DataResponse<Vec<LinkResponse>>>, AppError> {
    let page = params.to_page()?;

    let links = state.link_service.list_links(page).await?;
    let items = links
        .into_iter()
        .map(|link| to_response(&state, link))
        .collect();

    Ok(Json(DataResponse::new(items)))
}

/// Shortens and stores a URL.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// Shortening an already stored URL returns the existing link.
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is missing or malformed.
/// Returns 503 Service Unavailable if no free code could be found.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<DataResponse<LinkResponse>>), AppError> {
    payload.validate()?;

    let link = state.link_service.create_short_link(payload.url).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(to_response(&state, link))),
    ))
}

/// Fetches a link by id.
///
/// # Endpoint
///
/// `GET /api/urls/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if no link has this id.
pub async fn link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<DataResponse<LinkResponse>>, AppError> {
    let link = state
        .link_service
        .get_by_id(id)
        .await?
        .ok_or_else(|| url_not_found(json!({ "id": id })))?;

    Ok(Json(DataResponse::new(to_response(&state, link))))
}

/// Fetches a link by its exact, case-sensitive code.
///
/// # Endpoint
///
/// `GET /api/urls/code/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or malformed.
pub async fn link_by_code_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DataResponse<LinkResponse>>, AppError> {
    let link = state
        .link_service
        .get_by_code(&code)
        .await?
        .ok_or_else(|| url_not_found(json!({ "code": code })))?;

    Ok(Json(DataResponse::new(to_response(&state, link))))
}

/// Deletes a link by id.
///
/// # Endpoint
///
/// `DELETE /api/urls/{id}`
///
/// # Cache
///
/// The cache entry for the link's code is invalidated so redirects stop
/// immediately instead of after TTL expiry.
///
/// # Errors
///
/// Returns 404 Not Found if no link has this id.
pub async fn delete_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state
        .link_service
        .delete_link_and_evict(id, state.cache.as_ref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
