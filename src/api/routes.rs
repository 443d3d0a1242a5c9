//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, link_by_code_handler, link_handler,
    link_list_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Link management routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET    /urls`              - List links (optionally paginated)
/// - `POST   /urls`              - Shorten and store a URL
/// - `GET    /urls/{id}`         - Fetch a link by id
/// - `DELETE /urls/{id}`         - Delete a link
/// - `GET    /urls/code/{code}`  - Fetch a link by its code
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(link_list_handler).post(create_link_handler))
        .route("/urls/{id}", get(link_handler).delete(delete_link_handler))
        .route("/urls/code/{code}", get(link_by_code_handler))
}
