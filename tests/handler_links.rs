mod common;

use axum::Router;
use axum::http::StatusCode;
use axum_test::TestServer;
use dwarf::api::routes::api_routes;
use dwarf::domain::repositories::LinkRepository;
use dwarf::state::AppState;
use dwarf::utils::code_generator::generate_code;
use serde_json::{Value, json};

fn api_server(state: AppState) -> TestServer {
    let app = Router::new().nest("/api", api_routes()).with_state(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_index_returns_all_links() {
    let (state, repo) = common::create_test_state();
    common::create_test_link(&repo, "DWARF001", "https://dwarf.io/one").await;
    common::create_test_link(&repo, "DWARF002", "https://dwarf.io/two").await;
    common::create_test_link(&repo, "DWARF003", "https://dwarf.io/three").await;
    let server = api_server(state);

    let response = server.get("/api/urls").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["code"], "DWARF001");
    assert_eq!(data[2]["url"], "https://dwarf.io/three");
}

#[tokio::test]
async fn test_index_paginates() {
    let (state, repo) = common::create_test_state();
    for i in 1..=5 {
        common::create_test_link(&repo, &format!("DWARF00{i}"), &format!("https://dwarf.io/{i}"))
            .await;
    }
    let server = api_server(state);

    let response = server.get("/api/urls?page=2&page_size=2").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    let codes: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|link| link["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["DWARF003", "DWARF004"]);
}

#[tokio::test]
async fn test_index_rejects_page_zero() {
    let (state, _repo) = common::create_test_state();
    let server = api_server(state);

    let response = server.get("/api/urls?page=0").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_show_by_id() {
    let (state, repo) = common::create_test_state();
    let link = common::create_test_link(&repo, "DWARF001", "https://dwarf.io/one").await;
    let server = api_server(state);

    let response = server.get(&format!("/api/urls/{}", link.id)).await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["data"]["id"], link.id);
    assert_eq!(json["data"]["code"], "DWARF001");
    assert_eq!(json["data"]["short_url"], "http://localhost:3000/DWARF001");
    assert!(json["data"].get("created_at").is_some());
    assert!(json["data"].get("updated_at").is_some());
}

#[tokio::test]
async fn test_show_missing_id_is_not_found() {
    let (state, _repo) = common::create_test_state();
    let server = api_server(state);

    let response = server.get("/api/urls/999").await;

    response.assert_status_not_found();
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["message"], "URL not found");
}

#[tokio::test]
async fn test_show_by_code() {
    let (state, repo) = common::create_test_state();
    common::create_test_link(&repo, "DWARF001", "https://dwarf.io/one").await;
    let server = api_server(state);

    let response = server.get("/api/urls/code/DWARF001").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["data"]["url"], "https://dwarf.io/one");
}

#[tokio::test]
async fn test_show_by_code_is_case_sensitive() {
    let (state, repo) = common::create_test_state();
    common::create_test_link(&repo, "DWARF001", "https://dwarf.io/one").await;
    let server = api_server(state);

    let response = server.get("/api/urls/code/dwarf001").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_show_by_unknown_code_is_not_found() {
    let (state, _repo) = common::create_test_state();
    let server = api_server(state);

    let response = server.get("/api/urls/code/NOT_FOUND").await;

    response.assert_status_not_found();
    let json = response.json::<Value>();
    assert_eq!(json["error"]["message"], "URL not found");
}

#[tokio::test]
async fn test_store_creates_link() {
    let (state, repo) = common::create_test_state();
    let server = api_server(state);

    let response = server
        .post("/api/urls")
        .json(&json!({ "url": "https://dwarf.io/test-url" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<Value>();
    let code = json["data"]["code"].as_str().unwrap();
    assert!(!code.is_empty() && code.len() <= 8);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(json["data"]["url"], "https://dwarf.io/test-url");
    assert_eq!(
        json["data"]["short_url"],
        format!("http://localhost:3000/{code}")
    );
    assert!(repo.find_by_code(code).await.unwrap().is_some());
}

#[tokio::test]
async fn test_store_same_url_twice_returns_same_link() {
    let (state, repo) = common::create_test_state();
    let server = api_server(state);
    let body = json!({ "url": "https://dwarf.io/test-url" });

    let first = server.post("/api/urls").json(&body).await.json::<Value>();
    let second = server.post("/api/urls").json(&body).await.json::<Value>();

    assert_eq!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(first["data"]["code"], second["data"]["code"]);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_store_different_urls_get_different_codes() {
    let (state, _repo) = common::create_test_state();
    let server = api_server(state);

    let first = server
        .post("/api/urls")
        .json(&json!({ "url": "https://dwarf.io/first" }))
        .await
        .json::<Value>();
    let second = server
        .post("/api/urls")
        .json(&json!({ "url": "https://dwarf.io/second" }))
        .await
        .json::<Value>();

    assert_ne!(first["data"]["code"], second["data"]["code"]);
}

#[tokio::test]
async fn test_store_rejects_invalid_url() {
    let (state, repo) = common::create_test_state();
    let server = api_server(state);

    let response = server
        .post("/api/urls")
        .json(&json!({ "url": "invalid-url" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_store_rejects_unsupported_scheme() {
    let (state, _repo) = common::create_test_state();
    let server = api_server(state);

    let response = server
        .post("/api/urls")
        .json(&json!({ "url": "ftp://dwarf.io/file.txt" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_destroy_removes_link() {
    let (state, repo) = common::create_test_state();
    let link = common::create_test_link(&repo, "DWARF001", "https://dwarf.io/one").await;
    let server = api_server(state);

    let response = server.delete(&format!("/api/urls/{}", link.id)).await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(repo.find_by_code("DWARF001").await.unwrap().is_none());

    let response = server.delete(&format!("/api/urls/{}", link.id)).await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_store_after_blocker_deleted_returns_existing_code() {
    let (state, repo) = common::create_test_state();
    let url = "https://dwarf.io/test-url";
    let blocker = common::create_test_link(
        &repo,
        &generate_code(url).code,
        "https://dwarf.io/blocker",
    )
    .await;
    let server = api_server(state);

    let first = server
        .post("/api/urls")
        .json(&json!({ "url": url }))
        .await
        .json::<Value>();

    server
        .delete(&format!("/api/urls/{}", blocker.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let second = server
        .post("/api/urls")
        .json(&json!({ "url": url }))
        .await
        .json::<Value>();

    assert_ne!(first["data"]["code"], generate_code(url).code);
    assert_eq!(first["data"]["code"], second["data"]["code"]);
    assert_eq!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(repo.count().await.unwrap(), 1);
}
