use std::path::PathBuf;

use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
    Router,
};
use foodgram::{
    api::router,
    config::Config,
    database::connection::lazy_pool,
    state::AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// Nothing here reaches the database, so the pool never connects.
fn app() -> Router {
    let config = Config {
        database_url: "postgres://localhost/foodgram_unreachable".to_owned(),
        port: 0,
        pool_size: 1,
        page_size: 6,
        data_dir: PathBuf::from("data"),
    };
    let pool = lazy_pool(&config.database_url, config.pool_size);

    router(AppState::new(config, pool))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn anonymous_users_cannot_reach_protected_routes() {
    let routes = [
        (Method::POST, "/api/recipes/"),
        (Method::PATCH, "/api/recipes/1/"),
        (Method::DELETE, "/api/recipes/1/"),
        (Method::POST, "/api/recipes/1/favorite/"),
        (Method::DELETE, "/api/recipes/1/favorite/"),
        (Method::POST, "/api/recipes/1/shopping_cart/"),
        (Method::DELETE, "/api/recipes/1/shopping_cart/"),
        (Method::GET, "/api/recipes/download_shopping_cart/"),
        (Method::GET, "/api/users/me/"),
        (Method::GET, "/api/users/subscriptions/"),
        (Method::POST, "/api/users/1/subscribe/"),
        (Method::DELETE, "/api/users/1/subscribe/"),
    ];

    for (method, uri) in routes {
        let (status, body) = send(request(method.clone(), uri)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(
            body,
            json!({ "detail": "Authentication credentials were not provided." }),
            "{method} {uri}"
        );
    }
}

#[tokio::test]
async fn malformed_token_header_is_rejected_on_every_route() {
    let routes = [
        "/api/tags/",
        "/api/tags/1/",
        "/api/ingredients/",
        "/api/ingredients/1/?name=salt",
        "/api/recipes/",
        "/api/recipes/1/",
        "/api/users/",
        "/api/users/1/",
        "/api/users/me/",
    ];

    for uri in routes {
        let request = Request::builder()
            .uri(uri)
            .header(AUTHORIZATION, "Token two parts")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body, json!({ "detail": "Invalid token." }), "{uri}");
    }
}

#[tokio::test]
async fn non_numeric_ids_are_not_found() {
    let (status, body) = send(request(Method::GET, "/api/tags/breakfast/")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Not found." }));
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let (status, _) = send(request(Method::GET, "/api/unknown/")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_methods_are_rejected() {
    let (status, _) = send(request(Method::PUT, "/api/tags/")).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
