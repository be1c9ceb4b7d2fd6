//! HTTP-surface tests that exercise the router, the auth boundary and
//! the response/error envelopes without a live database: the pool is
//! lazy and every request here is rejected (or served) before a query
//! would run.
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use vidtube_api::config::{
    Config, CorsConfig, DatabaseConfig, JwtConfig, ServerConfig, StorageConfig,
};
use vidtube_api::db::Database;
use vidtube_api::error::Result;
use vidtube_api::media::{MediaKind, MediaStore, UploadedMedia};
use vidtube_api::{app, AppState};

struct NullMediaStore;

#[async_trait]
impl MediaStore for NullMediaStore {
    async fn upload(&self, _local_path: &Path, _kind: MediaKind) -> Result<UploadedMedia> {
        Err(vidtube_api::error::AppError::Internal(anyhow::anyhow!(
            "media store disabled in tests"
        )))
    }

    async fn delete(&self, _url: &str, _kind: MediaKind) -> Result<()> {
        Ok(())
    }
}

fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            body_limit: 15 * 1024,
            upload_limit: 1024 * 1024,
            public_dir: "public".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://localhost/vidtube_test".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 1,
        },
        cors: CorsConfig {
            origin: "http://localhost:3000".to_string(),
        },
        jwt: JwtConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_expiry_minutes: 60,
            refresh_expiry_days: 10,
        },
        storage: StorageConfig {
            bucket: "test".to_string(),
            region: "us-east-1".to_string(),
            public_base_url: "https://test.example.com".to_string(),
            endpoint: None,
            upload_timeout_secs: 5,
        },
    }
}

fn test_app() -> axum::Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database.url)
        .expect("lazy pool should build without connecting");

    let state = AppState {
        db: Database { pg: pool },
        config,
        media: Arc::new(NullMediaStore),
    };

    app(state).expect("router should build")
}

#[tokio::test]
async fn healthcheck_returns_success_envelope() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/healthcheck")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "OK");
}

#[tokio::test]
async fn register_accepts_bodies_larger_than_the_json_cap() {
    let app = test_app();

    // An avatar well past the 15KB default body cap. The multipart
    // routes raise the limit, so parsing succeeds and the request fails
    // on the missing text fields instead.
    let boundary = "register-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"avatar\"; filename=\"a.png\"\r\n\
          Content-Type: image/png\r\n\r\n",
    );
    body.extend_from_slice(&vec![0u8; 60 * 1024]);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/users/register")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["message"], "username is required");
}

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/users/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["statusCode"], 401);
    assert_eq!(json["success"], false);
    assert!(json["errors"].as_array().is_some());
}

#[tokio::test]
async fn garbage_bearer_token_is_unauthorized() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/likes/videos")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_without_token_is_unauthorized() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/users/refresh-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_preflight_reflects_configured_origin() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/v1/healthcheck")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let allow_origin = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok());
    assert_eq!(allow_origin, Some("http://localhost:3000"));

    let allow_credentials = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
        .and_then(|v| v.to_str().ok());
    assert_eq!(allow_credentials, Some("true"));
}
