//! End-to-end tests for the bearer gate: the full router, gated ad-hoc
//! routers, and startup from a directive file.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use http_body_util::BodyExt;
use tower::ServiceExt;

use apipass::BearerAuth;
use apipass::app;
use apipass::config::{AppEnv, Config, TokenSource};
use apipass::middleware::bearer_auth;
use apipass::replacer::Replacer;
use apipass::state::AppState;

/// Helper: a provisioned, validated state holding `token`.
fn test_state(token: &str) -> AppState {
    let mut gate = BearerAuth::new(token);
    gate.provision(&Replacer::empty());
    gate.validate().expect("test token must be non-empty");
    AppState::new(Arc::new(gate))
}

/// Helper: the full application router gating `/api/v1`.
fn test_app(token: &str) -> Router {
    app::router(test_state(token))
}

/// Helper: read a response body as a string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: GET /api/v1/content, optionally with an Authorization header.
fn get_content(auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/v1/content");
    if let Some(value) = auth {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

// -- Accept / reject ------------------------------------------------------------

#[tokio::test]
async fn accepts_the_exact_bearer_header() {
    let app = test_app("s3cr3t");
    let response = app
        .oneshot(get_content(Some("Bearer s3cr3t")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Protected content");
}

#[tokio::test]
async fn rejects_a_missing_header() {
    let app = test_app("s3cr3t");
    let response = app.oneshot(get_content(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        r#"Bearer realm="Restricted""#
    );
    assert_eq!(body_string(response).await, "");
}

#[tokio::test]
async fn rejects_a_wrong_token() {
    let app = test_app("s3cr3t");
    let response = app
        .oneshot(get_content(Some("Bearer wrong")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        r#"Bearer realm="Restricted""#
    );
    assert_eq!(body_string(response).await, "");
}

#[tokio::test]
async fn rejects_near_miss_headers() {
    let near_misses = [
        "bearer s3cr3t",
        "BEARER s3cr3t",
        "Basic s3cr3t",
        "s3cr3t",
        "Bearer s3cr3t ",
        "Bearer  s3cr3t",
        "Bearer S3CR3T",
    ];

    for value in near_misses {
        let app = test_app("s3cr3t");
        let response = app.oneshot(get_content(Some(value))).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "header {value:?} must be rejected"
        );
    }
}

#[tokio::test]
async fn rejects_a_non_utf8_header() {
    let app = test_app("s3cr3t");
    let value = header::HeaderValue::from_bytes(b"Bearer s3cr3t\xC0").unwrap();
    let request = Request::builder()
        .uri("/api/v1/content")
        .header(header::AUTHORIZATION, value)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_stays_public() {
    let app = test_app("s3cr3t");
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

// -- Pass-through ----------------------------------------------------------------

#[tokio::test]
async fn response_passes_through_unmodified() {
    async fn teapot() -> impl IntoResponse {
        (StatusCode::IM_A_TEAPOT, [("x-upstream", "1")], "made it")
    }

    let state = test_state("s3cr3t");
    let router = Router::new().route("/thing", get(teapot));
    let app = bearer_auth::apply(router, state.clone()).with_state(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/thing")
                .header(header::AUTHORIZATION, "Bearer s3cr3t")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(response.headers().get("x-upstream").unwrap(), "1");
    assert_eq!(body_string(response).await, "made it");
}

#[tokio::test]
async fn rejected_requests_never_reach_the_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = hits.clone();

    let state = test_state("s3cr3t");
    let router = Router::new().route(
        "/thing",
        get(move || {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                "hit"
            }
        }),
    );
    let app = bearer_auth::apply(router, state.clone()).with_state(state);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/thing").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/thing")
                .header(header::AUTHORIZATION, "Bearer s3cr3t")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

// -- Startup from a directive file -------------------------------------------------

#[tokio::test]
async fn boots_from_a_directive_file() {
    let path = std::env::temp_dir().join(format!("apipass-it-{}.conf", std::process::id()));
    std::fs::write(&path, "apipass {\n    token \"s3cr3t\"\n}\n").unwrap();

    let config = Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        app_env: AppEnv::Development,
        token_source: TokenSource::DirectiveFile(path.clone()),
    };
    let gate = app::build_gate(&config).unwrap();
    std::fs::remove_file(&path).ok();

    let app = app::router(AppState::new(Arc::new(gate)));

    let accepted = app
        .clone()
        .oneshot(get_content(Some("Bearer s3cr3t")))
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::OK);

    let rejected = app.oneshot(get_content(None)).await.unwrap();
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
}
