//! Proxy handler tests against a stub upstream

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use redeployer::server::serve::router;
use redeployer::server::state::{Credentials, ProxyState};

/// What the stub upstream saw
#[derive(Debug, Default)]
struct UpstreamLog {
    hits: usize,
    auth: Option<String>,
    body: Option<Value>,
    query: Option<HashMap<String, String>>,
}

type SharedLog = Arc<Mutex<UpstreamLog>>;

/// Stub platform API for one app, recording every request it serves
fn upstream_router(log: SharedLog) -> Router {
    let create_log = log.clone();
    let list_log = log.clone();
    let detail_log = log;

    Router::new()
        .route(
            "/apps/{app_id}/deployments",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let log = create_log.clone();
                async move {
                    let mut log = log.lock().unwrap();
                    log.hits += 1;
                    log.auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    log.body = Some(body);
                    Json(json!({"deployment": {"id": "new-deploy", "phase": "PENDING_BUILD"}}))
                }
            })
            .get(
                move |Query(params): Query<HashMap<String, String>>| {
                    let log = list_log.clone();
                    async move {
                        let mut log = log.lock().unwrap();
                        log.hits += 1;
                        log.query = Some(params);
                        Json(json!({"deployments": [{"id": "d1", "phase": "BUILDING"}]}))
                    }
                },
            ),
        )
        .route(
            "/apps/{app_id}/deployments/{id}",
            get(move |Path((_app_id, id)): Path<(String, String)>| {
                let log = detail_log.clone();
                async move {
                    let mut log = log.lock().unwrap();
                    log.hits += 1;
                    Json(json!({"deployment": {"id": id, "phase": "ACTIVE"}}))
                }
            }),
        )
}

async fn spawn_upstream(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn credentials() -> Credentials {
    Credentials {
        token: SecretString::from("tok".to_string()),
        app_id: "app123".to_string(),
    }
}

fn proxy_against(upstream_base: &str, credentials: Option<Credentials>) -> Router {
    let state = ProxyState::new(upstream_base, credentials, Duration::from_secs(5)).unwrap();
    router(Arc::new(state))
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn post_forwards_force_build_with_bearer_auth() {
    let log: SharedLog = Arc::default();
    let base = spawn_upstream(upstream_router(log.clone())).await;
    let app = proxy_against(&base, Some(credentials()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/deploy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["deployment"]["id"], "new-deploy");

    let log = log.lock().unwrap();
    assert_eq!(log.hits, 1);
    assert_eq!(log.auth.as_deref(), Some("Bearer tok"));
    assert_eq!(log.body, Some(json!({"force_build": true})));
}

#[tokio::test]
async fn post_mirrors_upstream_rejections() {
    let app = Router::new().route(
        "/apps/{app_id}/deployments",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"id": "unauthorized", "message": "Unable to authenticate you"})),
            )
        }),
    );
    let base = spawn_upstream(app).await;
    let proxy = proxy_against(&base, Some(credentials()));

    let response = proxy
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/deploy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["id"], "unauthorized");
}

#[tokio::test]
async fn get_without_id_asks_for_the_most_recent_deployment() {
    let log: SharedLog = Arc::default();
    let base = spawn_upstream(upstream_router(log.clone())).await;
    let app = proxy_against(&base, Some(credentials()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/deploy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["deployments"][0]["id"], "d1");

    let log = log.lock().unwrap();
    let query = log.query.as_ref().unwrap();
    assert_eq!(query.get("page").map(String::as_str), Some("1"));
    assert_eq!(query.get("per_page").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn get_with_id_asks_for_the_detail() {
    let log: SharedLog = Arc::default();
    let base = spawn_upstream(upstream_router(log.clone())).await;
    let app = proxy_against(&base, Some(credentials()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/deploy?id=d1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["deployment"]["id"], "d1");
    assert_eq!(body["deployment"]["phase"], "ACTIVE");
}

#[tokio::test]
async fn get_passes_upstream_error_bodies_through_with_ok_status() {
    let app = Router::new().route(
        "/apps/{app_id}/deployments/{id}",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"id": "Unauthorized", "message": "Unable to authenticate you"})),
            )
        }),
    );
    let base = spawn_upstream(app).await;
    let proxy = proxy_against(&base, Some(credentials()));

    let response = proxy
        .oneshot(
            Request::builder()
                .uri("/api/deploy?id=d1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // The body, not the status, carries the error so the control can see it
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["id"], "Unauthorized");
}

#[tokio::test]
async fn missing_credentials_short_circuit_before_the_upstream() {
    let log: SharedLog = Arc::default();
    let base = spawn_upstream(upstream_router(log.clone())).await;
    let app = proxy_against(&base, None);

    for request in [
        Request::builder()
            .method("POST")
            .uri("/api/deploy")
            .body(Body::empty())
            .unwrap(),
        Request::builder()
            .uri("/api/deploy")
            .body(Body::empty())
            .unwrap(),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body["message"], "missing required token and appId");
    }

    assert_eq!(log.lock().unwrap().hits, 0);
}

#[tokio::test]
async fn unreachable_upstream_is_a_bad_gateway() {
    // Nothing listens on the discard port
    let app = proxy_against("http://127.0.0.1:9", Some(credentials()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/deploy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn health_and_version_answer() {
    let app = proxy_against("http://127.0.0.1:9", None);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "redeployer");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/version")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["version"].is_string());
}
