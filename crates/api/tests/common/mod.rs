#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use fila_api::config::{ServerConfig, SessionConfig};
use fila_api::notifications::NotificationCenter;
use fila_api::router::build_app_router;
use fila_api::state::AppState;
use fila_client::{Backend, HttpBackend, InMemoryBackend};
use fila_core::seal::AesGcmSealer;

pub const EMAIL: &str = "centro@barbearia.test";
pub const PASSWORD: &str = "navalha-afiada";
pub const PROVIDER_NAME: &str = "Barbearia Centro";
pub const PROVIDER_WHATSAPP: &str = "11977776666";
pub const PUBLIC_URL: &str = "https://fila.barbearia.test";

/// Build a test `ServerConfig` with safe defaults.
///
/// Reports are bucketed in UTC so they line up with the in-memory backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        base_url: "http://backend.invalid".to_string(),
        api_url: "http://backend.invalid".to_string(),
        public_url: PUBLIC_URL.to_string(),
        session: SessionConfig {
            password: "uma-senha-de-sessao-com-mais-de-32-caracteres".to_string(),
            ttl_secs: 3600,
            cookie_secure: false,
        },
        support_link: Some("https://wa.me/5511900000000".to_string()),
        reload_delay_ms: 2000,
        report_utc_offset_minutes: 0,
    }
}

/// A 10 March 2025 afternoon, well inside the UTC day.
pub fn frozen_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap()
}

pub struct TestApp {
    pub router: Router,
    pub backend: Arc<InMemoryBackend>,
    pub notifications: Arc<NotificationCenter>,
}

/// Build the full application router over an [`InMemoryBackend`] with one
/// registered provider and the clock frozen at [`frozen_now`].
///
/// Uses the same router builder as `main.rs`, so tests exercise the whole
/// middleware stack (guard, notices, CORS, request ID, timeout, tracing,
/// panic recovery).
pub async fn build_test_app() -> TestApp {
    let config = test_config();
    let backend = Arc::new(InMemoryBackend::new());
    backend
        .register_provider(PROVIDER_NAME, EMAIL, PASSWORD, PROVIDER_WHATSAPP)
        .await;
    backend.set_now(frozen_now()).await;

    let notifications = Arc::new(NotificationCenter::default());
    let sealer = AesGcmSealer::from_password(&config.session.password).unwrap();

    let state = AppState {
        config: Arc::new(config.clone()),
        backend: backend.clone(),
        sealer: Arc::new(sealer),
        notifications: notifications.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        backend,
        notifications,
    }
}

/// Build the router over an arbitrary backend.
pub fn build_app_with_backend(backend: Arc<dyn Backend>) -> (Router, Arc<NotificationCenter>) {
    let config = test_config();
    let notifications = Arc::new(NotificationCenter::default());
    let sealer = AesGcmSealer::from_password(&config.session.password).unwrap();

    let state = AppState {
        config: Arc::new(config.clone()),
        backend,
        sealer: Arc::new(sealer),
        notifications: notifications.clone(),
    };
    (build_app_router(state, &config), notifications)
}

/// Build the router over an [`HttpBackend`] pointed at a mock server.
pub fn build_http_app(server_uri: &str) -> (Router, Arc<NotificationCenter>) {
    build_app_with_backend(Arc::new(HttpBackend::new(server_uri, server_uri)))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn builder(method: Method, uri: &str, cookie: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match cookie {
        Some(cookie) => builder.header(COOKIE, cookie),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    send(
        app,
        builder(Method::GET, uri, Some(cookie)).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(
        app,
        builder(Method::POST, uri, None)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json_with_cookie(
    app: Router,
    uri: &str,
    cookie: &str,
    body: serde_json::Value,
) -> Response {
    send(
        app,
        builder(Method::POST, uri, Some(cookie))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_empty_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    send(
        app,
        builder(Method::POST, uri, Some(cookie)).body(Body::empty()).unwrap(),
    )
    .await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The `Location` of a redirect.
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
}

/// Every `Set-Cookie` header of the response.
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// The `auth_session=<value>` pair set by the response, ready to send back
/// in a `Cookie` header.
pub fn session_cookie(response: &Response) -> Option<String> {
    set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with("auth_session="))
        .and_then(|c| c.split(';').next().map(str::to_string))
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

/// Sign in as the registered provider and return the session cookie.
pub async fn login(app: Router) -> String {
    let response = post_json(
        app,
        "/login",
        serde_json::json!({ "email": EMAIL, "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response).expect("login must set the session cookie")
}

/// Register a client through the console, optionally adding them to today's queue.
pub async fn create_client(app: Router, cookie: &str, name: &str, whatsapp: &str, add_to_queue: bool) {
    let response = post_json_with_cookie(
        app,
        "/clientes",
        cookie,
        serde_json::json!({
            "name": name,
            "whatsappNumber": whatsapp,
            "confirmNoContact": whatsapp.is_empty(),
            "addToQueue": add_to_queue,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "creating {name}");
}

/// Today's agenda as JSON.
pub async fn agenda(app: Router, cookie: &str) -> serde_json::Value {
    let response = get_with_cookie(app, "/agenda", cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
