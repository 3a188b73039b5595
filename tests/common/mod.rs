#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use tower::ServiceExt;
use url::Url;

use fxdash::config::Config;
use fxdash::db::Storage;
use fxdash::{DashState, dash_router};

/// Build a router backed by a fresh temp-file database. Both upstream API
/// bases point at an unroutable local port so every fetch fails fast and the
/// silent-degradation paths are exercised.
pub async fn spawn_app(covid_enabled: bool) -> (Router, PathBuf) {
    let unroutable = Url::parse("http://127.0.0.1:9/").expect("test url");
    spawn_app_with_rates(covid_enabled, unroutable).await
}

/// Like `spawn_app`, but with the rates API pointed at a live stub server.
pub async fn spawn_app_with_rates(covid_enabled: bool, rates_base: Url) -> (Router, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "fxdash-test-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let mut cfg = Config::default();
    cfg.database_url = format!("sqlite:{}", temp_path.display());
    cfg.rates_api_base = rates_base;
    cfg.covid_api_base = Url::parse("http://127.0.0.1:9/").expect("test url");
    cfg.http_timeout_secs = 2;
    cfg.covid_enabled = covid_enabled;

    let storage = Storage::connect(&cfg.database_url)
        .await
        .expect("test storage");
    let state = DashState::new(storage, cfg).expect("test state");
    (dash_router(state), temp_path)
}

pub fn cleanup(temp_path: &Path) {
    let _ = std::fs::remove_file(temp_path);
    for suffix in ["-wal", "-shm"] {
        let mut side = temp_path.as_os_str().to_owned();
        side.push(suffix);
        let _ = std::fs::remove_file(PathBuf::from(side));
    }
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("failed to build request")
}

pub fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("response should carry a Location header")
}

/// The `name=value` pair of the session cookie set by a login response.
pub fn session_cookie_from(resp: &Response) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("fxdash_session="))
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

/// Every cookie a response sets, joined for replay in a Cookie header.
pub fn all_cookies_from(resp: &Response) -> String {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Register a user and log in, returning the session cookie to replay.
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let body = format!("username={username}&password={password}");

    let resp = app
        .clone()
        .oneshot(form_request("/register", &body, None))
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = app
        .clone()
        .oneshot(form_request("/login", &body, None))
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    session_cookie_from(&resp).expect("login response should set a session cookie")
}

pub async fn body_string(resp: Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body was not utf-8")
}
