mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower::ServiceExt;
use url::Url;

use common::{
    all_cookies_from, body_string, cleanup, form_request, get_request, register_and_login,
    session_cookie_from, spawn_app, spawn_app_with_rates,
};

/// Local stand-in for the rates API. The tables endpoint answers with
/// `table_status` (a two-table payload on success); the history endpoint
/// always answers 500, so refreshes never get as far as chart rendering.
async fn spawn_rates_stub(table_status: StatusCode) -> Url {
    let payload = serde_json::json!([
        {
            "table": "A",
            "no": "003/A/NBP/2024",
            "effectiveDate": "2024-01-04",
            "rates": [
                {"currency": "dolar amerykański", "code": "USD", "mid": 4.0},
                {"currency": "euro", "code": "EUR", "mid": 4.5}
            ]
        },
        {
            "table": "B",
            "no": "001/B/NBP/2024",
            "effectiveDate": "2024-01-03",
            "rates": [
                {"currency": "bogus", "code": "XXX", "mid": 9.9}
            ]
        }
    ]);

    let app = Router::new()
        .route(
            "/exchangerates/tables/A",
            get(move || {
                let payload = payload.clone();
                async move {
                    if table_status.is_success() {
                        Json(payload).into_response()
                    } else {
                        table_status.into_response()
                    }
                }
            }),
        )
        .route(
            "/exchangerates/rates/A/{*rest}",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub listener");
    let addr = listener.local_addr().expect("stub listener address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Url::parse(&format!("http://{addr}/")).expect("stub url")
}

#[tokio::test]
async fn currencies_view_starts_empty() {
    let (app, db) = spawn_app(true).await;
    let session = register_and_login(&app, "dave", "hunter2").await;

    let resp = app
        .clone()
        .oneshot(get_request("/dashboard/currencies", Some(&session)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(body.contains("No currency data loaded"));

    cleanup(&db);
}

#[tokio::test]
async fn currencies_refresh_degrades_to_empty_when_upstream_is_down() {
    // the test config points the rates API at an unroutable port: the
    // refresh must still render, with an empty list and no charts
    let (app, db) = spawn_app(true).await;
    let session = register_and_login(&app, "erin", "hunter2").await;

    let resp = app
        .clone()
        .oneshot(form_request("/dashboard/currencies", "", Some(&session)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(body.contains("No currency data loaded"));
    assert!(!body.contains("data:image/png;base64"));

    cleanup(&db);
}

#[tokio::test]
async fn currencies_refresh_renders_the_first_table_sorted_by_rate() {
    let base = spawn_rates_stub(StatusCode::OK).await;
    let (app, db) = spawn_app_with_rates(true, base).await;
    let session = register_and_login(&app, "ivan", "hunter2").await;

    let resp = app
        .clone()
        .oneshot(form_request("/dashboard/currencies", "", Some(&session)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    // only the first table is rendered, highest mid rate first
    let eur = body.find("<h2>EUR").expect("EUR card missing");
    let usd = body.find("<h2>USD").expect("USD card missing");
    assert!(eur < usd);
    assert!(!body.contains("XXX"));
    // the history endpoint answers 500, so no charts are rendered
    assert!(!body.contains("data:image/png;base64"));

    cleanup(&db);
}

#[tokio::test]
async fn currencies_refresh_degrades_when_upstream_returns_an_error_status() {
    let base = spawn_rates_stub(StatusCode::INTERNAL_SERVER_ERROR).await;
    let (app, db) = spawn_app_with_rates(true, base).await;
    let session = register_and_login(&app, "mallory", "hunter2").await;

    let resp = app
        .clone()
        .oneshot(form_request("/dashboard/currencies", "", Some(&session)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(body.contains("No currency data loaded"));

    cleanup(&db);
}

#[tokio::test]
async fn covid_refresh_degrades_to_empty_when_upstream_is_down() {
    let (app, db) = spawn_app(true).await;
    let session = register_and_login(&app, "frank", "hunter2").await;

    let resp = app
        .clone()
        .oneshot(form_request("/dashboard/covid", "", Some(&session)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(body.contains("No COVID-19 records"));

    cleanup(&db);
}

#[tokio::test]
async fn covid_routes_do_not_exist_when_disabled() {
    let (app, db) = spawn_app(false).await;
    let session = register_and_login(&app, "grace", "hunter2").await;

    let resp = app
        .clone()
        .oneshot(get_request("/dashboard/covid", Some(&session)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // the navigation link disappears as well
    let resp = app
        .clone()
        .oneshot(get_request("/dashboard", Some(&session)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(!body.contains(r#"href="/dashboard/covid""#));

    cleanup(&db);
}

#[tokio::test]
async fn login_flash_is_shown_once_on_the_dashboard() {
    let (app, db) = spawn_app(true).await;
    let creds = "username=judy&password=hunter2";

    let resp = app
        .clone()
        .oneshot(form_request("/register", creds, None))
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    // keep every cookie the login sets, the flash included
    let resp = app
        .clone()
        .oneshot(form_request("/login", creds, None))
        .await
        .expect("login request failed");
    let session = session_cookie_from(&resp).expect("login should set a session cookie");
    let cookies = all_cookies_from(&resp);

    let resp = app
        .clone()
        .oneshot(get_request("/dashboard", Some(&cookies)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Login successful!"));

    // the flash was consumed: a later visit with just the session shows none
    let resp = app
        .clone()
        .oneshot(get_request("/dashboard", Some(&session)))
        .await
        .expect("request failed");
    let body = body_string(resp).await;
    assert!(!body.contains("Login successful!"));

    cleanup(&db);
}

#[tokio::test]
async fn dashboard_greets_the_logged_in_user() {
    let (app, db) = spawn_app(true).await;
    let session = register_and_login(&app, "heidi", "hunter2").await;

    let resp = app
        .clone()
        .oneshot(get_request("/dashboard", Some(&session)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(body.contains("heidi"));

    cleanup(&db);
}
