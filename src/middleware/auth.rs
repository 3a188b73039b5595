use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::router::DashState;

pub const SESSION_COOKIE: &str = "fxdash_session";
const SESSION_MAX_AGE_HOURS: i64 = 12;

/// Authenticated identity for the current request, decoded from the
/// encrypted session cookie. Protected handlers take this as an extractor
/// argument; anonymous requests are redirected to the login page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
}

impl FromRequestParts<DashState> for SessionUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &DashState,
    ) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(e) => match e {},
        };
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Err(Redirect::to("/login"));
        };
        // the jar already rejected cookies that fail decryption; a decode
        // failure here means a stale payload shape, treated as logged out
        serde_json::from_str(cookie.value()).map_err(|_| Redirect::to("/login"))
    }
}

pub fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE.to_string(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(SESSION_MAX_AGE_HOURS))
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE.to_string(), String::new()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
