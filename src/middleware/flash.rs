use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

pub const FLASH_COOKIE: &str = "fxdash_flash";

/// One-shot message shown on the next rendered page, then cleared.
/// Categories mirror the usual alert styling: "success" and "danger".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

impl Flash {
    pub fn success(message: &str) -> Self {
        Self {
            category: "success".to_string(),
            message: message.to_string(),
        }
    }

    pub fn danger(message: &str) -> Self {
        Self {
            category: "danger".to_string(),
            message: message.to_string(),
        }
    }
}

pub fn set_flash(jar: PrivateCookieJar, flash: &Flash) -> PrivateCookieJar {
    match serde_json::to_string(flash) {
        Ok(value) => jar.add(build_cookie(value)),
        Err(_) => jar,
    }
}

/// Read and clear the pending flash message, if any.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Flash>) {
    let flash = jar
        .get(FLASH_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok());
    let jar = jar.remove(clear_cookie());
    (jar, flash)
}

fn build_cookie(value: String) -> Cookie<'static> {
    Cookie::build(Cookie::new(FLASH_COOKIE.to_string(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(15))
        .build()
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(FLASH_COOKIE.to_string(), String::new()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
