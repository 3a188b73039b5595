use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use axum::routing::get;
use axum::Router;
use axum_extra::extract::cookie::Key;
use tracing::warn;

use crate::config::Config;
use crate::db::Storage;
use crate::error::DashError;
use crate::handlers::{auth, dashboard};

/// Explicit application context handed to every request handler:
/// storage handle, outbound HTTP client, configuration, and the key for the
/// private cookie jars. No ambient globals.
#[derive(Clone)]
pub struct DashState {
    pub storage: Storage,
    pub client: reqwest::Client,
    pub cfg: Arc<Config>,
    key: Key,
}

impl DashState {
    pub fn new(storage: Storage, cfg: Config) -> Result<Self, DashError> {
        let key = session_key(cfg.session_secret.as_deref());
        // the original had no outbound timeout; a slow upstream stalled the
        // request indefinitely
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()?;
        Ok(Self {
            storage,
            client,
            cfg: Arc::new(cfg),
            key,
        })
    }
}

impl FromRef<DashState> for Key {
    fn from_ref(state: &DashState) -> Key {
        state.key.clone()
    }
}

fn session_key(secret: Option<&str>) -> Key {
    match secret {
        Some(s) if s.len() >= 64 => Key::from(s.as_bytes()),
        Some(_) => {
            warn!("session secret shorter than 64 bytes; using an ephemeral key");
            Key::generate()
        }
        None => {
            warn!("no session secret configured; sessions will not survive restarts");
            Key::generate()
        }
    }
}

pub fn dash_router(state: DashState) -> Router {
    let mut router = Router::new()
        .route("/", get(auth::home))
        .route(
            "/register",
            get(auth::register_page).post(auth::register_submit),
        )
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(dashboard::dashboard_home))
        .route(
            "/dashboard/currencies",
            get(dashboard::currencies_page).post(dashboard::currencies_refresh),
        );

    if state.cfg.covid_enabled {
        router = router.route(
            "/dashboard/covid",
            get(dashboard::covid_page).post(dashboard::covid_refresh),
        );
    }

    router.with_state(state)
}
