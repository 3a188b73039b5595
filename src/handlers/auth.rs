use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::info;

use crate::error::DashError;
use crate::middleware::auth::{SessionUser, clear_session_cookie, session_cookie};
use crate::middleware::flash::{Flash, set_flash, take_flash};
use crate::router::DashState;
use crate::service::password;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// GET / -> the landing page is the login form.
pub async fn home() -> Redirect {
    Redirect::to("/login")
}

pub async fn register_page(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);
    (jar, Html(views::register_page(flash.as_ref())))
}

pub async fn register_submit(
    State(state): State<DashState>,
    jar: PrivateCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, DashError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        let jar = set_flash(jar, &Flash::danger("Username and password are required."));
        return Ok((jar, Redirect::to("/register")));
    }

    let password_hash = password::hash_password(&form.password)?;
    match state.storage.create_user(username, &password_hash).await {
        Ok(user_id) => {
            info!(user_id, username, "registered new user");
            let jar = set_flash(jar, &Flash::success("Registration successful!"));
            Ok((jar, Redirect::to("/login")))
        }
        Err(DashError::DuplicateUsername) => {
            let jar = set_flash(jar, &Flash::danger("That username is already taken."));
            Ok((jar, Redirect::to("/register")))
        }
        Err(e) => Err(e),
    }
}

pub async fn login_page(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);
    (jar, Html(views::login_page(flash.as_ref())))
}

pub async fn login_submit(
    State(state): State<DashState>,
    jar: PrivateCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, DashError> {
    let user = state.storage.find_user(form.username.trim()).await?;

    if let Some(user) = user
        && password::verify_password(&form.password, &user.password_hash).is_ok()
    {
        let claims = SessionUser {
            user_id: user.id,
            username: user.username,
        };
        let jar = jar.add(session_cookie(serde_json::to_string(&claims)?));
        let jar = set_flash(jar, &Flash::success("Login successful!"));
        info!(user_id = claims.user_id, "user logged in");
        return Ok((jar, Redirect::to("/dashboard")));
    }

    // one message for unknown user and wrong password alike
    let jar = set_flash(
        jar,
        &Flash::danger("Login failed. Check your username and/or password."),
    );
    Ok((jar, Redirect::to("/login")))
}

/// GET /logout. Idempotent: clearing an absent session is fine.
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    let jar = jar.remove(clear_session_cookie());
    let jar = set_flash(jar, &Flash::success("You have been logged out."));
    (jar, Redirect::to("/login"))
}
