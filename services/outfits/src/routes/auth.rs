//! Registration, login and logout

use axum::{
    Form, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::{error, info, warn};

use crate::{
    error::AppError,
    middleware::current_user,
    models::{NewSession, NewUser, UserResponse},
    repositories::is_unique_violation,
    session::SESSION_COOKIE,
    state::AppState,
    validation::{validate_email, validate_password, validate_username},
};

/// Registration form
#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login form
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Query string of the login page
#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Registration page
pub async fn register_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if current_user(&state, &jar).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(Json(serde_json::json!({
        "form": "register",
        "action": "/register",
        "fields": ["username", "email", "password"],
    }))
    .into_response())
}

/// Create an account
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if current_user(&state, &jar).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let username = form.username.trim();
    let email = form.email.trim();
    validate_username(username).map_err(AppError::BadRequest)?;
    validate_email(email).map_err(AppError::BadRequest)?;
    validate_password(&form.password).map_err(AppError::BadRequest)?;

    let existing = state.user_repository.find_by_username(username).await.map_err(|e| {
        error!("Failed to look up username: {}", e);
        AppError::InternalServerError
    })?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Please use a different username.".to_string(),
        ));
    }

    let existing = state.user_repository.find_by_email(email).await.map_err(|e| {
        error!("Failed to look up email: {}", e);
        AppError::InternalServerError
    })?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Please use a different email address.".to_string(),
        ));
    }

    let new_user = NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password: form.password,
    };
    let user = state.user_repository.create(&new_user).await.map_err(|e| {
        if is_unique_violation(&e) {
            return AppError::Conflict("Please use a different username or email address.".to_string());
        }
        error!("Failed to create user: {}", e);
        AppError::InternalServerError
    })?;

    info!("Registered user {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Congratulations, you are now a registered user!",
            "user": UserResponse::from(&user),
            "login_url": "/login",
        })),
    )
        .into_response())
}

/// Login page
pub async fn login_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if current_user(&state, &jar).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(Json(serde_json::json!({
        "form": "login",
        "action": "/login",
        "fields": ["username", "password"],
    }))
    .into_response())
}

/// Check credentials, open a session and redirect to `next`
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if current_user(&state, &jar).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let limiter_key = form.username.trim().to_lowercase();
    if !state.rate_limiter.is_allowed(&limiter_key).await {
        warn!("Login for {} refused by the rate limiter", limiter_key);
        return Err(AppError::TooManyRequests);
    }

    let user = state
        .user_repository
        .find_by_username(form.username.trim())
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            AppError::InternalServerError
        })?;

    let authenticated = match &user {
        Some(user) => state
            .user_repository
            .verify_password(user, &form.password)
            .map_err(|e| {
                error!("Failed to verify password: {}", e);
                AppError::InternalServerError
            })?,
        None => false,
    };

    let Some(user) = user.filter(|_| authenticated) else {
        state.rate_limiter.record_failure(&limiter_key).await;
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    };
    state.rate_limiter.reset(&limiter_key).await;

    if let Err(e) = state.session_repository.delete_expired_for_user(user.id).await {
        warn!("Failed to prune expired sessions: {}", e);
    }

    let expires_at = i64::try_from(state.session_tokens.expiry())
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| {
            error!("Session expiry out of range");
            AppError::InternalServerError
        })?;
    let session = state
        .session_repository
        .create(&NewSession {
            user_id: user.id,
            expires_at,
        })
        .await
        .map_err(|e| {
            error!("Failed to create session: {}", e);
            AppError::InternalServerError
        })?;

    let token = state.session_tokens.issue(user.id, session.id).map_err(|e| {
        error!("Failed to sign session token: {}", e);
        AppError::InternalServerError
    })?;

    info!("User {} logged in", user.username);

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    let target = safe_next(query.next.as_deref());

    Ok((jar.add(cookie), Redirect::to(&target)).into_response())
}

/// Close the session and clear the cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(claims) = state.session_tokens.validate(cookie.value()) {
            match state.session_repository.delete(claims.sid).await {
                Ok(_) => info!("Session {} closed", claims.sid),
                Err(e) => error!("Failed to delete session: {}", e),
            }
        }
    }

    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to("/"),
    )
}

/// Redirect target after login
///
/// Only local paths are followed: anything naming a host, including
/// scheme-relative `//host` forms, falls back to `/`.
pub fn safe_next(next: Option<&str>) -> String {
    static SCHEME_REGEX: OnceLock<Regex> = OnceLock::new();
    let scheme = SCHEME_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").expect("Failed to compile scheme regex")
    });

    let Some(next) = next.map(str::trim).filter(|n| !n.is_empty()) else {
        return "/".to_string();
    };

    let names_host = next.starts_with("//") || next.starts_with("/\\") || next.starts_with('\\');
    if names_host || scheme.is_match(next) {
        return "/".to_string();
    }

    next.to_string()
}
