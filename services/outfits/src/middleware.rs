//! Session cookie authentication

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, error};
use uuid::Uuid;

use crate::{error::AppError, session::SESSION_COOKIE, state::AppState};

/// The logged-in user, available to handlers behind [`require_login`]
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub session_id: Uuid,
}

/// Resolve the user of the session cookie, if it names a live session
pub async fn current_user(state: &AppState, jar: &CookieJar) -> Result<Option<CurrentUser>, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };

    let claims = match state.session_tokens.validate(cookie.value()) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Rejected session token: {}", e);
            return Ok(None);
        }
    };

    let Ok(user_id) = claims.user_id() else {
        return Ok(None);
    };

    let session = state
        .session_repository
        .find_active(claims.sid)
        .await
        .map_err(|e| {
            error!("Failed to load session: {}", e);
            AppError::InternalServerError
        })?;

    if session.is_none_or(|s| s.user_id != user_id) {
        return Ok(None);
    }

    let user = state
        .user_repository
        .find_by_id(user_id)
        .await
        .map_err(|e| {
            error!("Failed to load session user: {}", e);
            AppError::InternalServerError
        })?;

    Ok(user.map(|user| CurrentUser {
        id: user.id,
        username: user.username,
        session_id: claims.sid,
    }))
}

/// Let logged-in users through and send everyone else to the login page
pub async fn require_login(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match current_user(&state, &jar).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Ok(None) => {
            let target = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            Redirect::to(&login_url(target)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Login page URL that returns to `next` afterwards
pub fn login_url(next: &str) -> String {
    match serde_urlencoded::to_string([("next", next)]) {
        Ok(query) => format!("/login?{}", query),
        Err(_) => "/login".to_string(),
    }
}
