//! Outfit builder routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{error::AppError, middleware::require_login, state::AppState};

pub mod auth;
pub mod outfits;
pub mod pages;

/// Create the router for the outfit builder
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/", get(pages::home))
        .route("/create_outfit", get(outfits::create_outfit))
        .route("/create_outfit/:item_type", get(outfits::create_outfit))
        .route("/submit", post(outfits::submit))
        .route("/like/:id", post(outfits::like_outfit))
        .route("/explore", get(pages::explore))
        .route("/profile/:username", get(pages::profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_login,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/outfit/:id", get(outfits::outfit_detail))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let database = common::database::health_check(&state.db_pool).await?;
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    Ok((
        status,
        Json(serde_json::json!({
            "status": if database { "ok" } else { "degraded" },
            "service": "outfits",
            "database": database,
        })),
    ))
}
