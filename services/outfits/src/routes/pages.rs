//! Home, explore and profile views

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;
use tracing::error;

use crate::{
    error::{AppError, AppResult},
    middleware::CurrentUser,
    models::{Outfit, OutfitSummary, PublicUser},
    state::AppState,
    style::{TrendingItem, overall_style_preference, trending_items},
};

const TRENDING_LIMIT: usize = 10;

/// Outfits sorted by id, the order statistics are tallied in
fn in_creation_order(outfits: &[OutfitSummary]) -> Vec<&Outfit> {
    let mut ordered: Vec<&Outfit> = outfits.iter().map(|s| &s.outfit).collect();
    ordered.sort_by_key(|o| o.id);
    ordered
}

#[derive(Serialize)]
pub struct HomeResponse {
    pub trending_outfits: Vec<OutfitSummary>,
    pub trending_products: Vec<TrendingItem>,
    pub outfits: Vec<OutfitSummary>,
}

#[derive(Serialize)]
pub struct ExploreResponse {
    pub outfits: Vec<OutfitSummary>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub user: PublicUser,
    pub outfits: Vec<OutfitSummary>,
    pub overall_style: Option<String>,
    pub overall_image: Option<String>,
    pub is_own_profile: bool,
}

/// Most liked outfits, most used items and every outfit newest first
pub async fn home(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let trending_outfits = state
        .outfit_repository
        .trending(TRENDING_LIMIT as i64)
        .await
        .map_err(|e| {
            error!("Failed to get trending outfits: {}", e);
            AppError::InternalServerError
        })?;

    let outfits = state.outfit_repository.list_recent().await.map_err(|e| {
        error!("Failed to list outfits: {}", e);
        AppError::InternalServerError
    })?;

    let trending_products = trending_items(in_creation_order(&outfits), TRENDING_LIMIT);

    Ok(Json(HomeResponse {
        trending_outfits,
        trending_products,
        outfits,
    }))
}

/// Outfits of everyone but the current user
pub async fn explore(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<impl IntoResponse> {
    let outfits = state
        .outfit_repository
        .list_excluding_user(user.id)
        .await
        .map_err(|e| {
            error!("Failed to list outfits: {}", e);
            AppError::InternalServerError
        })?;

    Ok(Json(ExploreResponse { outfits }))
}

/// A user, their outfits newest first and their overall style
pub async fn profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_username(&username)
        .await
        .map_err(|e| {
            error!("Failed to get user: {}", e);
            AppError::InternalServerError
        })?
        .ok_or(AppError::NotFound("User"))?;

    let outfits = state
        .outfit_repository
        .list_recent_by_user(user.id)
        .await
        .map_err(|e| {
            error!("Failed to list outfits: {}", e);
            AppError::InternalServerError
        })?;

    let (overall_style, overall_image) = overall_style_preference(in_creation_order(&outfits));

    Ok(Json(ProfileResponse {
        user: PublicUser::from(&user),
        outfits,
        overall_style,
        overall_image,
        is_own_profile: user.id == current.id,
    }))
}
