//! Outfit building, submission and likes

use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info};

use crate::{
    catalog::{DEFAULT_ITEM_TYPE, parse_selection},
    charts::pie_chart_base64,
    error::AppError,
    middleware::CurrentUser,
    models::{ClothingItem, NewOutfit, Outfit},
    state::AppState,
    style::{most_reflected_style, overall_style_preference, style_distribution, type_distribution},
    validation::validate_outfit_title,
};

/// Query string of the outfit builder
#[derive(Deserialize)]
pub struct CreateOutfitQuery {
    #[serde(rename = "selectedItems")]
    pub selected_items: Option<String>,
}

/// Outfit builder view
#[derive(Serialize)]
pub struct CreateOutfitResponse {
    pub item_type: String,
    pub types: Vec<String>,
    pub items_by_type: BTreeMap<String, Vec<ClothingItem>>,
    pub selected_items: Vec<ClothingItem>,
}

/// Outfit submission form
#[derive(Deserialize)]
pub struct SubmitForm {
    #[serde(rename = "selectedItems")]
    pub selected_items: String,
    #[serde(rename = "outfitTitle")]
    pub outfit_title: String,
}

/// Saved outfit with the statistics of its owner
#[derive(Serialize)]
pub struct SubmitResponse {
    pub outfit: Outfit,
    pub style: String,
    pub selected_items: Vec<ClothingItem>,
    pub curated_fits: Vec<Outfit>,
    pub overall_style: Option<String>,
    pub overall_image: Option<String>,
    pub style_chart: String,
    pub type_chart: String,
}

/// Items of one type, plus the items picked so far
pub async fn create_outfit(
    State(state): State<AppState>,
    item_type: Option<Path<String>>,
    Query(query): Query<CreateOutfitQuery>,
) -> impl IntoResponse {
    let item_type = item_type.map_or_else(|| DEFAULT_ITEM_TYPE.to_string(), |Path(t)| t);

    let mut items_by_type = BTreeMap::new();
    let mut shown_type = item_type.clone();
    if let Some((name, items)) = state.catalog.items_for_type(&item_type) {
        shown_type = name.to_string();
        items_by_type.insert(name.to_string(), items.to_vec());
    }

    let selection = query
        .selected_items
        .as_deref()
        .map(parse_selection)
        .unwrap_or_default();

    Json(CreateOutfitResponse {
        item_type: shown_type,
        types: state.catalog.types().into_iter().map(str::to_string).collect(),
        items_by_type,
        selected_items: state.catalog.select(&selection),
    })
}

/// Save an outfit and report the owner's style statistics
pub async fn submit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<SubmitForm>,
) -> Result<impl IntoResponse, AppError> {
    let title = validate_outfit_title(&form.outfit_title).map_err(AppError::BadRequest)?;

    let selected_items = state.catalog.select(&parse_selection(&form.selected_items));
    let style = most_reflected_style(selected_items.iter().map(|i| i.style.as_str())).ok_or_else(
        || AppError::BadRequest("Select at least one item from the catalog".to_string()),
    )?;

    let outfit = state
        .outfit_repository
        .create(&NewOutfit {
            title: title.to_string(),
            items: selected_items.clone(),
            style: style.clone(),
            user_id: user.id,
        })
        .await
        .map_err(|e| {
            error!("Failed to save outfit: {}", e);
            AppError::InternalServerError
        })?;

    info!(
        "User {} saved outfit {} with style {}",
        user.username, outfit.id, style
    );

    let curated_fits = state
        .outfit_repository
        .list_by_user(user.id)
        .await
        .map_err(|e| {
            error!("Failed to list outfits: {}", e);
            AppError::InternalServerError
        })?;

    let (overall_style, overall_image) = overall_style_preference(&curated_fits);
    let style_chart = pie_chart_base64(&style_distribution(&curated_fits), "Style Distribution");
    let type_chart = pie_chart_base64(&type_distribution(&curated_fits), "Item Type Distribution");

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            outfit,
            style,
            selected_items,
            curated_fits,
            overall_style,
            overall_image,
            style_chart,
            type_chart,
        }),
    ))
}

/// Like an outfit of another user, or take the like back
pub async fn like_outfit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let outfit = state
        .outfit_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get outfit: {}", e);
            AppError::InternalServerError
        })?
        .ok_or(AppError::NotFound("Outfit"))?;

    if outfit.user_id == user.id {
        return Err(AppError::BadRequest(
            "You cannot like your own outfit".to_string(),
        ));
    }

    let status = state
        .like_repository
        .toggle(user.id, outfit.id)
        .await
        .map_err(|e| {
            error!("Failed to toggle like: {}", e);
            AppError::InternalServerError
        })?;

    Ok(Json(status))
}

/// Outfit detail
pub async fn outfit_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let outfit = state
        .outfit_repository
        .find_summary_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get outfit: {}", e);
            AppError::InternalServerError
        })?
        .ok_or(AppError::NotFound("Outfit"))?;

    Ok(Json(outfit))
}
