//! Outfit model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ClothingItem;

/// Outfit entity
///
/// `style` is derived from `items` when the outfit is created and is never
/// recomputed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outfit {
    pub id: i64,
    pub title: String,
    pub items: Vec<ClothingItem>,
    pub style: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// New outfit creation payload
#[derive(Debug, Clone)]
pub struct NewOutfit {
    pub title: String,
    pub items: Vec<ClothingItem>,
    pub style: String,
    pub user_id: i64,
}

/// Outfit with its creator's name and like count, as listed in views
#[derive(Debug, Clone, Serialize)]
pub struct OutfitSummary {
    #[serde(flatten)]
    pub outfit: Outfit,
    pub creator: String,
    pub like_count: i64,
}
