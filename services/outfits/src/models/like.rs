//! Like model and related functionality

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Like entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub outfit_id: i64,
}

/// Result of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStatus {
    /// Number of likes the outfit has after the toggle
    pub likes: i64,
    /// Whether the current user now likes the outfit
    pub liked: bool,
}
