//! Fixtures shared by unit tests

use chrono::Utc;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

use crate::models::{ClothingItem, NewUser, Outfit};

/// Migrated in-memory database
///
/// A single connection keeps every query on the same in-memory database.
pub async fn memory_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    common::database::run_migrations(&pool).await?;
    Ok(pool)
}

pub fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "wardrobe99".to_string(),
    }
}

pub fn item(srno: i64, style: &str, item_type: &str) -> ClothingItem {
    ClothingItem {
        srno,
        file_path: format!("images/{srno}.jpg"),
        style: style.to_string(),
        item_type: item_type.to_string(),
    }
}

pub fn outfit(id: i64, style: &str, items: Vec<ClothingItem>) -> Outfit {
    Outfit {
        id,
        title: format!("Outfit {id}"),
        items,
        style: style.to_string(),
        user_id: 1,
        created_at: Utc::now(),
    }
}
