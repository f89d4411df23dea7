//! Outfit repository for database operations

use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow, types::Json};
use tracing::info;

use crate::models::{ClothingItem, NewOutfit, Outfit, OutfitSummary};

const SUMMARY_COLUMNS: &str = r#"
    o.id, o.title, o.items, o.style, o.user_id, o.created_at,
    u.username AS creator,
    (SELECT COUNT(*) FROM likes l WHERE l.outfit_id = o.id) AS like_count
"#;

fn outfit_from_row(row: &SqliteRow) -> Result<Outfit> {
    let items: Json<Vec<ClothingItem>> = row.try_get("items")?;

    Ok(Outfit {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        items: items.0,
        style: row.try_get("style")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn summary_from_row(row: &SqliteRow) -> Result<OutfitSummary> {
    Ok(OutfitSummary {
        outfit: outfit_from_row(row)?,
        creator: row.try_get("creator")?,
        like_count: row.try_get("like_count")?,
    })
}

/// Outfit repository
#[derive(Clone)]
pub struct OutfitRepository {
    pool: SqlitePool,
}

impl OutfitRepository {
    /// Create a new outfit repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new outfit
    pub async fn create(&self, new_outfit: &NewOutfit) -> Result<Outfit> {
        info!(
            "Creating outfit '{}' for user {} with {} items",
            new_outfit.title,
            new_outfit.user_id,
            new_outfit.items.len()
        );

        let row = sqlx::query(
            r#"
            INSERT INTO outfits (title, items, style, user_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, items, style, user_id, created_at
            "#,
        )
        .bind(&new_outfit.title)
        .bind(Json(&new_outfit.items))
        .bind(&new_outfit.style)
        .bind(new_outfit.user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        outfit_from_row(&row)
    }

    /// Find an outfit by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Outfit>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, items, style, user_id, created_at
            FROM outfits
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(outfit_from_row).transpose()
    }

    /// Find an outfit with its creator and like count
    pub async fn find_summary_by_id(&self, id: i64) -> Result<Option<OutfitSummary>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM outfits o JOIN users u ON u.id = o.user_id WHERE o.id = ?"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(summary_from_row).transpose()
    }

    /// All outfits of a user in creation order
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Outfit>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, items, style, user_id, created_at
            FROM outfits
            WHERE user_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(outfit_from_row).collect()
    }

    /// All outfits, newest first
    pub async fn list_recent(&self) -> Result<Vec<OutfitSummary>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM outfits o JOIN users u ON u.id = o.user_id \
             ORDER BY o.created_at DESC, o.id DESC"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(summary_from_row).collect()
    }

    /// Outfits of one user, newest first
    pub async fn list_recent_by_user(&self, user_id: i64) -> Result<Vec<OutfitSummary>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM outfits o JOIN users u ON u.id = o.user_id \
             WHERE o.user_id = ? ORDER BY o.created_at DESC, o.id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(summary_from_row).collect()
    }

    /// Outfits created by anyone but the given user
    pub async fn list_excluding_user(&self, user_id: i64) -> Result<Vec<OutfitSummary>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM outfits o JOIN users u ON u.id = o.user_id \
             WHERE o.user_id != ? ORDER BY o.id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(summary_from_row).collect()
    }

    /// The most liked outfits; outfits without likes are not listed
    pub async fn trending(&self, limit: i64) -> Result<Vec<OutfitSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, o.title, o.items, o.style, o.user_id, o.created_at,
                   u.username AS creator,
                   COUNT(l.id) AS like_count
            FROM outfits o
            JOIN likes l ON l.outfit_id = o.id
            JOIN users u ON u.id = o.user_id
            GROUP BY o.id
            ORDER BY like_count DESC, o.id ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(summary_from_row).collect()
    }
}
