//! Like repository for database operations

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

#[cfg(test)]
use crate::models::Like;
use crate::models::LikeStatus;

/// Like repository
#[derive(Clone)]
pub struct LikeRepository {
    pool: SqlitePool,
}

impl LikeRepository {
    /// Create a new like repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the like of a user on an outfit
    #[cfg(test)]
    pub async fn find(&self, user_id: i64, outfit_id: i64) -> Result<Option<Like>> {
        let like = sqlx::query_as::<_, Like>(
            "SELECT id, user_id, outfit_id FROM likes WHERE user_id = ? AND outfit_id = ?",
        )
        .bind(user_id)
        .bind(outfit_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(like)
    }

    /// Number of likes on an outfit
    #[cfg(test)]
    pub async fn count_for_outfit(&self, outfit_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE outfit_id = ?")
            .bind(outfit_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Like the outfit, or remove the like when the user already likes it
    ///
    /// Runs in one transaction so a user holds at most one like per outfit.
    pub async fn toggle(&self, user_id: i64, outfit_id: i64) -> Result<LikeStatus> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM likes WHERE user_id = ? AND outfit_id = ?")
                .bind(user_id)
                .bind(outfit_id)
                .fetch_optional(&mut *tx)
                .await?;

        let liked = match existing {
            Some(id) => {
                sqlx::query("DELETE FROM likes WHERE id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                false
            }
            None => {
                sqlx::query("INSERT INTO likes (user_id, outfit_id) VALUES (?, ?)")
                    .bind(user_id)
                    .bind(outfit_id)
                    .execute(&mut *tx)
                    .await?;
                true
            }
        };

        let likes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE outfit_id = ?")
            .bind(outfit_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "User {} {} outfit {}",
            user_id,
            if liked { "liked" } else { "unliked" },
            outfit_id
        );
        Ok(LikeStatus { likes, liked })
    }
}
