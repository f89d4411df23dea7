//! Session repository for database operations

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::models::{NewSession, Session};

/// Session repository
#[derive(Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new session
    pub async fn create(&self, new_session: &NewSession) -> Result<Session> {
        info!("Creating session for user: {}", new_session.user_id);

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, expires_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_session.user_id)
        .bind(new_session.expires_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Find a session that has not expired yet
    pub async fn find_active(&self, id: Uuid) -> Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, expires_at, created_at
            FROM sessions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session.filter(|s| s.is_active(Utc::now())))
    }

    /// Delete a session by ID
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every expired session of a user
    pub async fn delete_expired_for_user(&self, user_id: i64) -> Result<u64> {
        let sessions = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, expires_at, created_at
            FROM sessions
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let now = Utc::now();
        let mut removed = 0;
        for session in sessions.iter().filter(|s| !s.is_active(now)) {
            if self.delete(session.id).await? {
                removed += 1;
            }
        }

        if removed > 0 {
            info!("Removed {} expired sessions for user {}", removed, user_id);
        }
        Ok(removed)
    }
}
