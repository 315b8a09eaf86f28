use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::session::Session;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Login sessions. Expiry is judged by the caller from `expires_at`.
#[async_trait::async_trait]
pub trait SessionRepository {
    /// Opens a session and drops the account's sessions that have already lapsed.
    async fn create_session(&self, user_id: &Uuid, expires_at: DateTime<Utc>) -> Result<Session, AppError>;
    async fn get_session(&self, session_id: &Uuid) -> Result<Option<Session>, AppError>;
    async fn delete_session(&self, session_id: &Uuid) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl SessionRepository for PostgresRepository {
    async fn create_session(&self, user_id: &Uuid, expires_at: DateTime<Utc>) -> Result<Session, AppError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            WITH lapsed AS (
                DELETE FROM user_session
                WHERE user_id = $1 AND expires_at <= now()
            )
            INSERT INTO user_session (user_id, expires_at)
            VALUES ($1, $2)
            RETURNING id, user_id, expires_at
            "#,
        )
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    async fn get_session(&self, session_id: &Uuid) -> Result<Option<Session>, AppError> {
        let session = sqlx::query_as::<_, Session>("SELECT id, user_id, expires_at FROM user_session WHERE id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(session)
    }

    async fn delete_session(&self, session_id: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_session WHERE id = $1").bind(session_id).execute(&self.pool).await?;
        Ok(())
    }
}
