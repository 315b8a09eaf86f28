use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::boundary::{Boundary, BoundaryRow, NewBoundary, ensure_polygon};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait BoundaryRepository {
    /// Fails with [`AppError::InvalidBoundary`] for fewer than three points.
    async fn create_boundary(&self, user_id: &Uuid, boundary: &NewBoundary) -> Result<Boundary, AppError>;
    /// Boundaries owned by `user_id`, newest first.
    async fn list_boundaries(&self, user_id: &Uuid) -> Result<Vec<Boundary>, AppError>;
}

fn decode_row(row: BoundaryRow) -> Result<Boundary, AppError> {
    let id = row.id;
    Boundary::try_from(row).map_err(|e| AppError::Internal {
        message: format!("boundary {} has unreadable coordinates: {}", id, e),
    })
}

#[async_trait::async_trait]
impl BoundaryRepository for PostgresRepository {
    async fn create_boundary(&self, user_id: &Uuid, boundary: &NewBoundary) -> Result<Boundary, AppError> {
        ensure_polygon(&boundary.coords)?;
        let coords = serde_json::to_string(&boundary.coords).map_err(|e| AppError::validation(format!("Unserializable coordinates: {}", e)))?;

        let row = sqlx::query_as::<_, BoundaryRow>(
            r#"
            INSERT INTO boundary (user_id, name, coords)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, coords, created_at
            "#,
        )
        .bind(user_id)
        .bind(&boundary.name)
        .bind(&coords)
        .fetch_one(&self.pool)
        .await?;

        decode_row(row)
    }

    async fn list_boundaries(&self, user_id: &Uuid) -> Result<Vec<Boundary>, AppError> {
        let rows = sqlx::query_as::<_, BoundaryRow>(
            r#"
            SELECT id, user_id, name, coords, created_at
            FROM boundary
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(decode_row).collect()
    }
}
