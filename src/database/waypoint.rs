use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::waypoint::{NewWaypoint, Waypoint};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait WaypointRepository {
    async fn create_waypoint(&self, user_id: &Uuid, waypoint: &NewWaypoint) -> Result<Waypoint, AppError>;
    async fn list_waypoints(&self, user_id: &Uuid) -> Result<Vec<Waypoint>, AppError>;
}

#[async_trait::async_trait]
impl WaypointRepository for PostgresRepository {
    async fn create_waypoint(&self, user_id: &Uuid, waypoint: &NewWaypoint) -> Result<Waypoint, AppError> {
        let waypoint = sqlx::query_as::<_, Waypoint>(
            r#"
            INSERT INTO waypoint (user_id, lat, lng, label)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, lat, lng, label, created_at
            "#,
        )
        .bind(user_id)
        .bind(waypoint.lat)
        .bind(waypoint.lng)
        .bind(&waypoint.label)
        .fetch_one(&self.pool)
        .await?;

        Ok(waypoint)
    }

    async fn list_waypoints(&self, user_id: &Uuid) -> Result<Vec<Waypoint>, AppError> {
        let waypoints = sqlx::query_as::<_, Waypoint>(
            r#"
            SELECT id, user_id, lat, lng, label, created_at
            FROM waypoint
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(waypoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::user::UserRepository;
    use crate::test_utils::{MockRepository, database_pool, seed_user};

    async fn assert_waypoints_scoped<R: WaypointRepository + UserRepository + Sync>(repo: &R) {
        let alice = seed_user(repo).await;
        let bob = seed_user(repo).await;
        let stand = NewWaypoint {
            lat: 38.8849,
            lng: -99.3281,
            label: "Stand 1".to_string(),
        };

        let created = repo.create_waypoint(&alice.id, &stand).await.unwrap();
        repo.create_waypoint(&bob.id, &stand).await.unwrap();

        assert_eq!(repo.get_user_by_id(&alice.id).await.unwrap().map(|u| u.email), Some(alice.email.clone()));
        assert_eq!(created.user_id, alice.id);
        assert_eq!(created.label, "Stand 1");
        let listed = repo.list_waypoints(&alice.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!((listed[0].lat, listed[0].lng), (38.8849, -99.3281));
    }

    #[tokio::test]
    async fn mock_waypoints_scoped_to_owner() {
        let repo = MockRepository::default();
        assert_waypoints_scoped(&repo).await;
        assert_eq!(repo.waypoint_count(), 2);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn postgres_waypoints_scoped_to_owner() {
        assert_waypoints_scoped(&PostgresRepository { pool: database_pool().await }).await;
    }
}
