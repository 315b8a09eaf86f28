use crate::auth::CurrentUser;
use crate::database::boundary::BoundaryRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::{AppError, ApiRejection};
use crate::error::json::JsonBody;
use crate::models::boundary::{BoundaryRequest, BoundaryResponse, NewBoundary};
use crate::models::waypoint::CreatedResponse;
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::{State, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;

/// List the current user's boundaries, newest first
#[openapi(tag = "Boundaries")]
#[get("/")]
pub async fn list_boundaries(current_user: CurrentUser, pool: &State<PgPool>) -> Result<Json<Vec<BoundaryResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let boundaries = repo.list_boundaries(&current_user.id).await?;
    Ok(Json(boundaries.iter().map(BoundaryResponse::from).collect()))
}

/// Save a boundary polygon of at least three `[lat, lng]` points
#[openapi(tag = "Boundaries")]
#[post("/", data = "<payload>")]
pub async fn create_boundary(
    current_user: CurrentUser,
    pool: &State<PgPool>,
    payload: JsonBody<BoundaryRequest>,
) -> Result<Created<Json<CreatedResponse>>, ApiRejection> {
    let boundary = NewBoundary::try_from(&*payload)?;
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let created = repo.create_boundary(&current_user.id, &boundary).await?;
    tracing::debug!(boundary_id = %created.id, user_id = %created.user_id, points = created.coords.len(), "boundary saved");
    Ok(Created::new("/api/boundaries").body(Json(CreatedResponse::new(created.id))))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![list_boundaries, create_boundary]
}

#[cfg(test)]
mod tests {
    use crate::routes::test_client;
    use crate::test_utils::MockWeatherProvider;
    use rocket::http::{ContentType, Status};
    use serde_json::{Value, json};

    #[rocket::async_test]
    async fn list_requires_session() {
        let client = test_client(MockWeatherProvider::default()).await;
        let response = client.get("/api/boundaries").dispatch().await;

        assert_eq!(response.status(), Status::Unauthorized);
        assert_eq!(response.content_type(), Some(ContentType::JSON));
    }

    #[rocket::async_test]
    async fn create_requires_session() {
        let client = test_client(MockWeatherProvider::default()).await;
        let response = client
            .post("/api/boundaries")
            .header(ContentType::JSON)
            .body(json!({"name": "Ridge", "coords": [[1, 1], [2, 2], [3, 1]]}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn two_point_boundary_is_rejected_then_three_points_listed() {
        let client = crate::routes::database_client(MockWeatherProvider::default()).await;
        crate::routes::register_and_login(&client).await;

        let response = client
            .post("/api/boundaries")
            .header(ContentType::JSON)
            .body(json!({"name": "Ridge", "coords": [[1, 1], [2, 2]]}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body, json!({"ok": false, "error": "Need at least 3 points"}));

        let response = client
            .post("/api/boundaries")
            .header(ContentType::JSON)
            .body(json!({"coords": [[38.9, -99.3], [38.91, -99.3], [38.91, -99.31]]}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        let created: Value = response.into_json().await.expect("json body");
        assert_eq!(created["ok"], true);

        let listed: Value = client.get("/api/boundaries").dispatch().await.into_json().await.expect("json body");
        let listed = listed.as_array().expect("array");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);
        assert_eq!(listed[0]["name"], "Custom Boundary");
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn malformed_boundary_bodies_answer_with_ok_false() {
        let client = crate::routes::database_client(MockWeatherProvider::default()).await;
        crate::routes::register_and_login(&client).await;

        let cases = [
            (json!({"coords": [[1, "x"], [2, 2], [3, 3]]}).to_string(), "Coordinates must be numbers"),
            (json!({"coords": null}).to_string(), "Need at least 3 points"),
            (json!({"name": 7, "coords": [[1, 1], [2, 2], [3, 1]]}).to_string(), "name must be text"),
            ("{not json".to_string(), "Request body must be a JSON object"),
        ];
        for (payload, message) in cases {
            let response = client.post("/api/boundaries").header(ContentType::JSON).body(payload.clone()).dispatch().await;
            assert_eq!(response.status(), Status::BadRequest, "{payload}");
            let body: Value = response.into_json().await.expect("json body");
            assert_eq!(body, json!({"ok": false, "error": message}), "{payload}");
        }

        let listed: Value = client.get("/api/boundaries").dispatch().await.into_json().await.expect("json body");
        assert_eq!(listed, json!([]));
    }
}
