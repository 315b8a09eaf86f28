use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::database::waypoint::WaypointRepository;
use crate::error::app_error::{AppError, ApiRejection};
use crate::error::json::JsonBody;
use crate::models::waypoint::{CreatedResponse, NewWaypoint, WaypointRequest, WaypointResponse};
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::{State, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;

/// Drop a waypoint for the current user
#[openapi(tag = "Waypoints")]
#[post("/", data = "<payload>")]
pub async fn create_waypoint(
    current_user: CurrentUser,
    pool: &State<PgPool>,
    payload: JsonBody<WaypointRequest>,
) -> Result<Created<Json<CreatedResponse>>, ApiRejection> {
    let waypoint = NewWaypoint::try_from(&*payload)?;
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let created = repo.create_waypoint(&current_user.id, &waypoint).await?;
    tracing::debug!(waypoint_id = %created.id, user_id = %created.user_id, label = %created.label, "waypoint dropped");
    Ok(Created::new("/api/waypoints").body(Json(CreatedResponse::new(created.id))))
}

/// List the current user's waypoints, newest first
#[openapi(tag = "Waypoints")]
#[get("/")]
pub async fn list_waypoints(current_user: CurrentUser, pool: &State<PgPool>) -> Result<Json<Vec<WaypointResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let waypoints = repo.list_waypoints(&current_user.id).await?;
    Ok(Json(waypoints.iter().map(WaypointResponse::from).collect()))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_waypoint, list_waypoints]
}

#[cfg(test)]
mod tests {
    use crate::routes::{database_client, register_and_login, test_client};
    use crate::test_utils::MockWeatherProvider;
    use rocket::http::{ContentType, Status};
    use serde_json::{Value, json};

    #[rocket::async_test]
    async fn create_requires_session() {
        let client = test_client(MockWeatherProvider::default()).await;
        let response = client
            .post("/api/waypoints")
            .header(ContentType::JSON)
            .body(r#"{"lat": 38.88, "lng": -99.33}"#)
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Unauthorized);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["error"], "Authentication required");
    }

    #[rocket::async_test]
    async fn list_requires_session() {
        let client = test_client(MockWeatherProvider::default()).await;
        let response = client.get("/api/waypoints").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn waypoints_are_created_rejected_and_listed_for_their_owner() {
        let client = database_client(MockWeatherProvider::default()).await;
        register_and_login(&client).await;

        let response = client
            .post("/api/waypoints")
            .header(ContentType::JSON)
            .body(json!({"lat": 38.8849, "lng": -99.3281, "label": "Stand 1"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        let first: Value = response.into_json().await.expect("json body");
        assert_eq!(first["ok"], true);
        assert!(first["id"].as_str().is_some());

        let response = client
            .post("/api/waypoints")
            .header(ContentType::JSON)
            .body(json!({"lat": "north", "lng": -99.3281}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body, json!({"ok": false, "error": "lat must be a number"}));

        let response = client
            .post("/api/waypoints")
            .header(ContentType::JSON)
            .body(json!({"lat": 1, "lng": 2, "label": 7}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body, json!({"ok": false, "error": "label must be text"}));

        let response = client
            .post("/api/waypoints")
            .header(ContentType::JSON)
            .body(json!({"lat": "38.89", "lng": "-99.33"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        let second: Value = response.into_json().await.expect("json body");

        let listed: Value = client.get("/api/waypoints").dispatch().await.into_json().await.expect("json body");
        let listed = listed.as_array().expect("array");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["id"], second["id"]);
        assert_eq!(listed[0]["label"], "Waypoint");
        assert_eq!(listed[1]["id"], first["id"]);
        assert_eq!(listed[1]["label"], "Stand 1");

        client.get("/logout").dispatch().await;
        register_and_login(&client).await;
        let listed: Value = client.get("/api/waypoints").dispatch().await.into_json().await.expect("json body");
        assert_eq!(listed, json!([]));
    }
}
