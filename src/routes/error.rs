use crate::error::app_error::{AppError, ApiRejection};
use crate::error::json::BodyRejection;
use rocket::serde::Serialize;
use rocket::serde::json::Json;
use rocket::{Request, catch};

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct Error {
    pub error: String,
}

fn body(message: &str) -> Json<Error> {
    Json(Error { error: message.to_string() })
}

/// Unparseable mutation bodies keep the `{ok: false, error}` shape.
#[catch(400)]
pub fn bad_request(req: &Request) -> Result<Json<Error>, ApiRejection> {
    match req.local_cache(|| None::<BodyRejection>) {
        Some(rejection) => Err(ApiRejection(AppError::validation(rejection.0.clone()))),
        None => Ok(body("Bad request")),
    }
}

#[catch(401)]
pub fn unauthorized(_: &Request) -> Json<Error> {
    body("Authentication required")
}

#[catch(404)]
pub fn not_found(_: &Request) -> Json<Error> {
    body("Not found")
}

#[catch(409)]
pub fn conflict(_: &Request) -> Json<Error> {
    body("Conflict")
}

#[catch(422)]
pub fn unprocessable_entity(_: &Request) -> Json<Error> {
    body("Unprocessable entity")
}

#[catch(500)]
pub fn internal_error(_: &Request) -> Json<Error> {
    body("Internal server error")
}

#[cfg(test)]
mod tests {
    use super::bad_request;
    use crate::error::json::JsonBody;
    use crate::models::boundary::BoundaryRequest;
    use crate::routes::test_client;
    use crate::test_utils::MockWeatherProvider;
    use rocket::http::{ContentType, Status};
    use rocket::local::asynchronous::Client;
    use rocket::{catchers, post, routes};
    use serde_json::{Value, json};

    #[post("/", data = "<payload>")]
    fn accept_boundary(payload: JsonBody<BoundaryRequest>) -> String {
        format!("{:?}", payload.name)
    }

    async fn body_client() -> Client {
        let rocket = rocket::build()
            .mount("/api/boundaries", routes![accept_boundary])
            .register("/api", catchers![bad_request]);
        Client::untracked(rocket).await.expect("valid rocket instance")
    }

    #[rocket::async_test]
    async fn malformed_json_body_answers_with_ok_false() {
        let client = body_client().await;
        let response = client.post("/api/boundaries").header(ContentType::JSON).body("{not json").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);

        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body, json!({"ok": false, "error": "Request body must be a JSON object"}));
    }

    #[rocket::async_test]
    async fn scalar_json_body_answers_with_ok_false() {
        let client = body_client().await;
        let response = client.post("/api/boundaries").header(ContentType::JSON).body("42").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);

        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["ok"], false);
    }

    #[rocket::async_test]
    async fn wrongly_typed_fields_still_reach_the_handler() {
        let client = body_client().await;
        let response = client
            .post("/api/boundaries")
            .header(ContentType::JSON)
            .body(json!({"name": 7, "coords": [[1, "x"]]}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
    }

    #[rocket::async_test]
    async fn weather_errors_keep_plain_error_shape() {
        let client = test_client(MockWeatherProvider::default()).await;
        let response = client.get("/api/weather?lat=north&lon=1").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);

        let body: Value = response.into_json().await.expect("json body");
        assert!(body.get("ok").is_none());
    }

    #[rocket::async_test]
    async fn unknown_api_path_is_json_404() {
        let client = test_client(MockWeatherProvider::default()).await;
        let response = client.get("/api/nope").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);

        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["error"], "Not found");
    }

    #[rocket::async_test]
    async fn page_redirect_is_not_affected_by_api_catchers() {
        let client = test_client(MockWeatherProvider::default()).await;
        let response = client.get("/map").dispatch().await;
        assert_eq!(response.status(), Status::SeeOther);
        assert_ne!(response.content_type(), Some(ContentType::JSON));
    }
}
