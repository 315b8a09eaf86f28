pub mod boundary;
pub mod error;
pub mod health;
pub mod pages;
pub mod user;
pub mod waypoint;
pub mod weather;

#[cfg(test)]
use crate::test_utils::{MockWeatherProvider, database_pool, lazy_pool};
#[cfg(test)]
use rocket::local::asynchronous::Client;

/// App over a pool that never connects; fine for anything that stops at the session guard.
#[cfg(test)]
pub(crate) async fn test_client(weather: MockWeatherProvider) -> Client {
    client_with_pool(lazy_pool(), weather).await
}

#[cfg(test)]
pub(crate) async fn database_client(weather: MockWeatherProvider) -> Client {
    client_with_pool(database_pool().await, weather).await
}

#[cfg(test)]
async fn client_with_pool(pool: sqlx::PgPool, weather: MockWeatherProvider) -> Client {
    let mut config = crate::Config::default();
    config.session.cookie_secure = false;

    let rocket = crate::mount_app(rocket::build().manage(pool), &config, std::sync::Arc::new(weather)).expect("app mounts");
    Client::tracked(rocket).await.expect("valid rocket instance")
}

/// Loads a form page and returns the hidden `csrf_token` it embeds.
#[cfg(test)]
pub(crate) async fn form_token(client: &Client, path: &str) -> String {
    let body = client.get(path).dispatch().await.into_string().await.expect("page body");
    let marker = r#"name="csrf_token" value=""#;
    let start = body.find(marker).expect("form carries a csrf token") + marker.len();
    body[start..].split('"').next().unwrap_or_default().to_string()
}

/// Registers a fresh account and logs in with it; returns the email.
#[cfg(test)]
pub(crate) async fn register_and_login(client: &Client) -> String {
    use rocket::http::{ContentType, Status};

    let token = form_token(client, "/register").await;
    let email = format!("demo2-{}@x.com", uuid::Uuid::new_v4().simple());
    let response = client
        .post("/register")
        .header(ContentType::Form)
        .body(format!("first_name=Demo&last_name=Two&email={email}&password=abc&csrf_token={token}"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(response.headers().get_one("Location"), Some("/login"));

    let response = client
        .post("/login")
        .header(ContentType::Form)
        .body(format!("email={email}&password=abc&csrf_token={token}"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(response.headers().get_one("Location"), Some("/map"));

    email
}
