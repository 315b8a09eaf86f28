mod auth;
mod config;
mod csrf;
mod database;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod service;
mod util;
mod views;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;

use crate::db::stage_db;
use crate::middleware::RequestLogger;
use crate::routes as app_routes;
use crate::service::weather::{OpenMeteoClient, WeatherProvider};
use rocket::fs::{FileServer, Options, relative};
use rocket::{Build, Rocket, catchers, http::Method};
use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};
use rocket_okapi::{get_openapi_route, okapi::merge::marge_spec_list};
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Reasons the server refuses to start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("ROCKET_SECRET_KEY is required for profile '{0}'. Generate one with: openssl rand -base64 32")]
    MissingSecretKey(String),
    #[error("Invalid CORS configuration: {0}")]
    Cors(String),
    #[error("Could not merge OpenAPI spec: {0}")]
    OpenApi(String),
}

fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG wins over logging.level, e.g. RUST_LOG=info,betterhunt::service=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    // try_init: tests build the app many times in one process.
    let _ = if json_format { subscriber.json().try_init() } else { subscriber.try_init() };
}

fn ensure_rocket_secret_key() -> Result<(), StartupError> {
    let profile = std::env::var("ROCKET_PROFILE").unwrap_or_else(|_| "debug".to_string());

    if profile != "debug" && std::env::var("ROCKET_SECRET_KEY").is_err() {
        return Err(StartupError::MissingSecretKey(profile));
    }
    Ok(())
}

fn build_cors(cors_config: &config::CorsConfig) -> Result<CorsOptions, StartupError> {
    let is_wildcard = cors_config.allowed_origins.len() == 1 && cors_config.allowed_origins[0] == "*";

    if is_wildcard && cors_config.allow_credentials {
        return Err(StartupError::Cors(
            "wildcard origins (*) cannot be combined with credentials; list origins or disable credentials".to_string(),
        ));
    }

    let allowed_origins = if cors_config.allowed_origins.is_empty() {
        AllowedOrigins::some_exact::<&str>(&[])
    } else if is_wildcard {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&cors_config.allowed_origins.iter().map(String::as_str).collect::<Vec<_>>())
    };

    Ok(CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Options, Method::Head]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Content-Type", "Accept"]),
        allow_credentials: cors_config.allow_credentials,
        ..Default::default()
    })
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return config::DEFAULT_API_BASE_PATH.to_string();
    }

    let mut normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }

    normalized
}

fn join_base_path(base_path: &str, path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let suffix = path.trim_start_matches('/');

    if base.is_empty() {
        format!("/{}", suffix)
    } else {
        format!("{}/{}", base, suffix)
    }
}

struct RouteSpec {
    path: &'static str,
    routes: Vec<rocket::Route>,
    openapi: rocket_okapi::okapi::openapi3::OpenApi,
}

fn collect_route_specs() -> Vec<RouteSpec> {
    let (weather_routes, weather_openapi) = app_routes::weather::routes();
    let (waypoint_routes, waypoint_openapi) = app_routes::waypoint::routes();
    let (boundary_routes, boundary_openapi) = app_routes::boundary::routes();
    let (health_routes, health_openapi) = app_routes::health::routes();

    vec![
        RouteSpec {
            path: "/weather",
            routes: weather_routes,
            openapi: weather_openapi,
        },
        RouteSpec {
            path: "/waypoints",
            routes: waypoint_routes,
            openapi: waypoint_openapi,
        },
        RouteSpec {
            path: "/boundaries",
            routes: boundary_routes,
            openapi: boundary_openapi,
        },
        RouteSpec {
            path: "/health",
            routes: health_routes,
            openapi: health_openapi,
        },
    ]
}

fn mount_api_routes(mut rocket: Rocket<Build>, base_path: &str, enable_swagger: bool) -> Result<Rocket<Build>, StartupError> {
    let route_specs = collect_route_specs();

    if enable_swagger {
        let mut openapi_list = Vec::new();
        for spec in route_specs {
            rocket = rocket.mount(join_base_path(base_path, spec.path), spec.routes);
            openapi_list.push((spec.path, spec.openapi));
        }

        let openapi_docs = marge_spec_list(&openapi_list).map_err(|e| StartupError::OpenApi(e.to_string()))?;

        let settings = rocket_okapi::settings::OpenApiSettings::default();
        rocket = rocket.mount(base_path, vec![get_openapi_route(openapi_docs, &settings)]);

        let openapi_url = join_base_path(base_path, "openapi.json");
        let swagger = SwaggerUIConfig {
            url: openapi_url,
            ..Default::default()
        };
        rocket = rocket.mount(join_base_path(base_path, "docs"), make_swagger_ui(&swagger));
    } else {
        for spec in route_specs {
            rocket = rocket.mount(join_base_path(base_path, spec.path), spec.routes);
        }
    }

    Ok(rocket)
}

/// Attaches fairings, state, routes and catchers to `rocket`. The caller
/// supplies the `PgPool`, either managed directly or staged at ignition.
pub fn mount_app(rocket: Rocket<Build>, config: &Config, weather: Arc<dyn WeatherProvider>) -> Result<Rocket<Build>, StartupError> {
    let cors = build_cors(&config.cors)?.to_cors().map_err(|e| StartupError::Cors(e.to_string()))?;
    let base_path = normalize_base_path(&config.api.base_path);

    let rocket = rocket
        .attach(cors)
        .attach(RequestLogger)
        .manage(config.clone())
        .manage(weather)
        .mount("/", app_routes::pages::routes())
        .mount("/", app_routes::user::routes())
        .mount("/static", FileServer::new(relative!("static"), Options::Missing));

    let rocket = mount_api_routes(rocket, &base_path, config.api.enable_swagger)?;

    Ok(rocket.register(
        base_path.as_str(),
        catchers![
            app_routes::error::bad_request,
            app_routes::error::unauthorized,
            app_routes::error::not_found,
            app_routes::error::conflict,
            app_routes::error::unprocessable_entity,
            app_routes::error::internal_error
        ],
    ))
}

pub fn build_rocket(config: Config) -> Result<Rocket<Build>, StartupError> {
    init_tracing(&config.logging.level, config.logging.json_format);
    ensure_rocket_secret_key()?;

    let figment = rocket::Config::figment()
        .merge(("port", config.server.port))
        .merge(("address", config.server.address.clone()));

    let weather: Arc<dyn WeatherProvider> = Arc::new(OpenMeteoClient::new(config.weather.clone()));
    let rocket = rocket::custom(figment).attach(stage_db(config.database.clone()));

    mount_app(rocket, &config, weather)
}
