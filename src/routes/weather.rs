use crate::error::app_error::AppError;
use crate::models::weather::{WeatherQuery, WeatherReport};
use crate::service::weather::{WeatherProvider, weather_for_query};
use rocket::serde::json::Json;
use rocket::{State, get};
use rocket_okapi::openapi;
use std::sync::Arc;

/// Forecast for `lat`/`lon`, or for the place named by `q`.
///
/// 400 when neither usable coordinates nor `q` are given, 404 when `q`
/// does not geocode, 502 when the forecast service fails.
#[openapi(tag = "Weather")]
#[get("/?<lat>&<lon>&<q>")]
pub async fn get_weather(
    provider: &State<Arc<dyn WeatherProvider>>,
    lat: Option<String>,
    lon: Option<String>,
    q: Option<String>,
) -> Result<Json<WeatherReport>, AppError> {
    let query = WeatherQuery { lat, lon, q };
    let report = weather_for_query(provider.inner().as_ref(), &query).await?;
    Ok(Json(report))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![get_weather]
}
