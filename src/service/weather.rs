use crate::config::WeatherConfig;
use crate::error::app_error::AppError;
use crate::models::weather::{ForecastPayload, GeoPlace, GeocodePayload, WeatherQuery, WeatherReport};
use std::time::Duration;
use tracing::warn;

const DAILY_FIELDS: [&str; 5] = [
    "weathercode",
    "temperature_2m_max",
    "temperature_2m_min",
    "precipitation_probability_max",
    "wind_speed_10m_max",
];

/// Place lookup and forecast source.
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Top match for a place name or zip. Lookup failures are reported as `None`.
    async fn geocode(&self, query: &str) -> Option<GeoPlace>;
    /// Current conditions plus daily and hourly series for a coordinate.
    async fn forecast(&self, lat: f64, lon: f64) -> Result<WeatherReport, AppError>;
}

/// [`WeatherProvider`] backed by the public Open-Meteo APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    pub fn new(config: WeatherConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn lookup_place(&self, query: &str) -> Result<Option<GeoPlace>, reqwest::Error> {
        let payload: GeocodePayload = self
            .client
            .get(&self.config.geocoding_url)
            .query(&geocode_params(query))
            .timeout(Duration::from_secs(self.config.geocode_timeout_secs))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(payload.top_place())
    }

    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<ForecastPayload, reqwest::Error> {
        self.client
            .get(&self.config.forecast_url)
            .query(&forecast_params(lat, lon))
            .timeout(Duration::from_secs(self.config.forecast_timeout_secs))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn geocode(&self, query: &str) -> Option<GeoPlace> {
        match self.lookup_place(query).await {
            Ok(place) => place,
            Err(e) => {
                warn!(query = %query, error = %e, timeout = e.is_timeout(), "geocoding lookup failed");
                None
            }
        }
    }

    async fn forecast(&self, lat: f64, lon: f64) -> Result<WeatherReport, AppError> {
        self.fetch_forecast(lat, lon).await.map(WeatherReport::from).map_err(|e| {
            warn!(lat, lon, error = %e, timeout = e.is_timeout(), "forecast request failed");
            AppError::Upstream(e.to_string())
        })
    }
}

fn geocode_params(query: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", query.to_string()),
        ("count", "1".to_string()),
        ("language", "en".to_string()),
        ("format", "json".to_string()),
    ]
}

fn forecast_params(lat: f64, lon: f64) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", lat.to_string()),
        ("longitude", lon.to_string()),
        ("timezone", "auto".to_string()),
        ("current_weather", "true".to_string()),
        ("temperature_unit", "fahrenheit".to_string()),
        ("wind_speed_unit", "mph".to_string()),
        ("precipitation_unit", "inch".to_string()),
        ("daily", DAILY_FIELDS.join(",")),
        ("hourly", "precipitation_probability".to_string()),
    ]
}

#[derive(Debug, PartialEq)]
enum Target<'q> {
    Coordinates(f64, f64),
    Place(&'q str),
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::validation(format!("{} must be a number", field)))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn resolve_target(query: &WeatherQuery) -> Result<Target<'_>, AppError> {
    if let (Some(lat), Some(lon)) = (non_blank(&query.lat), non_blank(&query.lon)) {
        return Ok(Target::Coordinates(parse_degrees("lat", lat)?, parse_degrees("lon", lon)?));
    }

    match non_blank(&query.q) {
        Some(place) => Ok(Target::Place(place)),
        None => Err(AppError::validation("Provide lat and lon, or q")),
    }
}

/// Direct coordinates win; otherwise `q` is geocoded first.
pub async fn weather_for_query(provider: &dyn WeatherProvider, query: &WeatherQuery) -> Result<WeatherReport, AppError> {
    match resolve_target(query)? {
        Target::Coordinates(lat, lon) => provider.forecast(lat, lon).await,
        Target::Place(place) => {
            let found = provider
                .geocode(place)
                .await
                .ok_or_else(|| AppError::NotFound("Location not found".to_string()))?;
            let mut report = provider.forecast(found.lat, found.lon).await?;
            report.place = Some(found);
            Ok(report)
        }
    }
}
