use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query string of `GET /api/weather`.
#[derive(Debug, Default, Clone)]
pub struct WeatherQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub q: Option<String>,
}

/// Top geocoding hit.
#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct GeoPlace {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct WeatherUnits {
    pub temp: String,
    pub wind: String,
    pub pop: String,
}

impl Default for WeatherUnits {
    fn default() -> Self {
        Self {
            temp: "°F".to_string(),
            wind: "mph".to_string(),
            pop: "%".to_string(),
        }
    }
}

/// Normalized forecast handed to the weather page and API clients.
#[derive(Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct WeatherReport {
    pub current: Value,
    pub daily: Value,
    pub hourly: Value,
    pub timezone: Option<String>,
    pub units: WeatherUnits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<GeoPlace>,
}

/// Subset of the Open-Meteo forecast payload that is passed through.
#[derive(Deserialize, Debug, Default)]
pub struct ForecastPayload {
    #[serde(default)]
    pub current_weather: Option<Value>,
    #[serde(default)]
    pub daily: Option<Value>,
    #[serde(default)]
    pub hourly: Option<Value>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl From<ForecastPayload> for WeatherReport {
    fn from(payload: ForecastPayload) -> Self {
        let empty = || Value::Object(Default::default());
        WeatherReport {
            current: payload.current_weather.unwrap_or_else(empty),
            daily: payload.daily.unwrap_or_else(empty),
            hourly: payload.hourly.unwrap_or_else(empty),
            timezone: payload.timezone,
            units: WeatherUnits::default(),
            place: None,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct GeocodePayload {
    #[serde(default)]
    pub results: Option<Vec<GeocodeHit>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeocodeHit {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub admin1: Option<String>,
}

impl GeocodePayload {
    /// First hit as `"<name>, <admin1>"`, or `None` for an empty result set.
    pub fn top_place(self) -> Option<GeoPlace> {
        let hit = self.results?.into_iter().next()?;
        Some(GeoPlace {
            lat: hit.latitude,
            lon: hit.longitude,
            name: format!("{}, {}", hit.name, hit.admin1.unwrap_or_default()),
        })
    }
}
