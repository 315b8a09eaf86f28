use crate::error::app_error::AppError;
use crate::util::label_or_default;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const DEFAULT_WAYPOINT_LABEL: &str = "Waypoint";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Waypoint {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lat: f64,
    pub lng: f64,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/waypoints`. Coordinates arrive as JSON numbers or
/// numeric strings. Fields stay untyped so a wrong type is answered with
/// a field-level message.
#[derive(Deserialize, Debug, Default, JsonSchema)]
pub struct WaypointRequest {
    pub lat: Option<Value>,
    pub lng: Option<Value>,
    pub label: Option<Value>,
}

/// A waypoint that passed validation and is ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWaypoint {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
}

impl TryFrom<&WaypointRequest> for NewWaypoint {
    type Error = AppError;

    fn try_from(request: &WaypointRequest) -> Result<Self, Self::Error> {
        Ok(NewWaypoint {
            lat: parse_coordinate("lat", request.lat.as_ref())?,
            lng: parse_coordinate("lng", request.lng.as_ref())?,
            label: label_or_default(parse_text("label", request.label.as_ref())?, DEFAULT_WAYPOINT_LABEL),
        })
    }
}

pub(crate) fn parse_coordinate(field: &str, value: Option<&Value>) -> Result<f64, AppError> {
    let parsed = match value {
        None | Some(Value::Null) => return Err(AppError::validation(format!("{} is required", field))),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::validation(format!("{} must be a number", field)))
}

/// Optional text field; `null` and absent both read as `None`.
pub(crate) fn parse_text<'v>(field: &str, value: Option<&'v Value>) -> Result<Option<&'v str>, AppError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(AppError::validation(format!("{} must be text", field))),
    }
}

#[derive(Serialize, Debug, Clone, JsonSchema)]
pub struct WaypointResponse {
    pub id: Uuid,
    pub lat: f64,
    pub lng: f64,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Waypoint> for WaypointResponse {
    fn from(waypoint: &Waypoint) -> Self {
        Self {
            id: waypoint.id,
            lat: waypoint.lat,
            lng: waypoint.lng,
            label: waypoint.label.clone(),
            created_at: waypoint.created_at,
        }
    }
}

/// `{ok, id}` acknowledgement returned by the create endpoints.
#[derive(Serialize, Debug, JsonSchema)]
pub struct CreatedResponse {
    pub ok: bool,
    pub id: Uuid,
}

impl CreatedResponse {
    pub fn new(id: Uuid) -> Self {
        Self { ok: true, id }
    }
}
