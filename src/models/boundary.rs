use crate::error::app_error::AppError;
use crate::models::waypoint::parse_text;
use crate::util::label_or_default;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const DEFAULT_BOUNDARY_NAME: &str = "Custom Boundary";
pub const MIN_BOUNDARY_POINTS: usize = 3;

/// A `[lat, lng]` pair.
pub type Coordinate = [f64; 2];

#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub coords: Vec<Coordinate>,
    pub created_at: DateTime<Utc>,
}

/// Row shape in the `boundary` table, coordinates kept as JSON text.
#[derive(Debug, sqlx::FromRow)]
pub struct BoundaryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub coords: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BoundaryRow> for Boundary {
    type Error = serde_json::Error;

    fn try_from(row: BoundaryRow) -> Result<Self, Self::Error> {
        Ok(Boundary {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            coords: serde_json::from_str(&row.coords)?,
            created_at: row.created_at,
        })
    }
}

/// Body of `POST /api/boundaries`; `coords` is checked point by point.
#[derive(Deserialize, Debug, Default, JsonSchema)]
pub struct BoundaryRequest {
    pub name: Option<Value>,
    pub coords: Option<Value>,
}

/// A boundary that passed validation and is ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBoundary {
    pub name: String,
    pub coords: Vec<Coordinate>,
}

impl TryFrom<&BoundaryRequest> for NewBoundary {
    type Error = AppError;

    fn try_from(request: &BoundaryRequest) -> Result<Self, Self::Error> {
        let coords = parse_coords(request.coords.as_ref())?;
        ensure_polygon(&coords)?;
        Ok(NewBoundary {
            name: label_or_default(parse_text("name", request.name.as_ref())?, DEFAULT_BOUNDARY_NAME),
            coords,
        })
    }
}

fn parse_coords(value: Option<&Value>) -> Result<Vec<Coordinate>, AppError> {
    let points = match value {
        None | Some(Value::Null) => return Err(AppError::InvalidBoundary),
        Some(Value::Array(points)) => points,
        Some(_) => return Err(AppError::validation("coords must be a list of [lat, lng] pairs")),
    };
    points.iter().map(parse_point).collect()
}

fn parse_point(point: &Value) -> Result<Coordinate, AppError> {
    match point.as_array().map(Vec::as_slice) {
        Some([lat, lng]) => match (lat.as_f64(), lng.as_f64()) {
            (Some(lat), Some(lng)) => Ok([lat, lng]),
            _ => Err(AppError::validation("Coordinates must be numbers")),
        },
        _ => Err(AppError::validation("Each point must be a [lat, lng] pair")),
    }
}

/// Rejects coordinate lists that cannot close a polygon.
pub fn ensure_polygon(coords: &[Coordinate]) -> Result<(), AppError> {
    if coords.len() < MIN_BOUNDARY_POINTS {
        return Err(AppError::InvalidBoundary);
    }
    if coords.iter().flatten().any(|v| !v.is_finite()) {
        return Err(AppError::validation("Coordinates must be finite numbers"));
    }
    Ok(())
}

#[derive(Serialize, Debug, Clone, JsonSchema)]
pub struct BoundaryResponse {
    pub id: Uuid,
    pub name: String,
    pub coords: Vec<Coordinate>,
    pub created_at: DateTime<Utc>,
}

impl From<&Boundary> for BoundaryResponse {
    fn from(boundary: &Boundary) -> Self {
        Self {
            id: boundary.id,
            name: boundary.name.clone(),
            coords: boundary.coords.clone(),
            created_at: boundary.created_at,
        }
    }
}
