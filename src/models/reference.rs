use crate::models::boundary::Coordinate;
use serde::{Deserialize, Serialize};

/// One row of the bundled regulations table.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Season {
    pub species: String,
    pub season: String,
    pub weapon: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub bag_limit: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Demo parcel drawn on the map for every visitor.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DemoProperty {
    pub name: &'static str,
    pub notes: &'static str,
    pub coords: Vec<Coordinate>,
}
