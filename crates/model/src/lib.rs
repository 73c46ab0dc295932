use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod feature;
pub mod geofence;
pub mod route;
pub mod shape;

/// A point on the map in decimal degrees.
///
/// Named fields keep the axis order explicit everywhere inside the core;
/// positional (lon,lat) vs (lat,lon) ordering only appears at the GeoJSON
/// boundary, where each geometry documents its own convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn lat_lon(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn lon_lat(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    /// Tuples are read as (latitude, longitude), matching the polyline
    /// codec's output.
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Which routing endpoint a user-placed point stands for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum WaypointRole {
    Start,
    End,
}

impl fmt::Display for WaypointRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WaypointRole::Start => write!(f, "start"),
            WaypointRole::End => write!(f, "end"),
        }
    }
}

/// A user-placed routing endpoint. At most one exists per role; placing a
/// new one supersedes the old one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub role: WaypointRole,
    pub position: Coordinate,
}

impl Waypoint {
    pub fn new(role: WaypointRole, position: Coordinate) -> Self {
        Self { role, position }
    }
}
