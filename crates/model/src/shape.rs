use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::Coordinate;

/// Finished free-drawn geometry delivered by the host's draw tool.
///
/// The variant is fixed when the drawing is committed; the core never
/// re-classifies a shape after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", tag = "kind", content = "vertices")]
pub enum DrawnShape {
    Polygon(Vec<Coordinate>),
    Polyline(Vec<Coordinate>),
}

impl DrawnShape {
    pub fn as_polygon(&self) -> Option<&[Coordinate]> {
        match self {
            DrawnShape::Polygon(ring) => Some(ring),
            DrawnShape::Polyline(_) => None,
        }
    }

    pub fn as_polyline(&self) -> Option<&[Coordinate]> {
        match self {
            DrawnShape::Polyline(vertices) => Some(vertices),
            DrawnShape::Polygon(_) => None,
        }
    }
}

/// A committed free-drawn line with its computed geodesic length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolylineFeature {
    pub name: String,
    pub length_km: f64,
    pub vertices: Vec<Coordinate>,
}

impl HasId for PolylineFeature {
    type IdType = String;
}
