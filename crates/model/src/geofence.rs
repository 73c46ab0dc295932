use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::Coordinate;

/// A closed polygon area of interest, checked against routes for crossings.
///
/// The ring always repeats its first vertex at the end; the constructor
/// appends the closing vertex when the draw tool delivered an open ring.
/// Rings are assumed simple (non-self-intersecting); this is not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeofencePolygon {
    pub name: String,
    ring: Vec<Coordinate>,
}

impl GeofencePolygon {
    /// Builds a fence from a drawn ring. Returns `None` for rings with fewer
    /// than three distinct vertices, which cannot enclose an area.
    pub fn from_ring<S>(name: S, mut ring: Vec<Coordinate>) -> Option<Self>
    where
        S: Into<String>,
    {
        if ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return None;
        }
        ring.push(ring[0]);
        Some(Self {
            name: name.into(),
            ring,
        })
    }

    pub fn ring(&self) -> &[Coordinate] {
        &self.ring
    }
}

impl HasId for GeofencePolygon {
    type IdType = String;
}
