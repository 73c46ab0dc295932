use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::{geofence::GeofencePolygon, shape::PolylineFeature};

/// Geometry of an exported feature.
///
/// Coordinate ordering differs per variant and matches what the host's
/// consumers expect: `Polygon` rings are (longitude, latitude) pairs,
/// `LineString` vertices are (latitude, longitude) pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<(f64, f64)>> },
    LineString { coordinates: Vec<(f64, f64)> },
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub id: String,
    pub name: String,
    /// Set for polylines only, formatted as `"{length_km:.3} km"`.
    pub length: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Feature {
    Feature {
        properties: FeatureProperties,
        geometry: Geometry,
    },
}

impl Feature {
    pub fn new(properties: FeatureProperties, geometry: Geometry) -> Self {
        Feature::Feature {
            properties,
            geometry,
        }
    }

    pub fn from_geofence(id: &Id<GeofencePolygon>, fence: &GeofencePolygon) -> Self {
        Self::new(
            FeatureProperties {
                id: id.raw(),
                name: fence.name.clone(),
                length: None,
            },
            Geometry::Polygon {
                coordinates: vec![fence
                    .ring()
                    .iter()
                    .map(|vertex| vertex.lon_lat())
                    .collect()],
            },
        )
    }

    pub fn from_polyline(id: &Id<PolylineFeature>, line: &PolylineFeature) -> Self {
        Self::new(
            FeatureProperties {
                id: id.raw(),
                name: line.name.clone(),
                length: Some(format!("{:.3} km", line.length_km)),
            },
            Geometry::LineString {
                coordinates: line
                    .vertices
                    .iter()
                    .map(|vertex| vertex.lat_lon())
                    .collect(),
            },
        )
    }

    pub fn properties(&self) -> &FeatureProperties {
        match self {
            Feature::Feature { properties, .. } => properties,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        match self {
            Feature::Feature { geometry, .. } => geometry,
        }
    }
}

/// The interchange record handed to the host for display or download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum FeatureCollection {
    FeatureCollection { features: Vec<Feature> },
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureCollection::FeatureCollection { features }
    }

    pub fn features(&self) -> &[Feature] {
        match self {
            FeatureCollection::FeatureCollection { features } => features,
        }
    }
}
