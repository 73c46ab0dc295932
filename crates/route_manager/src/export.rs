use indexmap::IndexMap;
use model::{
    feature::Feature,
    geofence::GeofencePolygon,
    shape::{DrawnShape, PolylineFeature},
};
use utility::{
    geo,
    id::{Id, IdSequence},
};

/// Commits the polygon-shaped drawings as geofences.
///
/// Each fence gets a fresh id from `ids` and the next sequential display
/// name, and is appended to `collection` (append-only, never deduplicated).
/// Returns the exported features for this batch only; shapes of other kinds
/// are ignored, degenerate rings are skipped.
pub fn commit_geofences(
    shapes: &[DrawnShape],
    collection: &mut IndexMap<Id<GeofencePolygon>, GeofencePolygon>,
    ids: &mut IdSequence,
) -> Vec<Feature> {
    let mut features = Vec::new();

    for ring in shapes.iter().filter_map(DrawnShape::as_polygon) {
        let name = format!("Geofence {}", collection.len() + 1);
        let Some(fence) = GeofencePolygon::from_ring(name, ring.to_vec()) else {
            log::warn!("skipping degenerate polygon ({} vertices)", ring.len());
            continue;
        };
        let id: Id<GeofencePolygon> = ids.next_id();
        features.push(Feature::from_geofence(&id, &fence));
        collection.insert(id, fence);
    }

    features
}

/// Commits the polyline-shaped drawings, computing each line's geodesic
/// length. Same id/name discipline as [`commit_geofences`], scoped to the
/// polyline collection.
pub fn commit_polylines(
    shapes: &[DrawnShape],
    collection: &mut IndexMap<Id<PolylineFeature>, PolylineFeature>,
    ids: &mut IdSequence,
) -> Vec<Feature> {
    let mut features = Vec::new();

    for vertices in shapes.iter().filter_map(DrawnShape::as_polyline) {
        let chain = vertices
            .iter()
            .map(|vertex| vertex.lat_lon())
            .collect::<Vec<_>>();
        let line = PolylineFeature {
            name: format!("Polyline {}", collection.len() + 1),
            length_km: geo::path_length_km(&chain),
            vertices: vertices.to_vec(),
        };
        let id: Id<PolylineFeature> = ids.next_id();
        features.push(Feature::from_polyline(&id, &line));
        collection.insert(id, line);
    }

    features
}
