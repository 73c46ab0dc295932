use itertools::Itertools;

pub const EARTH_RADIUS_KM: f64 = 6371.0088;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Great-circle distance in kilometers between two (latitude, longitude)
/// pairs, via the haversine formula.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Geodesic length of a vertex chain in kilometers. Points are
/// (latitude, longitude) pairs; the length is the haversine distance summed
/// over consecutive pairs. Fewer than two points yield zero.
pub fn path_length_km(points: &[(f64, f64)]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| haversine_distance(a.0, a.1, b.0, b.1))
        .sum()
}

fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

fn within(low: f64, value: f64, high: f64) -> bool {
    low.min(high) <= value && value <= low.max(high)
}

fn point_on_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> bool {
    cross(a, b, p) == 0.0 && within(a.0, p.0, b.0) && within(a.1, p.1, b.1)
}

/// Whether the closed segments `a0`..`a1` and `b0`..`b1` intersect.
///
/// Solves the parametric intersection via the cross-product determinant and
/// accepts parameters in [0, 1] on both segments, endpoints included.
/// Collinear segments intersect iff they overlap. A zero-length segment
/// intersects only a segment degenerated to the identical point.
pub fn segments_intersect(
    a0: (f64, f64),
    a1: (f64, f64),
    b0: (f64, f64),
    b1: (f64, f64),
) -> bool {
    if a0 == a1 || b0 == b1 {
        return a0 == a1 && b0 == b1 && a0 == b0;
    }

    let da = (a1.0 - a0.0, a1.1 - a0.1);
    let db = (b1.0 - b0.0, b1.1 - b0.1);
    let denominator = da.0 * db.1 - da.1 * db.0;

    if denominator == 0.0 {
        // Parallel. Only collinear segments can still touch, and then only
        // if their extents overlap.
        if cross(a0, a1, b0) != 0.0 {
            return false;
        }
        return point_on_segment(b0, a0, a1)
            || point_on_segment(b1, a0, a1)
            || point_on_segment(a0, b0, b1)
            || point_on_segment(a1, b0, b1);
    }

    let dx = b0.0 - a0.0;
    let dy = b0.1 - a0.1;
    let t = (dx * db.1 - dy * db.0) / denominator;
    let u = (dx * da.1 - dy * da.0) / denominator;

    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Even-odd ray-cast test for a point against a closed ring.
///
/// Casts a horizontal ray towards +x and counts edge crossings. An edge
/// counts when exactly one of its endpoints lies strictly above the ray
/// (half-open rule), so boundary behavior is deterministic: points on a
/// ring's bottom or left boundary classify as inside, points on its top or
/// right boundary as outside.
///
/// Both the point and the ring vertices are (x, y) pairs in the same axis
/// order; the ring may or may not repeat its first vertex at the end.
pub fn point_in_ring(point: (f64, f64), ring: &[(f64, f64)]) -> bool {
    if ring.is_empty() {
        return false;
    }

    let (x, y) = point;
    let mut inside = false;

    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > y) != (yj > y) {
            let x_crossing = xj + (y - yj) * (xi - xj) / (yi - yj);
            if x < x_crossing {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}
