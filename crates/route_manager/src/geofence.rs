use itertools::Itertools;
use model::{geofence::GeofencePolygon, route::RoutePath};
use utility::geo;

/// Whether `route` crosses `fence`: true iff any route segment intersects
/// any edge of the fence's ring, or any route vertex lies inside the ring.
/// The vertex test covers a route that sits entirely within the fence
/// without ever touching an edge.
pub fn route_crosses(route: &RoutePath, fence: &GeofencePolygon) -> bool {
    // Planar test in (x, y) = (lon, lat).
    let ring = fence
        .ring()
        .iter()
        .map(|vertex| vertex.lon_lat())
        .collect::<Vec<_>>();
    let path = route
        .points()
        .iter()
        .map(|point| point.lon_lat())
        .collect::<Vec<_>>();

    for (a, b) in path.iter().tuple_windows() {
        for (e0, e1) in ring.iter().tuple_windows() {
            if geo::segments_intersect(*a, *b, *e0, *e1) {
                return true;
            }
        }
    }

    path.iter().any(|point| geo::point_in_ring(*point, &ring))
}

/// Every fence crossed by the route, in input order. Does not stop at the
/// first match; a route may cross several fences and all are reported.
pub fn crossed_fences<'a, I>(route: &RoutePath, fences: I) -> Vec<&'a GeofencePolygon>
where
    I: IntoIterator<Item = &'a GeofencePolygon>,
{
    fences
        .into_iter()
        .filter(|fence| route_crosses(route, fence))
        .collect()
}

#[cfg(test)]
mod tests {
    use model::Coordinate;

    use super::*;

    fn path(points: &[(f64, f64)]) -> RoutePath {
        RoutePath::new(points.iter().map(|p| Coordinate::from(*p)).collect())
            .unwrap()
    }

    fn square(name: &str, low: f64, high: f64) -> GeofencePolygon {
        GeofencePolygon::from_ring(
            name,
            vec![
                Coordinate::new(low, low),
                Coordinate::new(low, high),
                Coordinate::new(high, high),
                Coordinate::new(high, low),
            ],
        )
        .unwrap()
    }

    #[test]
    fn diagonal_through_square_crosses() {
        let route = path(&[(0.0, 0.0), (10.0, 10.0)]);
        assert!(route_crosses(&route, &square("inner", 4.0, 6.0)));
    }

    #[test]
    fn diagonal_misses_a_square_hugging_the_axis() {
        let route = path(&[(0.0, 0.0), (10.0, 10.0)]);
        let fence = GeofencePolygon::from_ring(
            "near axis",
            vec![
                Coordinate::new(0.0, 5.0),
                Coordinate::new(0.0, 6.0),
                Coordinate::new(1.0, 6.0),
                Coordinate::new(1.0, 5.0),
            ],
        )
        .unwrap();
        assert!(!route_crosses(&route, &fence));
    }

    #[test]
    fn diagonal_far_from_square_does_not_cross() {
        let route = path(&[(0.0, 0.0), (10.0, 10.0)]);
        assert!(!route_crosses(&route, &square("far", 20.0, 21.0)));
    }

    #[test]
    fn route_fully_inside_fence_counts_as_crossing() {
        let route = path(&[(4.5, 4.5), (5.5, 5.5)]);
        assert!(route_crosses(&route, &square("around", 0.0, 10.0)));
    }

    #[test]
    fn reports_every_crossed_fence_in_order() {
        let route = path(&[(0.0, 0.0), (10.0, 10.0)]);
        let fences = vec![
            square("first", 1.0, 3.0),
            square("aside", 20.0, 22.0),
            square("second", 7.0, 9.0),
        ];
        let crossed = crossed_fences(&route, &fences);
        assert_eq!(
            crossed.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            ["first", "second"]
        );
    }

    #[test]
    fn no_fences_yield_no_crossings() {
        let route = path(&[(0.0, 0.0), (10.0, 10.0)]);
        let fences: Vec<GeofencePolygon> = Vec::new();
        assert!(crossed_fences(&route, &fences).is_empty());
    }
}
