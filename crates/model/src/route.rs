use chrono::{DateTime, Duration, Utc};

use crate::Coordinate;

/// Ordered road-following path between two waypoints, or an ad-hoc path
/// decoded from a compressed geometry. Immutable once computed; a
/// recomputation replaces the whole path.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    points: Vec<Coordinate>,
}

impl RoutePath {
    /// A path needs at least two points to describe a traversable route.
    pub fn new(points: Vec<Coordinate>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self { points })
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn start(&self) -> Coordinate {
        self.points[0]
    }

    pub fn end(&self) -> Coordinate {
        self.points[self.points.len() - 1]
    }
}

/// One routed leg as returned by a routing service: the path plus the
/// service's distance/duration metadata.
#[derive(Debug, Clone)]
pub struct RouteLeg {
    pub path: RoutePath,
    pub distance_km: f64,
    pub duration: Duration,
}

/// The session's active route: a leg stamped with the time it was fetched.
#[derive(Debug, Clone)]
pub struct ComputedRoute {
    pub path: RoutePath,
    pub distance_km: f64,
    pub duration: Duration,
    pub fetched_at: DateTime<Utc>,
}

impl ComputedRoute {
    pub fn from_leg(leg: RouteLeg) -> Self {
        Self {
            path: leg.path,
            distance_km: leg.distance_km,
            duration: leg.duration,
            fetched_at: Utc::now(),
        }
    }
}
