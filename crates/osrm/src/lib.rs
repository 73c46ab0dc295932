use std::{error, fmt, sync::Arc};

use chrono::Duration;
use model::{
    route::{RouteLeg, RoutePath},
    Coordinate,
};
use polyline::PolylineError;
use route_manager::RouterError;
use serde::Deserialize;

pub mod client;

pub use client::{OsrmClient, OSRM_API_URL};

/// Top-level OSRM route response. The service reports failures both as a
/// non-200 status and as a non-"Ok" code inside the body.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    pub code: String,
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    /// Compressed polyline, as requested with `geometries=polyline`.
    pub geometry: String,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
}

impl RouteResponse {
    /// Converts the response into the first route's leg, decoding its
    /// compressed geometry.
    pub fn into_leg(self) -> Result<RouteLeg, ApiError> {
        if self.code != "Ok" {
            return Err(ApiError::NoRoute {
                code: self.code,
                message: self.message,
            });
        }
        let route = self.routes.into_iter().next().ok_or(ApiError::NoRoute {
            code: "Ok".to_owned(),
            message: Some("response contained no routes".to_owned()),
        })?;

        let points = polyline::decode(&route.geometry)?
            .into_iter()
            .map(Coordinate::from)
            .collect::<Vec<_>>();
        let path = RoutePath::new(points).ok_or(ApiError::DegenerateGeometry)?;

        Ok(RouteLeg {
            path,
            distance_km: route.distance / 1000.0,
            duration: Duration::milliseconds((route.duration * 1000.0).round() as i64),
        })
    }
}

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
    },
    NoRoute {
        code: String,
        message: Option<String>,
    },
    GeometryError(PolylineError),
    /// The decoded geometry had fewer than two points.
    DegenerateGeometry,
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::InvalidResponse { status_code, url } => {
                write!(f, "Invalid Response ({}) {}", status_code, url)
            }
            ApiError::NoRoute { code, message } => match message {
                Some(text) => write!(f, "No route ({}): {}", code, text),
                None => write!(f, "No route ({})", code),
            },
            ApiError::GeometryError(e) => write!(f, "Geometry decode error: {}", e),
            ApiError::DegenerateGeometry => {
                write!(f, "Route geometry has fewer than two points")
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<PolylineError> for ApiError {
    fn from(e: PolylineError) -> Self {
        ApiError::GeometryError(e)
    }
}

impl From<ApiError> for RouterError {
    fn from(why: ApiError) -> Self {
        match why {
            ApiError::NoRoute { code, message } => {
                RouterError::NoRoute { code, message }
            }
            ApiError::RequestError(e) => RouterError::Transport(e),
            ApiError::InvalidResponse { .. } => {
                RouterError::MalformedResponse(why.to_string())
            }
            ApiError::GeometryError(e) => RouterError::Polyline(e),
            ApiError::DegenerateGeometry => {
                RouterError::MalformedResponse(why.to_string())
            }
        }
    }
}
