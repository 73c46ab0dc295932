use async_trait::async_trait;
use model::{route::RouteLeg, Coordinate};
use route_manager::{Router, RouterError};

use crate::{ApiError, RouteResponse};

pub const OSRM_API_URL: &str = "https://router.project-osrm.org";

/// Client for the OSRM v5 route service.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    base_url: String,
    profile: String,
    client: reqwest::Client,
}

impl Default for OsrmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OsrmClient {
    /// Client against the public OSRM demo server, driving profile.
    pub fn new() -> Self {
        Self::with_base_url(OSRM_API_URL)
    }

    /// Client against a custom deployment (or a test server).
    pub fn with_base_url<S>(base_url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            base_url: base_url.into(),
            profile: "driving".to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch a driving route between two waypoints.
    pub async fn fetch_driving_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteLeg, ApiError> {
        // OSRM coordinates go {lon},{lat}.
        let coordinates = format!(
            "{},{};{},{}",
            start.longitude, start.latitude, end.longitude, end.latitude
        );
        self.fetch_route(&coordinates).await
    }

    /// Fetch the road-matched route along a pre-supplied compressed
    /// geometry, using OSRM's `polyline(...)` coordinate form.
    pub async fn fetch_encoded_route(
        &self,
        encoded: &str,
    ) -> Result<RouteLeg, ApiError> {
        let coordinates = format!("polyline({})", percent_encode(encoded));
        self.fetch_route(&coordinates).await
    }

    async fn fetch_route(&self, coordinates: &str) -> Result<RouteLeg, ApiError> {
        let url = format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline",
            self.base_url, self.profile, coordinates
        );
        log::debug!("requesting route from '{url}'");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::OK {
            let payload: RouteResponse = response.json().await?;
            return payload.into_leg();
        }

        // Routing failures come back as 4xx with the same JSON envelope.
        match response.json::<RouteResponse>().await {
            Ok(payload) => Err(ApiError::NoRoute {
                code: payload.code,
                message: payload.message,
            }),
            Err(_) => Err(ApiError::InvalidResponse {
                status_code: status,
                url,
            }),
        }
    }
}

#[async_trait]
impl Router for OsrmClient {
    async fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteLeg, RouterError> {
        self.fetch_driving_route(start, end)
            .await
            .map_err(RouterError::from)
    }

    async fn route_encoded(&self, encoded: &str) -> Result<RouteLeg, RouterError> {
        self.fetch_encoded_route(encoded)
            .await
            .map_err(RouterError::from)
    }
}

/// Percent-encodes a string for use inside a URL path segment, keeping the
/// same unreserved set browsers use. Compressed polylines routinely contain
/// `?`, `|` and backticks, so this is not optional.
fn percent_encode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}
