use std::{error, fmt, sync::Arc};

use async_trait::async_trait;
use model::{route::RouteLeg, Coordinate};
use polyline::PolylineError;

/// Routing-service failure, as seen by the session. Adapter crates map
/// their transport/parsing errors onto these variants.
#[derive(Debug, Clone)]
pub enum RouterError {
    /// The service responded with a non-success status code.
    NoRoute {
        code: String,
        message: Option<String>,
    },
    /// The request itself failed (network, DNS, timeout).
    Transport(Arc<dyn error::Error + Send + Sync>),
    /// The response payload did not have the promised shape.
    MalformedResponse(String),
    /// The response geometry could not be decoded.
    Polyline(PolylineError),
}

impl RouterError {
    pub fn transport<E>(why: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        Self::Transport(Arc::new(why))
    }
}

impl error::Error for RouterError {}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RouterError::NoRoute { code, message } => match message {
                Some(text) => write!(f, "service reported no route ({code}): {text}"),
                None => write!(f, "service reported no route ({code})"),
            },
            RouterError::Transport(why) => write!(f, "transport error: {why}"),
            RouterError::MalformedResponse(why) => {
                write!(f, "malformed response: {why}")
            }
            RouterError::Polyline(why) => write!(f, "geometry decode error: {why}"),
        }
    }
}

impl From<PolylineError> for RouterError {
    fn from(why: PolylineError) -> Self {
        RouterError::Polyline(why)
    }
}

/// An asynchronous routing service. The session treats implementations as a
/// black box: two waypoints in, an ordered path with metadata out.
#[async_trait]
pub trait Router: Send + Sync {
    /// Computes a driving route from `start` to `end`.
    async fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteLeg, RouterError>;

    /// Routes along a pre-supplied compressed geometry, returning the
    /// service's road-matched path for it.
    async fn route_encoded(&self, encoded: &str) -> Result<RouteLeg, RouterError>;
}
