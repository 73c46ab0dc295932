use std::{error, fmt, sync::Arc};

use model::WaypointRole;

pub mod animation;
pub mod export;
pub mod geofence;
pub mod router;
pub mod session;
pub mod state;

pub use router::{Router, RouterError};
pub use session::{RouteOutcome, RouteTicket, Session};
pub use state::InteractionState;

/// Failure of a host-facing command. Every failure is recovered at the
/// command boundary: session state is left unchanged and the error is
/// surfaced for user-visible reporting.
#[derive(Debug, Clone)]
pub enum CommandError {
    /// A route was requested before both endpoints were placed.
    MissingWaypoint(WaypointRole),
    /// The routing service answered but reported no usable path.
    RouteUnavailable {
        code: String,
        message: Option<String>,
    },
    /// The network call itself failed.
    Transport(Arc<dyn error::Error + Send + Sync>),
    /// The service payload could not be parsed or decoded.
    MalformedResponse(String),
    /// An export was invoked with zero qualifying shapes. A notice rather
    /// than a hard failure; nothing was appended.
    EmptyShapeSet,
    /// A route-dependent command was invoked while no route is present.
    NoRoute,
}

impl error::Error for CommandError {}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommandError::MissingWaypoint(role) => {
                write!(f, "the {role} waypoint has not been placed")
            }
            CommandError::RouteUnavailable { code, message } => match message {
                Some(text) => write!(f, "no route available ({code}): {text}"),
                None => write!(f, "no route available ({code})"),
            },
            CommandError::Transport(why) => {
                write!(f, "routing service unreachable: {why}")
            }
            CommandError::MalformedResponse(why) => {
                write!(f, "malformed routing response: {why}")
            }
            CommandError::EmptyShapeSet => {
                write!(f, "no qualifying shapes to save")
            }
            CommandError::NoRoute => write!(f, "no route is present"),
        }
    }
}

impl From<RouterError> for CommandError {
    fn from(why: RouterError) -> Self {
        match why {
            RouterError::NoRoute { code, message } => {
                CommandError::RouteUnavailable { code, message }
            }
            RouterError::Transport(why) => CommandError::Transport(why),
            RouterError::MalformedResponse(why) => {
                CommandError::MalformedResponse(why)
            }
            RouterError::Polyline(why) => {
                CommandError::MalformedResponse(why.to_string())
            }
        }
    }
}

pub type CommandResult<O> = Result<O, CommandError>;
