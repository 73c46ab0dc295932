use indexmap::IndexMap;
use model::{
    feature::{Feature, FeatureCollection},
    geofence::GeofencePolygon,
    route::{ComputedRoute, RouteLeg},
    shape::{DrawnShape, PolylineFeature},
    Coordinate, Waypoint, WaypointRole,
};
use tokio::sync::watch;
use utility::id::{Id, IdSequence};

use crate::{
    animation::DashAnimation,
    export, geofence,
    router::{Router, RouterError},
    state::InteractionState,
    CommandError, CommandResult,
};

/// A numbered in-flight route request. Only the most recently issued ticket
/// is authoritative; results delivered against an older ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteTicket {
    sequence: u64,
    pub start: Coordinate,
    pub end: Coordinate,
}

/// What happened to a delivered route result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The result belonged to the latest request and replaced the route.
    Applied,
    /// A newer request was begun in the meantime; the result was dropped.
    Stale,
}

/// The whole interactive session: waypoints, the active route, committed
/// geofences and polylines, the interaction state and the route animation.
///
/// All command handlers run synchronously on the owner; the only suspending
/// operation is the routing call, which runs between `begin_route_request`
/// and `apply_route_result` (or inside the composed `calculate_route`).
#[derive(Debug)]
pub struct Session {
    state: InteractionState,
    start_point: Option<Waypoint>,
    end_point: Option<Waypoint>,
    route: Option<ComputedRoute>,
    geofences: IndexMap<Id<GeofencePolygon>, GeofencePolygon>,
    polylines: IndexMap<Id<PolylineFeature>, PolylineFeature>,
    geofence_ids: IdSequence,
    polyline_ids: IdSequence,
    route_requests: u64,
    animation: Option<DashAnimation>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: InteractionState::default(),
            start_point: None,
            end_point: None,
            route: None,
            geofences: IndexMap::new(),
            polylines: IndexMap::new(),
            geofence_ids: IdSequence::new("geofence"),
            polyline_ids: IdSequence::new("polyline"),
            route_requests: 0,
            animation: None,
        }
    }

    /* interaction */

    /// Arms the next map click to place the `role` endpoint. Selecting again
    /// before clicking simply re-arms; last selection wins.
    pub fn select_role(&mut self, role: WaypointRole) {
        log::debug!("awaiting map click for {role} point");
        self.state.select_role(role);
    }

    /// Feeds one map click to the session. If a role was selected, the click
    /// places (or replaces) that waypoint and the returned value is the
    /// placed waypoint; an unarmed click is ignored.
    pub fn consume_click(&mut self, position: Coordinate) -> Option<Waypoint> {
        let role = self.state.consume_click()?;
        let waypoint = Waypoint::new(role, position);
        log::info!(
            "placed {role} point at ({}, {})",
            position.latitude,
            position.longitude
        );
        *self.slot_mut(role) = Some(waypoint);
        Some(waypoint)
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.state
    }

    pub fn waypoint(&self, role: WaypointRole) -> Option<&Waypoint> {
        match role {
            WaypointRole::Start => self.start_point.as_ref(),
            WaypointRole::End => self.end_point.as_ref(),
        }
    }

    fn slot_mut(&mut self, role: WaypointRole) -> &mut Option<Waypoint> {
        match role {
            WaypointRole::Start => &mut self.start_point,
            WaypointRole::End => &mut self.end_point,
        }
    }

    /* routing */

    /// Validates the endpoints and issues a ticket for a route request.
    /// Issuing a ticket invalidates any request still in flight.
    pub fn begin_route_request(&mut self) -> CommandResult<RouteTicket> {
        let start = self
            .waypoint(WaypointRole::Start)
            .ok_or(CommandError::MissingWaypoint(WaypointRole::Start))?
            .position;
        let end = self
            .waypoint(WaypointRole::End)
            .ok_or(CommandError::MissingWaypoint(WaypointRole::End))?
            .position;
        Ok(RouteTicket {
            sequence: self.next_request_sequence(),
            start,
            end,
        })
    }

    /// Delivers the completion of the request identified by `ticket`.
    ///
    /// Results for a superseded ticket are dropped ([`RouteOutcome::Stale`]).
    /// A failure leaves the previous route untouched; on success the route
    /// is replaced wholesale and crossed geofences are reported in the log.
    pub fn apply_route_result(
        &mut self,
        ticket: &RouteTicket,
        result: Result<RouteLeg, RouterError>,
    ) -> CommandResult<RouteOutcome> {
        self.finish_route_request(ticket.sequence, result)
    }

    /// Computes a route between the placed endpoints, replacing the current
    /// one. For hosts that interleave UI events with in-flight requests,
    /// use `begin_route_request` / `apply_route_result` instead.
    pub async fn calculate_route<R>(
        &mut self,
        router: &R,
    ) -> CommandResult<&ComputedRoute>
    where
        R: Router + ?Sized,
    {
        let ticket = self.begin_route_request()?;
        let result = router.route(ticket.start, ticket.end).await;
        self.apply_route_result(&ticket, result)?;
        self.route.as_ref().ok_or(CommandError::NoRoute)
    }

    /// Routes along a pre-supplied compressed geometry and installs the
    /// result under the same replacement contract as `calculate_route`.
    /// Does not require waypoints.
    pub async fn load_predefined_route<R>(
        &mut self,
        router: &R,
        encoded: &str,
    ) -> CommandResult<&ComputedRoute>
    where
        R: Router + ?Sized,
    {
        let sequence = self.next_request_sequence();
        let result = router.route_encoded(encoded).await;
        self.finish_route_request(sequence, result)?;
        self.route.as_ref().ok_or(CommandError::NoRoute)
    }

    fn next_request_sequence(&mut self) -> u64 {
        self.route_requests += 1;
        self.route_requests
    }

    fn finish_route_request(
        &mut self,
        sequence: u64,
        result: Result<RouteLeg, RouterError>,
    ) -> CommandResult<RouteOutcome> {
        if sequence != self.route_requests {
            log::debug!(
                "dropping stale route result {sequence} (latest is {})",
                self.route_requests
            );
            return Ok(RouteOutcome::Stale);
        }

        let leg = result.map_err(CommandError::from)?;
        let computed = ComputedRoute::from_leg(leg);
        log::info!(
            "route replaced: {} points, {:.1} km",
            computed.path.points().len(),
            computed.distance_km
        );
        for fence in geofence::crossed_fences(&computed.path, self.geofences.values())
        {
            log::warn!("route crosses {}", fence.name);
        }
        self.route = Some(computed);
        Ok(RouteOutcome::Applied)
    }

    pub fn route(&self) -> Option<&ComputedRoute> {
        self.route.as_ref()
    }

    /// The geofences the active route crosses, in commit order. Empty when
    /// no route is present.
    pub fn crossed_fences(&self) -> Vec<&GeofencePolygon> {
        match &self.route {
            Some(route) => {
                geofence::crossed_fences(&route.path, self.geofences.values())
            }
            None => Vec::new(),
        }
    }

    /* drawn shapes */

    /// Commits the polygon-shaped drawings as geofences and returns this
    /// batch as a feature collection. With no qualifying shape the command
    /// reports [`CommandError::EmptyShapeSet`] and nothing changes.
    pub fn save_geofences(
        &mut self,
        shapes: &[DrawnShape],
    ) -> CommandResult<FeatureCollection> {
        let features = export::commit_geofences(
            shapes,
            &mut self.geofences,
            &mut self.geofence_ids,
        );
        if features.is_empty() {
            return Err(CommandError::EmptyShapeSet);
        }
        log::info!("saved {} geofence(s)", features.len());
        Ok(FeatureCollection::new(features))
    }

    /// Commits the polyline-shaped drawings with computed geodesic lengths.
    /// Same contract as [`Session::save_geofences`].
    pub fn save_polylines(
        &mut self,
        shapes: &[DrawnShape],
    ) -> CommandResult<FeatureCollection> {
        let features = export::commit_polylines(
            shapes,
            &mut self.polylines,
            &mut self.polyline_ids,
        );
        if features.is_empty() {
            return Err(CommandError::EmptyShapeSet);
        }
        log::info!("saved {} polyline(s)", features.len());
        Ok(FeatureCollection::new(features))
    }

    pub fn geofences(&self) -> &IndexMap<Id<GeofencePolygon>, GeofencePolygon> {
        &self.geofences
    }

    pub fn polyline_features(
        &self,
    ) -> &IndexMap<Id<PolylineFeature>, PolylineFeature> {
        &self.polylines
    }

    /// The whole committed geofence collection as one feature collection,
    /// as handed to the host for display or download.
    pub fn geofences_feature_collection(&self) -> FeatureCollection {
        FeatureCollection::new(
            self.geofences
                .iter()
                .map(|(id, fence)| Feature::from_geofence(id, fence))
                .collect(),
        )
    }

    /* animation */

    /// Starts the dash animation for the active route, cancelling any prior
    /// animation first so only one loop is ever alive. Returns the offset
    /// channel the host's renderer should observe.
    pub fn start_route_animation(&mut self) -> CommandResult<watch::Receiver<f64>> {
        if self.route.is_none() {
            return Err(CommandError::NoRoute);
        }
        self.stop_route_animation();
        let animation = DashAnimation::start();
        let offset = animation.offset();
        self.animation = Some(animation);
        Ok(offset)
    }

    pub fn stop_route_animation(&mut self) {
        if let Some(animation) = self.animation.take() {
            animation.stop();
        }
    }

    pub fn animation_running(&self) -> bool {
        self.animation.is_some()
    }

    /* clearing */

    /// Discards the active route and stops its animation. Waypoints and
    /// committed shapes stay.
    pub fn clear_route(&mut self) {
        self.stop_route_animation();
        if self.route.take().is_some() {
            log::info!("route cleared");
        }
    }

    /// Returns the session to its initial configuration: idle interaction
    /// state, no waypoints, no route, no committed shapes. Id sequences are
    /// not rewound; ids stay unique for the process lifetime.
    pub fn clear_all(&mut self) {
        self.clear_route();
        self.state = InteractionState::Idle;
        self.start_point = None;
        self.end_point = None;
        self.geofences.clear();
        self.polylines.clear();
        log::info!("session cleared");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Duration;
    use model::route::RoutePath;

    use super::*;

    /// Scripted router: returns a fixed diagonal leg and counts calls.
    struct FixedRouter {
        calls: AtomicUsize,
    }

    impl FixedRouter {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn leg() -> RouteLeg {
            RouteLeg {
                path: RoutePath::new(vec![
                    Coordinate::new(0.0, 0.0),
                    Coordinate::new(10.0, 10.0),
                ])
                .unwrap(),
                distance_km: 1565.1,
                duration: Duration::seconds(3600),
            }
        }
    }

    #[async_trait]
    impl Router for FixedRouter {
        async fn route(
            &self,
            _start: Coordinate,
            _end: Coordinate,
        ) -> Result<RouteLeg, RouterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Self::leg())
        }

        async fn route_encoded(
            &self,
            _encoded: &str,
        ) -> Result<RouteLeg, RouterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Self::leg())
        }
    }

    fn place_endpoints(session: &mut Session) {
        session.select_role(WaypointRole::Start);
        session.consume_click(Coordinate::new(0.0, 0.0));
        session.select_role(WaypointRole::End);
        session.consume_click(Coordinate::new(10.0, 10.0));
    }

    fn triangle() -> DrawnShape {
        DrawnShape::Polygon(vec![
            Coordinate::new(4.0, 4.0),
            Coordinate::new(4.0, 6.0),
            Coordinate::new(6.0, 6.0),
        ])
    }

    #[test]
    fn unarmed_clicks_are_ignored() {
        let mut session = Session::new();
        assert_eq!(session.consume_click(Coordinate::new(1.0, 1.0)), None);
        assert!(session.waypoint(WaypointRole::Start).is_none());
        assert!(session.waypoint(WaypointRole::End).is_none());
    }

    #[test]
    fn second_click_after_one_selection_is_ignored() {
        let mut session = Session::new();
        session.select_role(WaypointRole::Start);
        session.consume_click(Coordinate::new(1.0, 1.0));
        session.consume_click(Coordinate::new(2.0, 2.0));

        let start = session.waypoint(WaypointRole::Start).unwrap();
        assert_eq!(start.position, Coordinate::new(1.0, 1.0));
    }

    #[test]
    fn replacing_a_waypoint_supersedes_the_prior_one() {
        let mut session = Session::new();
        session.select_role(WaypointRole::Start);
        session.consume_click(Coordinate::new(1.0, 1.0));
        session.select_role(WaypointRole::Start);
        session.consume_click(Coordinate::new(2.0, 2.0));

        let start = session.waypoint(WaypointRole::Start).unwrap();
        assert_eq!(start.position, Coordinate::new(2.0, 2.0));
        assert!(session.waypoint(WaypointRole::End).is_none());
    }

    #[tokio::test]
    async fn route_with_missing_endpoint_calls_no_router() {
        let mut session = Session::new();
        session.select_role(WaypointRole::Start);
        session.consume_click(Coordinate::new(0.0, 0.0));

        let router = FixedRouter::new();
        let error = session.calculate_route(&router).await.unwrap_err();
        assert!(matches!(
            error,
            CommandError::MissingWaypoint(WaypointRole::End)
        ));
        assert_eq!(router.calls.load(Ordering::SeqCst), 0);
        assert!(session.route().is_none());
    }

    #[tokio::test]
    async fn successful_route_is_installed() {
        let mut session = Session::new();
        place_endpoints(&mut session);

        let router = FixedRouter::new();
        let route = session.calculate_route(&router).await.unwrap();
        assert_eq!(route.path.points().len(), 2);
        assert_eq!(router.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_route_keeps_the_previous_one() {
        let mut session = Session::new();
        place_endpoints(&mut session);
        let router = FixedRouter::new();
        session.calculate_route(&router).await.unwrap();

        let ticket = session.begin_route_request().unwrap();
        let error = session
            .apply_route_result(
                &ticket,
                Err(RouterError::NoRoute {
                    code: "NoRoute".to_owned(),
                    message: None,
                }),
            )
            .unwrap_err();
        assert!(matches!(error, CommandError::RouteUnavailable { .. }));
        assert!(session.route().is_some());
    }

    #[test]
    fn stale_route_results_are_dropped() {
        let mut session = Session::new();
        place_endpoints(&mut session);

        let superseded = session.begin_route_request().unwrap();
        let latest = session.begin_route_request().unwrap();

        let outcome = session
            .apply_route_result(&superseded, Ok(FixedRouter::leg()))
            .unwrap();
        assert_eq!(outcome, RouteOutcome::Stale);
        assert!(session.route().is_none());

        let outcome = session
            .apply_route_result(&latest, Ok(FixedRouter::leg()))
            .unwrap();
        assert_eq!(outcome, RouteOutcome::Applied);
        assert!(session.route().is_some());
    }

    #[tokio::test]
    async fn crossed_fences_are_reported_for_the_active_route() {
        let mut session = Session::new();
        session.save_geofences(&[triangle()]).unwrap();
        place_endpoints(&mut session);

        let router = FixedRouter::new();
        session.calculate_route(&router).await.unwrap();

        let crossed = session.crossed_fences();
        assert_eq!(crossed.len(), 1);
        assert_eq!(crossed[0].name, "Geofence 1");
    }

    #[test]
    fn saving_without_qualifying_shapes_is_a_notice() {
        let mut session = Session::new();
        let error = session.save_geofences(&[]).unwrap_err();
        assert!(matches!(error, CommandError::EmptyShapeSet));
        assert!(session.geofences().is_empty());
    }

    #[test]
    fn geofence_collection_accumulates_across_saves() {
        let mut session = Session::new();
        session.save_geofences(&[triangle()]).unwrap();
        session.save_geofences(&[triangle()]).unwrap();

        let collection = session.geofences_feature_collection();
        assert_eq!(collection.features().len(), 2);
        assert_eq!(collection.features()[1].properties().id, "geofence_2");
    }

    #[tokio::test]
    async fn animation_needs_a_route_and_restarts_cleanly() {
        let mut session = Session::new();
        assert!(matches!(
            session.start_route_animation().unwrap_err(),
            CommandError::NoRoute
        ));

        place_endpoints(&mut session);
        session.calculate_route(&FixedRouter::new()).await.unwrap();

        let _first = session.start_route_animation().unwrap();
        let _second = session.start_route_animation().unwrap();
        assert!(session.animation_running());

        session.clear_route();
        assert!(!session.animation_running());
        assert!(session.route().is_none());
    }

    #[tokio::test]
    async fn clear_all_resets_the_session_but_not_the_id_sequences() {
        let mut session = Session::new();
        place_endpoints(&mut session);
        session.calculate_route(&FixedRouter::new()).await.unwrap();
        session.save_geofences(&[triangle()]).unwrap();

        session.clear_all();
        assert_eq!(session.interaction_state(), InteractionState::Idle);
        assert!(session.waypoint(WaypointRole::Start).is_none());
        assert!(session.waypoint(WaypointRole::End).is_none());
        assert!(session.route().is_none());
        assert!(session.geofences().is_empty());

        // Ids keep counting up so they stay unique for the process lifetime.
        let collection = session.save_geofences(&[triangle()]).unwrap();
        assert_eq!(collection.features()[0].properties().id, "geofence_2");
        assert_eq!(collection.features()[0].properties().name, "Geofence 1");
    }

    #[tokio::test]
    async fn predefined_route_needs_no_waypoints() {
        let mut session = Session::new();
        let router = FixedRouter::new();
        let route = session
            .load_predefined_route(&router, "_p~iF~ps|U_ulLnnqC")
            .await
            .unwrap();
        assert_eq!(route.path.points().len(), 2);
    }
}
