use shared::{Camera, DirectionsResult, Route, RouteQuery, TravelMode};

use crate::error::AppError;
use crate::map::MapSurface;
use crate::overlay::{DisplayCircle, DisplayMarker, overlays_for};
use crate::sampler::sample_leg;

/// Tag attached to every dispatched route request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Computing(RequestId),
    Showing,
}

/// Which of the returned alternatives gets displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouteSelection {
    /// The service's own recommendation (first alternative).
    #[default]
    First,
    /// Smallest first-leg distance.
    Shortest,
    /// Smallest first-leg duration.
    Fastest,
}

impl RouteSelection {
    pub const ALL: [RouteSelection; 3] = [
        RouteSelection::First,
        RouteSelection::Shortest,
        RouteSelection::Fastest,
    ];

    pub fn key(self) -> &'static str {
        match self {
            RouteSelection::First => "first",
            RouteSelection::Shortest => "shortest",
            RouteSelection::Fastest => "fastest",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RouteSelection::First => "Recommended",
            RouteSelection::Shortest => "Shortest",
            RouteSelection::Fastest => "Fastest",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|selection| selection.key() == key)
    }

    /// Only the first alternative is needed for [`RouteSelection::First`].
    pub fn wants_alternatives(self) -> bool {
        self != RouteSelection::First
    }

    /// Picks a route among those having at least one leg. Ties keep the
    /// earlier alternative.
    pub fn select(self, routes: &[Route]) -> Option<&Route> {
        let mut candidates = routes.iter().filter(|route| route.first_leg().is_some());
        let metric = |route: &Route| -> f64 {
            let leg = route.first_leg().map(|leg| match self {
                RouteSelection::Shortest => leg.distance.value,
                _ => leg.duration.value,
            });
            leg.unwrap_or(f64::INFINITY)
        };
        match self {
            RouteSelection::First => candidates.next(),
            RouteSelection::Shortest | RouteSelection::Fastest => {
                candidates.fold(None, |best: Option<&Route>, route| match best {
                    Some(current) if metric(current) <= metric(route) => Some(current),
                    _ => Some(route),
                })
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub selected_route: Option<Route>,
    pub distance_text: String,
    pub duration_text: String,
    pub markers: Vec<DisplayMarker>,
    pub circles: Vec<DisplayCircle>,
}

/// Outcome of handing a route response to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Shown,
    Failed,
    /// A newer request was issued (or the session was reset) meanwhile.
    Stale,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    origin: String,
    destination: String,
    travel_mode: TravelMode,
    avoid_tolls: bool,
    selection: RouteSelection,
    phase: Phase,
    session: SessionState,
    notice: Option<AppError>,
    issued: u64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            travel_mode: TravelMode::Driving,
            avoid_tolls: false,
            selection: RouteSelection::First,
            phase: Phase::Idle,
            session: SessionState::default(),
            notice: None,
            issued: 0,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn avoid_tolls(&self) -> bool {
        self.avoid_tolls
    }

    pub fn selection(&self) -> RouteSelection {
        self.selection
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn notice(&self) -> Option<&AppError> {
        self.notice.as_ref()
    }

    pub fn is_computing(&self) -> bool {
        matches!(self.phase, Phase::Computing(_))
    }

    pub fn set_origin(&mut self, text: String) {
        self.origin = text;
    }

    pub fn set_destination(&mut self, text: String) {
        self.destination = text;
    }

    pub fn set_avoid_tolls(&mut self, avoid_tolls: bool) {
        self.avoid_tolls = avoid_tolls;
    }

    pub fn set_selection(&mut self, selection: RouteSelection) {
        self.selection = selection;
    }

    /// Validates the inputs and, when both are filled in, moves to
    /// `Computing` and returns the request to dispatch.
    ///
    /// Blank inputs leave the phase and the session untouched; only the
    /// notice changes. A submit while `Showing` keeps the current route on
    /// screen until the new response lands.
    pub fn submit(&mut self) -> Option<(RequestId, RouteQuery)> {
        let query = match RouteQuery::new(&self.origin, &self.destination, self.travel_mode) {
            Ok(query) => query
                .avoiding_tolls(self.avoid_tolls)
                .with_alternatives(self.selection.wants_alternatives()),
            Err(err) => {
                self.notice = Some(err.into());
                return None;
            }
        };

        self.issued += 1;
        let id = RequestId(self.issued);
        self.phase = Phase::Computing(id);
        self.notice = None;
        Some((id, query))
    }

    /// Applies the response for request `id` if it is the one currently
    /// awaited; anything else is dropped.
    pub fn apply_result(
        &mut self,
        id: RequestId,
        result: Result<DirectionsResult, AppError>,
    ) -> Applied {
        if self.phase != Phase::Computing(id) {
            return Applied::Stale;
        }

        let shown = result.and_then(|directions| {
            self.selection
                .select(&directions.routes)
                .cloned()
                .ok_or_else(|| AppError::Routing("no route found".into()))
        });

        match shown {
            Ok(route) => {
                self.session = session_for(route);
                self.phase = Phase::Showing;
                Applied::Shown
            }
            Err(err) => {
                self.session = SessionState::default();
                self.phase = Phase::Idle;
                self.notice = Some(err);
                Applied::Failed
            }
        }
    }

    /// Back to the initial idle state, inputs included. Any request still in
    /// flight is forgotten.
    pub fn reset(&mut self) {
        self.session = SessionState::default();
        self.phase = Phase::Idle;
        self.notice = None;
        self.origin.clear();
        self.destination.clear();
    }

    /// Records a failure that happened outside a route request, such as the
    /// map failing to load.
    pub fn report(&mut self, err: AppError) {
        self.notice = Some(err);
    }

    /// Pans the map back to its starting camera; route state is untouched.
    pub fn recenter(&self, map: &mut impl MapSurface) {
        map.set_camera(Camera::HOME);
    }

    /// Pushes the current route line and overlays to the map.
    pub fn sync_map(&self, map: &mut impl MapSurface) {
        let line = self.session.selected_route.as_ref().map(Route::line_path);
        map.show_route(line.as_deref());
        map.show_overlays(&self.session.markers, &self.session.circles);
    }
}

fn session_for(route: Route) -> SessionState {
    let (points, distance_text, duration_text) = match route.first_leg() {
        Some(leg) => (
            sample_leg(leg),
            display_text(&leg.distance.text, || format_distance(leg.distance.value)),
            display_text(&leg.duration.text, || format_duration(leg.duration.value)),
        ),
        None => (Vec::new(), String::new(), String::new()),
    };
    let (markers, circles) = overlays_for(&points);
    SessionState {
        selected_route: Some(route),
        distance_text,
        duration_text,
        markers,
        circles,
    }
}

fn display_text(text: &str, fallback: impl FnOnce() -> String) -> String {
    if text.trim().is_empty() {
        fallback()
    } else {
        text.to_string()
    }
}

fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.0} m")
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

fn format_duration(seconds: f64) -> String {
    let minutes = (seconds / 60.0).round() as u64;
    if minutes < 60 {
        plural(minutes, "min")
    } else {
        format!("{} {}", plural(minutes / 60, "hour"), plural(minutes % 60, "min"))
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
