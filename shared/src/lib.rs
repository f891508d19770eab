use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Map camera: what the map is centered on and how far it is zoomed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl Camera {
    /// Starting position of the map, also the target of the recenter action.
    pub const HOME: Camera = Camera {
        center: GeoPoint::new(43.6607388, -79.3988062),
        zoom: 15,
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    /// Lower-case name used by the directions web service `mode` parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("origin must not be empty")]
    EmptyOrigin,
    #[error("destination must not be empty")]
    EmptyDestination,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub travel_mode: TravelMode,
    #[serde(default)]
    pub avoid_tolls: bool,
    /// Ask the service for every alternative instead of only its pick.
    #[serde(default)]
    pub alternatives: bool,
}

impl RouteQuery {
    /// Builds a query from raw field text, trimming both ends.
    ///
    /// An origin or destination that is empty after trimming is rejected
    /// before anything is sent to the routing service.
    pub fn new(
        origin: &str,
        destination: &str,
        travel_mode: TravelMode,
    ) -> Result<Self, ValidationError> {
        let origin = origin.trim();
        let destination = destination.trim();
        if origin.is_empty() {
            return Err(ValidationError::EmptyOrigin);
        }
        if destination.is_empty() {
            return Err(ValidationError::EmptyDestination);
        }
        Ok(Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            travel_mode,
            avoid_tolls: false,
            alternatives: false,
        })
    }

    pub fn avoiding_tolls(mut self, avoid_tolls: bool) -> Self {
        self.avoid_tolls = avoid_tolls;
        self
    }

    pub fn with_alternatives(mut self, alternatives: bool) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Re-checks a query that arrived over the wire.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Self::new(&self.origin, &self.destination, self.travel_mode).map(|_| ())
    }
}

/// Human readable text plus the raw value (meters or seconds).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub path: Vec<GeoPoint>,
    #[serde(default)]
    pub distance: TextValue,
    #[serde(default)]
    pub duration: TextValue,
    #[serde(default)]
    pub instructions: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub steps: Vec<RouteStep>,
    pub distance: TextValue,
    pub duration: TextValue,
    #[serde(default)]
    pub start_address: String,
    #[serde(default)]
    pub end_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub summary: String,
    pub legs: Vec<RouteLeg>,
    #[serde(default)]
    pub overview_path: Vec<GeoPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Route {
    pub fn first_leg(&self) -> Option<&RouteLeg> {
        self.legs.first()
    }

    /// Points to draw as the route line.
    ///
    /// Uses the overview path when the service sent one, otherwise the step
    /// paths of every leg joined in order.
    pub fn line_path(&self) -> Vec<GeoPoint> {
        if !self.overview_path.is_empty() {
            return self.overview_path.clone();
        }
        self.legs
            .iter()
            .flat_map(|leg| leg.steps.iter())
            .flat_map(|step| step.path.iter().copied())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResult {
    pub routes: Vec<Route>,
}

/// Browser-side map bootstrap settings served by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapsConfig {
    pub api_key: Option<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    Validation,
    NotFound,
    Upstream,
    Configuration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}
