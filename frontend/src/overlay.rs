use serde::Serialize;
use shared::GeoPoint;

/// Radius of the circle drawn around each sampled point, in meters.
pub const CIRCLE_RADIUS_METERS: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayMarker {
    pub position: GeoPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleStyle {
    pub stroke_color: &'static str,
    pub stroke_opacity: f64,
    pub stroke_weight: f64,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
}

impl CircleStyle {
    pub const TRANSLUCENT_RED: CircleStyle = CircleStyle {
        stroke_color: "#FF0000",
        stroke_opacity: 0.3,
        stroke_weight: 1.0,
        fill_color: "#FF0000",
        fill_opacity: 0.3,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCircle {
    pub center: GeoPoint,
    pub radius_meters: f64,
    pub style: CircleStyle,
}

/// Builds the index-aligned marker and circle lists for a set of points.
pub fn overlays_for(points: &[GeoPoint]) -> (Vec<DisplayMarker>, Vec<DisplayCircle>) {
    points
        .iter()
        .map(|&position| {
            (
                DisplayMarker { position },
                DisplayCircle {
                    center: position,
                    radius_meters: CIRCLE_RADIUS_METERS,
                    style: CircleStyle::TRANSLUCENT_RED,
                },
            )
        })
        .unzip()
}
