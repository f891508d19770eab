use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::Deserialize;
use shared::{DirectionsResult, Route, RouteLeg, RouteQuery, RouteStep, TextValue};

use crate::{error::RouteError, polyline};

pub const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Source of driving directions for a query.
///
/// Production code talks to the mapping service over HTTP
/// ([`GoogleDirections`]); tests plug in canned implementations.
pub trait DirectionsProvider: Send + Sync {
    /// Computes the route alternatives between the query's origin and
    /// destination. An empty alternative list is reported as
    /// [`RouteError::NoRoute`], never as `Ok`.
    fn compute_route(
        &self,
        query: &RouteQuery,
    ) -> impl Future<Output = Result<DirectionsResult, RouteError>> + Send;
}

pub struct GoogleDirections {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleDirections {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RouteError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn query_params<'a>(&self, query: &'a RouteQuery, key: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![
            ("origin", query.origin.as_str()),
            ("destination", query.destination.as_str()),
            ("mode", query.travel_mode.as_param()),
            ("key", key),
        ];
        if query.avoid_tolls {
            params.push(("avoid", "tolls"));
        }
        if query.alternatives {
            params.push(("alternatives", "true"));
        }
        params
    }
}

impl DirectionsProvider for GoogleDirections {
    async fn compute_route(&self, query: &RouteQuery) -> Result<DirectionsResult, RouteError> {
        let key = self.api_key.as_deref().ok_or(RouteError::MissingApiKey)?;
        tracing::debug!(
            origin = %query.origin,
            destination = %query.destination,
            mode = query.travel_mode.as_param(),
            "calling directions service"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query_params(query, key))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(%status, body = %body, "directions service returned non-success status");
            return Err(RouteError::Upstream {
                status: status.to_string(),
                message: body,
            });
        }

        parse_directions(&body)
    }
}

#[derive(Deserialize)]
struct WireResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<WireRoute>,
}

#[derive(Deserialize)]
struct WireRoute {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    legs: Vec<WireLeg>,
    #[serde(default)]
    overview_polyline: Option<WirePolyline>,
    #[serde(default)]
    warnings: Vec<String>,
}

#[derive(Deserialize)]
struct WireLeg {
    #[serde(default)]
    distance: TextValue,
    #[serde(default)]
    duration: TextValue,
    #[serde(default)]
    start_address: String,
    #[serde(default)]
    end_address: String,
    #[serde(default)]
    steps: Vec<WireStep>,
}

#[derive(Deserialize)]
struct WireStep {
    #[serde(default)]
    distance: TextValue,
    #[serde(default)]
    duration: TextValue,
    #[serde(default)]
    html_instructions: String,
    polyline: WirePolyline,
}

#[derive(Deserialize)]
struct WirePolyline {
    points: String,
}

/// Converts a directions service JSON body into the shared route model,
/// decoding every step polyline into its point path.
pub fn parse_directions(body: &str) -> Result<DirectionsResult, RouteError> {
    let wire: WireResponse = serde_json::from_str(body)?;
    let message = wire.error_message.unwrap_or_else(|| wire.status.clone());

    match wire.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => return Err(RouteError::NoRoute(message)),
        _ => {
            return Err(RouteError::Upstream {
                status: wire.status,
                message,
            });
        }
    }

    let routes = wire
        .routes
        .into_iter()
        .map(convert_route)
        .collect::<Result<Vec<_>, _>>()?;
    if routes.is_empty() {
        return Err(RouteError::NoRoute("service returned no routes".into()));
    }

    Ok(DirectionsResult { routes })
}

fn convert_route(route: WireRoute) -> Result<Route, RouteError> {
    let overview_path = match route.overview_polyline {
        Some(line) => polyline::decode(&line.points)?,
        None => Vec::new(),
    };
    let legs = route
        .legs
        .into_iter()
        .map(convert_leg)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route {
        summary: route.summary,
        legs,
        overview_path,
        warnings: route.warnings,
    })
}

fn convert_leg(leg: WireLeg) -> Result<RouteLeg, RouteError> {
    let steps = leg
        .steps
        .into_iter()
        .map(|step| {
            Ok(RouteStep {
                path: polyline::decode(&step.polyline.points)?,
                distance: step.distance,
                duration: step.duration,
                instructions: strip_html(&step.html_instructions),
            })
        })
        .collect::<Result<Vec<_>, RouteError>>()?;

    Ok(RouteLeg {
        steps,
        distance: leg.distance,
        duration: leg.duration,
        start_address: leg.start_address,
        end_address: leg.end_address,
    })
}

/// Drops markup from step instructions (`Turn <b>left</b>` -> `Turn left`).
///
/// Block-level tags (`div`, `br`, `p`) become a word separator; inline tags
/// vanish without leaving a space.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut tag: Option<String> = None;
    for ch in html.chars() {
        match tag.take() {
            None if ch == '<' => tag = Some(String::new()),
            None => text.push(ch),
            Some(name) if ch == '>' => {
                if is_block_tag(&name) && !text.ends_with(' ') {
                    text.push(' ');
                }
            }
            Some(mut name) => {
                name.push(ch);
                tag = Some(name);
            }
        }
    }
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_block_tag(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default();
    ["div", "br", "p"]
        .iter()
        .any(|block| name.eq_ignore_ascii_case(block))
}
