use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::Request,
    routing::get,
};
use backend::{
    AppState, create_router,
    directions::{DirectionsProvider, GoogleDirections},
    error::RouteError,
};
use hyper::StatusCode;
use serde_json::json;
use shared::{
    ApiError, ApiErrorKind, DirectionsResult, GeoPoint, MapsConfig, Route, RouteLeg, RouteQuery,
    RouteStep, TextValue,
};
use tower::ServiceExt;

struct MockDirections {
    result: Option<DirectionsResult>,
}

impl DirectionsProvider for MockDirections {
    async fn compute_route(&self, _query: &RouteQuery) -> Result<DirectionsResult, RouteError> {
        self.result
            .clone()
            .ok_or_else(|| RouteError::NoRoute("ZERO_RESULTS".into()))
    }
}

fn sample_result() -> DirectionsResult {
    let step = |n: usize| RouteStep {
        path: (0..n)
            .map(|i| GeoPoint::new(43.66 + i as f64 * 0.001, -79.39))
            .collect(),
        ..Default::default()
    };
    DirectionsResult {
        routes: vec![Route {
            summary: "Spadina Ave".into(),
            legs: vec![RouteLeg {
                steps: vec![step(3), step(11)],
                distance: TextValue {
                    text: "3.4 km".into(),
                    value: 3400.0,
                },
                duration: TextValue {
                    text: "11 mins".into(),
                    value: 660.0,
                },
                ..Default::default()
            }],
            ..Default::default()
        }],
    }
}

fn maps_config() -> MapsConfig {
    MapsConfig {
        api_key: Some("test-key".into()),
        libraries: vec!["places".into()],
    }
}

fn test_app(result: Option<DirectionsResult>) -> Router {
    create_router(AppState::new(MockDirections { result }, maps_config()))
}

fn route_request(payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/route")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn route_endpoint_returns_directions() {
    let app = test_app(Some(sample_result()));
    let payload = json!({"origin": "A", "destination": "B", "travel_mode": "DRIVING"});

    let response = app.oneshot(route_request(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: DirectionsResult = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, sample_result());
}

#[tokio::test]
async fn blank_fields_are_rejected() {
    for payload in [
        json!({"origin": "", "destination": "B"}),
        json!({"origin": "A", "destination": "  "}),
    ] {
        let response = test_app(Some(sample_result()))
            .oneshot(route_request(payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let body: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.kind, ApiErrorKind::Validation);
    }
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = test_app(None)
        .oneshot(route_request(json!({"origin": "A", "destination": "Atlantis"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: ApiError = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.kind, ApiErrorKind::NotFound);
}

#[tokio::test]
async fn missing_key_is_configuration_error() {
    let provider = GoogleDirections::new("http://127.0.0.1:9", None, Duration::from_secs(1)).unwrap();
    let app = create_router(AppState::new(provider, MapsConfig::default()));

    let response = app
        .oneshot(route_request(json!({"origin": "A", "destination": "B"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: ApiError = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.kind, ApiErrorKind::Configuration);
}

#[tokio::test]
async fn config_endpoint_exposes_maps_settings() {
    let request = Request::builder()
        .uri("/api/config")
        .body(Body::empty())
        .unwrap();
    let response = test_app(None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: MapsConfig = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, maps_config());
}

#[tokio::test]
async fn google_provider_decodes_upstream_response() {
    let upstream = Router::new().route(
        "/directions",
        get(|| async {
            axum::Json(json!({
                "status": "OK",
                "routes": [{
                    "summary": "Bloor St",
                    "legs": [{
                        "distance": {"text": "2.0 km", "value": 2000},
                        "duration": {"text": "6 mins", "value": 360},
                        "steps": [{
                            "html_instructions": "Head <b>west</b>",
                            "polyline": {"points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@"}
                        }]
                    }]
                }]
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    let provider = GoogleDirections::new(
        format!("http://{addr}/directions"),
        Some("test-key".into()),
        Duration::from_secs(5),
    )
    .unwrap();
    let query = RouteQuery::new("A", "B", shared::TravelMode::Driving).unwrap();
    let result = provider.compute_route(&query).await.unwrap();

    let leg = result.routes[0].first_leg().unwrap();
    assert_eq!(leg.distance.text, "2.0 km");
    assert_eq!(leg.steps[0].path.len(), 3);
    assert_eq!(leg.steps[0].instructions, "Head west");
}

#[tokio::test]
async fn health_check_answers_ok() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = test_app(None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
