pub mod controller;
pub mod error;
pub mod map;
pub mod overlay;
pub mod sampler;

use seed::{prelude::*, virtual_dom::AtValue, *};
use serde::Deserialize;
use shared::{ApiError, ApiErrorKind, Camera, DirectionsResult, MapsConfig, RouteQuery};
use wasm_bindgen::{JsCast, prelude::wasm_bindgen};

use crate::controller::{Applied, InteractionController, RequestId, RouteSelection};
use crate::error::AppError;
use crate::map::{JsMap, bind_autocomplete, load_sdk};

const MAP_ELEMENT_ID: &str = "map";
const ORIGIN_INPUT_ID: &str = "origin-input";
const DESTINATION_INPUT_ID: &str = "destination-input";

fn api_root() -> String {
    if let Some(url) = option_env!("FRONTEND_API_ROOT") {
        return url.trim_end_matches('/').to_string();
    }
    "http://localhost:8080".to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapStatus {
    Loading,
    Ready,
    Failed(AppError),
}

pub struct Model {
    controller: InteractionController,
    status: MapStatus,
    map: Option<JsMap>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceChanged {
    field: String,
    value: String,
}

pub enum Msg {
    ConfigFetched(Result<MapsConfig, AppError>),
    MapsReady,
    MapsFailed(String),
    OriginChanged(String),
    DestinationChanged(String),
    PlaceChanged(PlaceChanged),
    AvoidTollsToggled,
    SelectionChanged(String),
    Submit,
    Reset,
    Recenter,
    RouteFetched {
        id: RequestId,
        result: Result<DirectionsResult, AppError>,
    },
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("maps-ready"), |_| {
        Msg::MapsReady
    }));
    orders.stream(streams::window_event(Ev::from("maps-error"), |event| {
        let reason = custom_detail::<String>(event).unwrap_or_else(|| "unknown error".into());
        Msg::MapsFailed(reason)
    }));
    orders.stream(streams::window_event(Ev::from("place-changed"), |event| {
        custom_detail::<PlaceChanged>(event).map(Msg::PlaceChanged)
    }));
    orders.perform_cmd(fetch_config());

    Model {
        controller: InteractionController::new(),
        status: MapStatus::Loading,
        map: None,
    }
}

fn custom_detail<T: for<'de> Deserialize<'de>>(event: web_sys::Event) -> Option<T> {
    let event = event.dyn_into::<web_sys::CustomEvent>().ok()?;
    serde_wasm_bindgen::from_value(event.detail()).ok()
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::ConfigFetched(Ok(config)) => match status_after_config(&config) {
            Some(status) => model.status = status,
            None => {
                if let Some(key) = config.api_key.as_deref() {
                    load_sdk(key, &config.libraries);
                }
            }
        },
        Msg::ConfigFetched(Err(err)) => {
            web_sys::console::error_1(&format!("[frontend] config fetch failed: {err}").into());
            model.status = MapStatus::Failed(err);
        }
        Msg::MapsReady => match JsMap::mount(MAP_ELEMENT_ID, Camera::HOME) {
            Some(map) => {
                model.map = Some(map);
                model.status = MapStatus::Ready;
                orders.after_next_render(|_| {
                    bind_autocomplete(ORIGIN_INPUT_ID, "origin");
                    bind_autocomplete(DESTINATION_INPUT_ID, "destination");
                });
            }
            None => {
                model.status = MapStatus::Failed(AppError::Configuration(
                    "map container could not be created".into(),
                ));
            }
        },
        Msg::MapsFailed(reason) => {
            web_sys::console::error_1(&format!("[frontend] maps SDK failed: {reason}").into());
            model.status = MapStatus::Failed(AppError::Configuration(reason));
        }
        Msg::OriginChanged(text) => model.controller.set_origin(text),
        Msg::DestinationChanged(text) => model.controller.set_destination(text),
        Msg::PlaceChanged(PlaceChanged { field, value }) => match field.as_str() {
            "origin" => model.controller.set_origin(value),
            "destination" => model.controller.set_destination(value),
            other => web_sys::console::debug_1(
                &format!("[frontend] place-changed for unknown field {other}").into(),
            ),
        },
        Msg::AvoidTollsToggled => {
            let avoid = !model.controller.avoid_tolls();
            model.controller.set_avoid_tolls(avoid);
        }
        Msg::SelectionChanged(key) => {
            if let Some(selection) = RouteSelection::from_key(&key) {
                model.controller.set_selection(selection);
            }
        }
        Msg::Submit => {
            if let Some((id, query)) = model.controller.submit() {
                orders.perform_cmd(send_route_request(id, query));
            }
        }
        Msg::RouteFetched { id, result } => match model.controller.apply_result(id, result) {
            Applied::Stale => {
                web_sys::console::debug_1(&format!("[frontend] dropped stale response {id:?}").into());
            }
            Applied::Shown | Applied::Failed => sync_map(model),
        },
        Msg::Reset => {
            model.controller.reset();
            sync_map(model);
        }
        Msg::Recenter => {
            if let Some(map) = model.map.as_mut() {
                model.controller.recenter(map);
            }
        }
    }
}

/// Status change implied by the fetched maps configuration. `None` means the
/// key is usable and the page stays on `Loading` until the SDK reports back.
fn status_after_config(config: &MapsConfig) -> Option<MapStatus> {
    match config.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => None,
        _ => Some(MapStatus::Failed(AppError::Configuration(
            "no maps API key configured".into(),
        ))),
    }
}

fn sync_map(model: &mut Model) {
    if let Some(map) = model.map.as_mut() {
        model.controller.sync_map(map);
    }
}

async fn fetch_config() -> Msg {
    let request = Request::new(format!("{}/api/config", api_root()));
    let result = match request.fetch().await {
        Err(err) => Err(AppError::Configuration(format!("{err:?}"))),
        Ok(raw) => match raw.check_status() {
            Err(status_err) => Err(AppError::Configuration(format!("{status_err:?}"))),
            Ok(resp) => resp
                .json::<MapsConfig>()
                .await
                .map_err(|err| AppError::Configuration(format!("{err:?}"))),
        },
    };
    Msg::ConfigFetched(result)
}

async fn send_route_request(id: RequestId, query: RouteQuery) -> Msg {
    web_sys::console::debug_1(
        &format!(
            "[frontend] sending route request {id:?} origin={:?} destination={:?}",
            query.origin, query.destination
        )
        .into(),
    );
    let result = request_route(&query).await;
    Msg::RouteFetched { id, result }
}

async fn request_route(query: &RouteQuery) -> Result<DirectionsResult, AppError> {
    let routing = |err: FetchError| AppError::Routing(format!("{err:?}"));
    let request = Request::new(format!("{}/api/route", api_root()))
        .method(Method::Post)
        .json(query)
        .map_err(routing)?;
    let raw = request.fetch().await.map_err(routing)?;
    let status = raw.status();
    if status.is_ok() {
        return raw.json::<DirectionsResult>().await.map_err(routing);
    }
    match raw.json::<ApiError>().await {
        Ok(api_error) => Err(app_error_from(api_error)),
        Err(_) => Err(AppError::Routing(format!("HTTP {}", status.code))),
    }
}

fn app_error_from(err: ApiError) -> AppError {
    match err.kind {
        ApiErrorKind::Configuration => AppError::Configuration(err.message),
        ApiErrorKind::Validation | ApiErrorKind::NotFound | ApiErrorKind::Upstream => {
            AppError::Routing(err.message)
        }
    }
}

pub fn view(model: &Model) -> Node<Msg> {
    let overlay = match &model.status {
        MapStatus::Loading => p![C!["loading"], "Loading..."],
        MapStatus::Failed(err) => div![C!["config-error"], err.to_string()],
        MapStatus::Ready => view_panel(&model.controller),
    };

    div![
        C!["app-container"],
        div![C!["map"], attrs! { At::Id => MAP_ELEMENT_ID }],
        overlay
    ]
}

fn view_panel(controller: &InteractionController) -> Node<Msg> {
    let text_input = |id: &str, placeholder: &str, value: &str, msg: fn(String) -> Msg| {
        div![
            C!["input-field"],
            input![
                attrs! {
                    At::Id => id,
                    At::Type => "text",
                    At::Placeholder => placeholder,
                    At::Value => value,
                    At::AutoComplete => "off",
                    At::SpellCheck => "false",
                },
                input_ev(Ev::Input, msg),
            ]
        ]
    };

    let session = controller.session();
    let computing = controller.is_computing();

    div![
        C!["controls"],
        div![
            C!["row"],
            text_input(ORIGIN_INPUT_ID, "Origin", controller.origin(), Msg::OriginChanged),
            text_input(
                DESTINATION_INPUT_ID,
                "Destination",
                controller.destination(),
                Msg::DestinationChanged
            ),
            button![
                C!["submit"],
                if computing { "Calculating…" } else { "Calculate Route" },
                attrs! { At::Type => "submit", At::Disabled => bool_attr(computing) },
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::Submit
                }),
            ],
            button![
                C!["icon", "clear"],
                attrs! { At::Title => "Clear route" },
                "✕",
                ev(Ev::Click, |_| Msg::Reset),
            ],
            button![
                C!["icon", "recenter"],
                attrs! { At::Title => "Center back" },
                "➤",
                ev(Ev::Click, |_| Msg::Recenter),
            ],
        ],
        div![
            C!["row", "options"],
            label![
                input![
                    attrs! {
                        At::Type => "checkbox",
                        At::Checked => bool_attr(controller.avoid_tolls()),
                    },
                    ev(Ev::Change, |_| Msg::AvoidTollsToggled),
                ],
                span!["Avoid tolls"],
            ],
            label![
                span!["Route: "],
                select![
                    RouteSelection::ALL.iter().map(|selection| {
                        option![
                            attrs! {
                                At::Value => selection.key(),
                                At::Selected => bool_attr(*selection == controller.selection()),
                            },
                            selection.label(),
                        ]
                    }),
                    input_ev(Ev::Change, Msg::SelectionChanged),
                ],
            ],
        ],
        if session.selected_route.is_some() {
            div![
                C!["row", "stats"],
                p![format!("Distance: {}", session.distance_text)],
                p![format!("Duration: {}", session.duration_text)],
            ]
        } else {
            empty![]
        },
        if let Some(notice) = controller.notice() {
            p![C!["error"], notice.to_string()]
        } else {
            empty![]
        }
    ]
}

#[wasm_bindgen(start)]
pub fn start() {
    App::start("app", init, update, view);
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}
