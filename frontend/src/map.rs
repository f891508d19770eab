use serde::Serialize;
use serde_wasm_bindgen::to_value;
use shared::{Camera, GeoPoint};
use wasm_bindgen::prelude::{JsValue, wasm_bindgen};

use crate::overlay::{DisplayCircle, DisplayMarker};

#[wasm_bindgen(module = "/google_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = loadMapsSdk)]
    fn load_maps_sdk(api_key: &str, libraries: JsValue);
    #[wasm_bindgen(js_name = createMap)]
    fn create_map(element_id: &str, options: JsValue) -> JsValue;
    #[wasm_bindgen(js_name = bindAutocomplete)]
    fn bind_autocomplete_js(input_id: &str, field: &str);
    #[wasm_bindgen(js_name = setCamera)]
    fn set_camera_js(map: &JsValue, center: JsValue, zoom: u8);
    #[wasm_bindgen(js_name = setRoute)]
    fn set_route_js(map: &JsValue, path: JsValue);
    #[wasm_bindgen(js_name = setOverlays)]
    fn set_overlays_js(map: &JsValue, markers: JsValue, circles: JsValue);
}

/// What the interaction logic needs from a rendered map.
pub trait MapSurface {
    fn set_camera(&mut self, camera: Camera);
    /// `None` removes the route line.
    fn show_route(&mut self, path: Option<&[GeoPoint]>);
    /// Replaces every marker and circle with the given lists.
    fn show_overlays(&mut self, markers: &[DisplayMarker], circles: &[DisplayCircle]);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions {
    center: GeoPoint,
    zoom: u8,
    zoom_control: bool,
    street_view_control: bool,
    map_type_control: bool,
    fullscreen_control: bool,
}

impl MapOptions {
    fn at(camera: Camera) -> Self {
        Self {
            center: camera.center,
            zoom: camera.zoom,
            zoom_control: false,
            street_view_control: false,
            map_type_control: false,
            fullscreen_control: false,
        }
    }
}

/// Injects the mapping SDK script. Completion is reported through the
/// `maps-ready` / `maps-error` window events.
pub fn load_sdk(api_key: &str, libraries: &[String]) {
    match to_value(libraries) {
        Ok(libraries) => load_maps_sdk(api_key, libraries),
        Err(err) => web_sys::console::error_1(&format!("[frontend] bad library list: {err}").into()),
    }
}

/// Attaches place suggestions to an input. Picks are reported through the
/// `place-changed` window event tagged with `field`.
pub fn bind_autocomplete(input_id: &str, field: &str) {
    bind_autocomplete_js(input_id, field);
}

/// Handle to the map instance living in the page.
pub struct JsMap {
    handle: JsValue,
}

impl JsMap {
    /// Mounts a map into `element_id` at `camera` with all stock controls off.
    pub fn mount(element_id: &str, camera: Camera) -> Option<Self> {
        let options = to_value(&MapOptions::at(camera)).ok()?;
        let handle = create_map(element_id, options);
        if handle.is_null() || handle.is_undefined() {
            return None;
        }
        Some(Self { handle })
    }
}

impl MapSurface for JsMap {
    fn set_camera(&mut self, camera: Camera) {
        if let Ok(center) = to_value(&camera.center) {
            set_camera_js(&self.handle, center, camera.zoom);
        }
    }

    fn show_route(&mut self, path: Option<&[GeoPoint]>) {
        let value = match path {
            Some(path) => to_value(path).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        };
        set_route_js(&self.handle, value);
    }

    fn show_overlays(&mut self, markers: &[DisplayMarker], circles: &[DisplayCircle]) {
        if let (Ok(markers), Ok(circles)) = (to_value(markers), to_value(circles)) {
            set_overlays_js(&self.handle, markers, circles);
        }
    }
}
