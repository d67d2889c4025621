//! CesiumJS bindings and the [`ViewerHost`] built on them.
//!
//! Expects the `Cesium` global from the Cesium CDN build.

use js_sys::{Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement};

use catalog::TerrainSource;
use foundation::camera::CameraPose;
use scene::{HostError, ScreenPos, UiEvent, ViewerHost};
use styling::{FeatureTags, StyleDescriptor, Value};

use crate::{dispatch, log};

/// `Cesium.ScreenSpaceEventType.LEFT_CLICK`
const LEFT_CLICK: u32 = 2;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Cesium)]
    pub type Viewer;

    #[wasm_bindgen(constructor, js_namespace = Cesium, catch)]
    fn new(container: &str, options: &JsValue) -> Result<Viewer, JsValue>;

    #[wasm_bindgen(method, getter)]
    fn scene(this: &Viewer) -> Scene;

    #[wasm_bindgen(method, getter)]
    fn camera(this: &Viewer) -> Camera;

    #[wasm_bindgen(method, setter = selectedEntity)]
    fn set_selected_entity(this: &Viewer, entity: &JsValue);

    #[wasm_bindgen(js_namespace = Cesium)]
    type Scene;

    #[wasm_bindgen(method, getter)]
    fn primitives(this: &Scene) -> PrimitiveCollection;

    #[wasm_bindgen(method, getter)]
    fn canvas(this: &Scene) -> HtmlCanvasElement;

    #[wasm_bindgen(method)]
    fn pick(this: &Scene, position: &Cartesian2) -> JsValue;

    #[wasm_bindgen(js_namespace = Cesium)]
    type PrimitiveCollection;

    #[wasm_bindgen(method)]
    fn add(this: &PrimitiveCollection, primitive: &JsValue);

    #[wasm_bindgen(js_namespace = Cesium)]
    type Camera;

    #[wasm_bindgen(method, js_name = flyTo)]
    fn fly_to(this: &Camera, options: &JsValue);

    #[wasm_bindgen(js_namespace = Cesium)]
    type Cartesian2;

    #[wasm_bindgen(constructor, js_namespace = Cesium)]
    fn new(x: f64, y: f64) -> Cartesian2;

    #[wasm_bindgen(js_namespace = Cesium)]
    type Cartesian3;

    #[wasm_bindgen(static_method_of = Cartesian3, js_namespace = Cesium, js_name = fromDegrees)]
    fn from_degrees(lon_deg: f64, lat_deg: f64, height_m: f64) -> Cartesian3;

    #[wasm_bindgen(js_namespace = ["Cesium", "Terrain"], js_name = fromWorldTerrain)]
    fn world_terrain() -> JsValue;

    #[wasm_bindgen(js_namespace = Cesium, js_name = createOsmBuildingsAsync, catch)]
    async fn create_osm_buildings() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = Cesium)]
    pub type Cesium3DTileset;

    #[wasm_bindgen(method, setter)]
    fn set_style(this: &Cesium3DTileset, style: &Cesium3DTileStyle);

    #[wasm_bindgen(js_namespace = Cesium)]
    type Cesium3DTileStyle;

    #[wasm_bindgen(constructor, js_namespace = Cesium, catch)]
    fn new(style: &JsValue) -> Result<Cesium3DTileStyle, JsValue>;

    #[wasm_bindgen(js_namespace = Cesium)]
    pub type Cesium3DTileFeature;

    #[wasm_bindgen(method, js_name = getProperty)]
    fn get_property(this: &Cesium3DTileFeature, name: &str) -> JsValue;

    #[wasm_bindgen(js_namespace = Cesium)]
    type ScreenSpaceEventHandler;

    #[wasm_bindgen(constructor, js_namespace = Cesium)]
    fn new(canvas: &HtmlCanvasElement) -> ScreenSpaceEventHandler;

    #[wasm_bindgen(method, js_name = setInputAction)]
    fn set_input_action(this: &ScreenSpaceEventHandler, action: &js_sys::Function, kind: u32);

    #[wasm_bindgen(method, js_name = removeInputAction)]
    fn remove_input_action(this: &ScreenSpaceEventHandler, kind: u32);
}

impl FeatureTags for Cesium3DTileFeature {
    fn tag(&self, name: &str) -> Value {
        js_to_value(&self.get_property(name))
    }
}

fn js_to_value(v: &JsValue) -> Value {
    if v.is_undefined() {
        Value::Undefined
    } else if v.is_null() {
        Value::Null
    } else if let Some(b) = v.as_bool() {
        Value::Bool(b)
    } else if let Some(n) = v.as_f64() {
        Value::Number(n)
    } else if let Some(s) = v.as_string() {
        Value::String(s)
    } else {
        Value::Undefined
    }
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn set_access_token(token: &str) -> Result<(), JsValue> {
    let cesium = Reflect::get(&js_sys::global(), &JsValue::from_str("Cesium"))?;
    let ion = Reflect::get(&cesium, &JsValue::from_str("Ion"))?;
    Reflect::set(&ion, &JsValue::from_str("defaultAccessToken"), &JsValue::from_str(token))?;
    Ok(())
}

fn js_message(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

fn fly_options(pose: &CameraPose) -> Result<Object, JsValue> {
    let options = Object::new();
    let destination = Cartesian3::from_degrees(
        pose.position.lon_deg,
        pose.position.lat_deg,
        pose.alt_m,
    );
    set(&options, "destination", &destination)?;
    let orientation = Object::new();
    set(&orientation, "heading", &JsValue::from_f64(pose.heading_rad))?;
    set(&orientation, "pitch", &JsValue::from_f64(pose.pitch_rad))?;
    set(&options, "orientation", &orientation)?;
    Ok(options)
}

/// Cesium-backed renderer. Owns the canvas click handler and the
/// callback installed on it while picking is on.
#[derive(Default)]
pub struct CesiumHost {
    events: Option<ScreenSpaceEventHandler>,
    on_click: Option<Closure<dyn FnMut(JsValue)>>,
    info_panel: Option<HtmlElement>,
}

impl CesiumHost {
    pub fn new() -> Self {
        let info_panel = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector(".infoPanel").ok().flatten())
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        if info_panel.is_none() {
            log("no .infoPanel element; pick hint disabled");
        }
        Self {
            info_panel,
            ..Self::default()
        }
    }
}

impl ViewerHost for CesiumHost {
    type Viewer = Viewer;
    type Tileset = Cesium3DTileset;
    type Feature = Cesium3DTileFeature;

    fn initialize_viewer(
        &mut self,
        container_id: &str,
        terrain: &TerrainSource,
        access_token: Option<&str>,
    ) -> Result<Viewer, HostError> {
        let init_err = |e: JsValue| HostError::ViewerInit(js_message(&e));
        if let Some(token) = access_token {
            set_access_token(token).map_err(init_err)?;
        }
        let options = Object::new();
        if *terrain == TerrainSource::World {
            set(&options, "terrain", &world_terrain()).map_err(init_err)?;
        }
        let viewer = Viewer::new(container_id, &options).map_err(init_err)?;
        self.events = Some(ScreenSpaceEventHandler::new(&viewer.scene().canvas()));
        Ok(viewer)
    }

    async fn load_building_tileset(&mut self, viewer: &Viewer) -> Result<Cesium3DTileset, HostError> {
        let tileset = create_osm_buildings()
            .await
            .map_err(|e| HostError::TilesetLoad(js_message(&e)))?;
        viewer.scene().primitives().add(&tileset);
        Ok(tileset.unchecked_into())
    }

    fn fly_camera(&mut self, viewer: &Viewer, pose: &CameraPose) {
        match fly_options(pose) {
            Ok(options) => viewer.camera().fly_to(&options),
            Err(e) => log(&format!("flyTo skipped: {}", js_message(&e))),
        }
    }

    fn apply_style(&mut self, tileset: &Cesium3DTileset, style: &StyleDescriptor) {
        let json = match style.to_json_string(false) {
            Ok(json) => json,
            Err(e) => {
                log(&format!("style serialization failed: {e}"));
                return;
            }
        };
        let applied = js_sys::JSON::parse(&json).and_then(|doc| Cesium3DTileStyle::new(&doc));
        match applied {
            Ok(s) => tileset.set_style(&s),
            Err(e) => log(&format!("style rejected: {}", js_message(&e))),
        }
    }

    fn subscribe_pick(&mut self, _viewer: &Viewer) {
        let Some(events) = &self.events else {
            return;
        };
        let on_click = Closure::<dyn FnMut(JsValue)>::new(|movement: JsValue| {
            let Ok(position) = Reflect::get(&movement, &JsValue::from_str("position")) else {
                return;
            };
            let coord = |k: &str| {
                Reflect::get(&position, &JsValue::from_str(k))
                    .ok()
                    .and_then(|v| v.as_f64())
            };
            if let (Some(x), Some(y)) = (coord("x"), coord("y")) {
                if let Err(e) = dispatch(UiEvent::Picked(ScreenPos::new(x, y))) {
                    log(&format!("pick failed: {}", js_message(&e)));
                }
            }
        });
        events.set_input_action(on_click.as_ref().unchecked_ref(), LEFT_CLICK);
        self.on_click = Some(on_click);
    }

    fn unsubscribe_pick(&mut self, _viewer: &Viewer) {
        if let Some(events) = &self.events {
            events.remove_input_action(LEFT_CLICK);
        }
        self.on_click = None;
    }

    fn pick(&self, viewer: &Viewer, pos: ScreenPos) -> Option<Cesium3DTileFeature> {
        viewer.set_selected_entity(&JsValue::UNDEFINED);
        let picked = viewer.scene().pick(&Cartesian2::new(pos.x, pos.y));
        if picked.is_undefined() || picked.is_null() {
            return None;
        }
        // Terrain and entities pick as other object types.
        let is_feature = Reflect::has(&picked, &JsValue::from_str("getProperty")).unwrap_or(false);
        is_feature.then(|| picked.unchecked_into())
    }

    fn set_info_panel_visible(&mut self, visible: bool) {
        let Some(panel) = &self.info_panel else {
            return;
        };
        let value = if visible { "visible" } else { "hidden" };
        if let Err(e) = panel.style().set_property("visibility", value) {
            log(&format!("info panel: {}", js_message(&e)));
        }
    }
}
