use console_error_panic_hook::set_once;
use std::cell::{Cell, RefCell};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;

use catalog::ViewerConfig;
use runtime::EventBus;
use scene::{MapApp, UiEvent, bootstrap};

mod cesium;
use cesium::CesiumHost;

const MODE_MENU_ID: &str = "dropdown1";
const CITY_MENU_ID: &str = "dropdown2";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Boot {
    Idle,
    Loading,
    Ready,
    Failed,
}

thread_local! {
    static BOOT: Cell<Boot> = const { Cell::new(Boot::Idle) };
    static APP: RefCell<Option<MapApp<CesiumHost>>> = const { RefCell::new(None) };
    // UI events land here first so that events raised while the app is
    // busy or still loading are handled in order afterwards.
    static PENDING: RefCell<EventBus<UiEvent>> = RefCell::new(EventBus::new());
}

pub(crate) fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

/// Queues `event` and drains the queue if the app is idle.
pub(crate) fn dispatch(event: UiEvent) -> Result<(), JsValue> {
    if !enqueue(event) {
        return Err(JsValue::from_str("viewer failed to start"));
    }
    drain()
}

/// Returns `false` once startup has failed; nothing would ever drain.
fn enqueue(event: UiEvent) -> bool {
    if BOOT.with(Cell::get) == Boot::Failed {
        return false;
    }
    PENDING.with(|bus| {
        bus.borrow_mut().emit(event);
    });
    true
}

/// Marks startup as failed and drops queued events. Returns how many.
fn abandon_pending() -> usize {
    BOOT.with(|b| b.set(Boot::Failed));
    PENDING.with(|bus| bus.borrow_mut().drain().len())
}

fn drain() -> Result<(), JsValue> {
    APP.with(|cell| {
        // Already draining further up the stack; that loop picks this event up.
        let Ok(mut guard) = cell.try_borrow_mut() else {
            return Ok(());
        };
        let Some(app) = guard.as_mut() else {
            return Ok(());
        };
        while let Some(event) = PENDING.with(|bus| bus.borrow_mut().pop()) {
            app.handle(event.payload)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
        }
        Ok(())
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Boots the viewer into `#cesiumContainer` (or the configured container)
/// and, once the building tileset is loaded, wires the mode and city
/// dropdowns.
///
/// `config_json` overrides the built-in config; see `ViewerConfig`.
#[wasm_bindgen]
pub fn init_viewer(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(text) => ViewerConfig::from_json(&text).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => ViewerConfig::default(),
    };
    if BOOT.with(|b| b.replace(Boot::Loading)) != Boot::Idle {
        return Err(JsValue::from_str("viewer already initialized"));
    }

    spawn_local(async move {
        match bootstrap(CesiumHost::new(), &config).await {
            Ok(app) => {
                APP.with(|cell| *cell.borrow_mut() = Some(app));
                BOOT.with(|b| b.set(Boot::Ready));
                let bound = bind_menu(MODE_MENU_ID, UiEvent::ModeSelected)
                    .and_then(|()| bind_menu(CITY_MENU_ID, UiEvent::CitySelected));
                if let Err(e) = bound {
                    log(&format!("dropdown wiring failed: {e:?}"));
                }
                if let Err(e) = drain() {
                    log(&format!("queued event failed: {e:?}"));
                }
            }
            Err(e) => {
                let dropped = abandon_pending();
                log(&format!("viewer init error: {e} ({dropped} queued events dropped)"));
            }
        }
    });
    Ok(())
}

/// City dropdown entry point for pages that wire their own controls.
#[wasm_bindgen]
pub fn on_city_changed(index: usize) -> Result<(), JsValue> {
    dispatch(UiEvent::CitySelected(index))
}

/// Display-mode dropdown entry point. Throws for an index with no mode.
#[wasm_bindgen]
pub fn on_mode_changed(index: usize) -> Result<(), JsValue> {
    dispatch(UiEvent::ModeSelected(index))
}

fn bind_menu(id: &str, event: fn(usize) -> UiEvent) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let Some(element) = document.get_element_by_id(id) else {
        log(&format!("#{id} not found; call the exported handlers instead"));
        return Ok(());
    };
    let menu: HtmlSelectElement = element.dyn_into()?;
    let target = menu.clone();
    let on_change = Closure::<dyn FnMut()>::new(move || {
        let Ok(index) = usize::try_from(target.selected_index()) else {
            return;
        };
        if let Err(e) = dispatch(event(index)) {
            log(&format!("#{}: {e:?}", target.id()));
        }
    });
    menu.set_onchange(Some(on_change.as_ref().unchecked_ref()));
    // Menus live as long as the page.
    on_change.forget();
    Ok(())
}
