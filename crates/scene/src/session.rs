use catalog::{CityCatalog, ViewerConfig};
use foundation::math::LatLon;
use runtime::EventBus;
use styling::{DisplayMode, by_height};
use tracing::{debug, info};

use crate::error::{BootstrapError, SessionError};
use crate::host::{ScreenPos, ViewerHost};
use crate::picking::PickingController;
use crate::selection::{Effect, SelectionState};

/// Discrete input from the UI shell.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UiEvent {
    /// City dropdown changed to entry `n`.
    CitySelected(usize),
    /// Mode dropdown changed to entry `n`.
    ModeSelected(usize),
    /// Canvas clicked while picking is enabled.
    Picked(ScreenPos),
}

/// A running viewer session: renderer handles plus selection state.
///
/// Owns the only [`PickingController`], so at most one pick subscription
/// exists per session.
pub struct MapApp<H: ViewerHost> {
    host: H,
    viewer: H::Viewer,
    tileset: H::Tileset,
    cities: CityCatalog,
    selection: SelectionState,
    picking: PickingController,
}

/// Mounts the viewer, waits for the building tileset and applies the
/// default height style. UI events must not be routed before this resolves.
pub async fn bootstrap<H: ViewerHost>(
    mut host: H,
    config: &ViewerConfig,
) -> Result<MapApp<H>, BootstrapError> {
    config.validate()?;
    let viewer = host.initialize_viewer(
        &config.container_id,
        &config.terrain,
        config.access_token.as_deref(),
    )?;
    host.set_info_panel_visible(false);

    let tileset = host.load_building_tileset(&viewer).await?;
    info!(container = %config.container_id, "building tileset loaded");
    host.fly_camera(&viewer, &config.initial_pose);

    // Sessions start in height mode on the first city.
    let selection = SelectionState::default();
    host.apply_style(&tileset, &by_height());

    Ok(MapApp {
        host,
        viewer,
        tileset,
        cities: config.cities.clone(),
        selection,
        picking: PickingController::new(),
    })
}

impl<H: ViewerHost> MapApp<H> {
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn cities(&self) -> &CityCatalog {
        &self.cities
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn picking(&self) -> &PickingController {
        &self.picking
    }

    pub fn on_city_changed(&mut self, index: usize) -> Result<(), SessionError> {
        let effects = self.selection.set_city(&self.cities, index)?;
        info!(city = index, mode = %self.selection.mode(), "city changed");
        self.apply(effects);
        Ok(())
    }

    pub fn on_mode_changed(&mut self, mode: DisplayMode) -> Result<(), SessionError> {
        let effects = self.selection.set_mode(&self.cities, mode)?;
        info!(%mode, city = self.selection.city_index(), "display mode changed");
        self.apply(effects);
        Ok(())
    }

    /// Mode change by dropdown index.
    pub fn on_mode_selected(&mut self, index: usize) -> Result<(), SessionError> {
        let mode = DisplayMode::from_index(index).ok_or(SessionError::InvalidMode(index))?;
        self.on_mode_changed(mode)
    }

    /// Re-anchors the distance style at the clicked building. Clicks that
    /// resolve to nothing usable are dropped and the current style is kept.
    pub fn on_pick(&mut self, pos: ScreenPos) -> Option<LatLon> {
        let origin = match self.picking.resolve(&self.host, &self.viewer, pos) {
            Ok(origin) => origin,
            Err(err) => {
                debug!(x = pos.x, y = pos.y, %err, "pick ignored");
                return None;
            }
        };
        let effect = self.selection.set_pick_origin(origin)?;
        debug!(lat = origin.lat_deg, lon = origin.lon_deg, "distance origin picked");
        self.apply(vec![effect]);
        Some(origin)
    }

    pub fn handle(&mut self, event: UiEvent) -> Result<(), SessionError> {
        match event {
            UiEvent::CitySelected(index) => self.on_city_changed(index),
            UiEvent::ModeSelected(index) => self.on_mode_selected(index),
            UiEvent::Picked(pos) => {
                self.on_pick(pos);
                Ok(())
            }
        }
    }

    /// Handles queued events in arrival order. Stops at the first routing
    /// error, leaving later events queued.
    pub fn pump(&mut self, bus: &mut EventBus<UiEvent>) -> Result<usize, SessionError> {
        let mut handled = 0;
        while let Some(event) = bus.pop() {
            self.handle(event.payload)?;
            handled += 1;
        }
        Ok(handled)
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FlyTo(pose) => self.host.fly_camera(&self.viewer, &pose),
                Effect::ApplyStyle(style) => self.host.apply_style(&self.tileset, &style),
                Effect::EnablePicking => {
                    self.picking.enable(&mut self.host, &self.viewer);
                }
                Effect::DisablePicking => {
                    self.picking.disable(&mut self.host, &self.viewer);
                }
            }
        }
    }
}
