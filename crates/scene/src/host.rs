//! Boundary to the 3D globe renderer.
//!
//! Everything the session needs from the renderer goes through
//! [`ViewerHost`]. The browser build implements it on top of the globe
//! library; tests implement it with a recording double.

use std::future::Future;

use catalog::TerrainSource;
use foundation::camera::CameraPose;
use styling::{FeatureTags, StyleDescriptor};

use crate::error::HostError;

/// Canvas position in CSS pixels, origin top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

impl ScreenPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Renderer operations consumed by the session.
///
/// Handles are passed explicitly; the host keeps no notion of a current
/// viewer or tileset.
pub trait ViewerHost {
    type Viewer;
    type Tileset;
    type Feature: FeatureTags;

    fn initialize_viewer(
        &mut self,
        container_id: &str,
        terrain: &TerrainSource,
        access_token: Option<&str>,
    ) -> Result<Self::Viewer, HostError>;

    /// Loads the OSM building tileset and adds it to the scene. Called once.
    fn load_building_tileset(
        &mut self,
        viewer: &Self::Viewer,
    ) -> impl Future<Output = Result<Self::Tileset, HostError>>;

    fn fly_camera(&mut self, viewer: &Self::Viewer, pose: &CameraPose);

    /// Replaces the tileset's style.
    fn apply_style(&mut self, tileset: &Self::Tileset, style: &StyleDescriptor);

    /// Starts routing clicks on the canvas back to the session as pick
    /// events. The session never subscribes twice without unsubscribing.
    fn subscribe_pick(&mut self, viewer: &Self::Viewer);

    fn unsubscribe_pick(&mut self, viewer: &Self::Viewer);

    /// Resolves a screen position to the feature under it, if any.
    fn pick(&self, viewer: &Self::Viewer, pos: ScreenPos) -> Option<Self::Feature>;

    /// Shows or hides the "click a building" hint shown while picking.
    fn set_info_panel_visible(&mut self, visible: bool);
}
