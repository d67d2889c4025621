//! Recording renderer double for session tests.

use catalog::TerrainSource;
use foundation::camera::CameraPose;
use styling::{FeatureProperties, StyleDescriptor};

use crate::error::HostError;
use crate::host::{ScreenPos, ViewerHost};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    InitViewer(String),
    LoadTileset,
    FlyTo(CameraPose),
    ApplyStyle(StyleDescriptor),
    SubscribePick,
    UnsubscribePick,
    InfoPanel(bool),
}

#[derive(Debug, Default)]
pub struct FakeHost {
    pub calls: Vec<Call>,
    pub active_subscriptions: usize,
    pub fail_tileset: bool,
    features: Vec<(ScreenPos, FeatureProperties)>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a feature under `pos`.
    pub fn place(&mut self, pos: ScreenPos, feature: FeatureProperties) {
        self.features.push((pos, feature));
    }

    pub fn styles(&self) -> Vec<&StyleDescriptor> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::ApplyStyle(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn last_style(&self) -> Option<&StyleDescriptor> {
        self.styles().last().copied()
    }

    pub fn last_flight(&self) -> Option<&CameraPose> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::FlyTo(p) => Some(p),
            _ => None,
        })
    }
}

impl ViewerHost for FakeHost {
    type Viewer = u32;
    type Tileset = u32;
    type Feature = FeatureProperties;

    fn initialize_viewer(
        &mut self,
        container_id: &str,
        _terrain: &TerrainSource,
        _access_token: Option<&str>,
    ) -> Result<u32, HostError> {
        self.calls.push(Call::InitViewer(container_id.to_string()));
        Ok(1)
    }

    async fn load_building_tileset(&mut self, _viewer: &u32) -> Result<u32, HostError> {
        self.calls.push(Call::LoadTileset);
        if self.fail_tileset {
            return Err(HostError::TilesetLoad("offline".to_string()));
        }
        Ok(7)
    }

    fn fly_camera(&mut self, _viewer: &u32, pose: &CameraPose) {
        self.calls.push(Call::FlyTo(*pose));
    }

    fn apply_style(&mut self, _tileset: &u32, style: &StyleDescriptor) {
        self.calls.push(Call::ApplyStyle(style.clone()));
    }

    fn subscribe_pick(&mut self, _viewer: &u32) {
        self.active_subscriptions += 1;
        self.calls.push(Call::SubscribePick);
    }

    fn unsubscribe_pick(&mut self, _viewer: &u32) {
        self.active_subscriptions = self.active_subscriptions.saturating_sub(1);
        self.calls.push(Call::UnsubscribePick);
    }

    fn pick(&self, _viewer: &u32, pos: ScreenPos) -> Option<FeatureProperties> {
        self.features
            .iter()
            .find(|(p, _)| *p == pos)
            .map(|(_, f)| f.clone())
    }

    fn set_info_panel_visible(&mut self, visible: bool) {
        self.calls.push(Call::InfoPanel(visible));
    }
}
