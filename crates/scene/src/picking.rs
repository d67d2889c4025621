use foundation::math::LatLon;
use styling::FeatureTags;
use styling::building::{LATITUDE_TAG, LONGITUDE_TAG};

use crate::error::PickError;
use crate::host::{ScreenPos, ViewerHost};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PickState {
    #[default]
    Disabled,
    Enabled,
}

/// Owns the single pick-a-point subscription.
///
/// `Disabled -> enable() -> Enabled -> disable() -> Disabled`; both
/// transitions are no-ops when already in the target state, so the host
/// never holds two subscriptions.
#[derive(Debug, Default)]
pub struct PickingController {
    state: PickState,
}

impl PickingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PickState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == PickState::Enabled
    }

    /// Returns `true` if a subscription was installed.
    pub fn enable<H: ViewerHost>(&mut self, host: &mut H, viewer: &H::Viewer) -> bool {
        if self.is_enabled() {
            return false;
        }
        host.subscribe_pick(viewer);
        host.set_info_panel_visible(true);
        self.state = PickState::Enabled;
        tracing::debug!("picking enabled");
        true
    }

    /// Returns `true` if a subscription was removed.
    pub fn disable<H: ViewerHost>(&mut self, host: &mut H, viewer: &H::Viewer) -> bool {
        if !self.is_enabled() {
            return false;
        }
        host.unsubscribe_pick(viewer);
        host.set_info_panel_visible(false);
        self.state = PickState::Disabled;
        tracing::debug!("picking disabled");
        true
    }

    /// Resolves a click to the picked building's coordinates.
    pub fn resolve<H: ViewerHost>(
        &self,
        host: &H,
        viewer: &H::Viewer,
        pos: ScreenPos,
    ) -> Result<LatLon, PickError> {
        if !self.is_enabled() {
            return Err(PickError::Inactive);
        }
        let feature = host.pick(viewer, pos).ok_or(PickError::NoFeaturePicked)?;
        let lat = coordinate(&feature, LATITUDE_TAG)?;
        let lon = coordinate(&feature, LONGITUDE_TAG)?;
        Ok(LatLon::new(lat, lon))
    }
}

fn coordinate(feature: &impl FeatureTags, tag: &'static str) -> Result<f64, PickError> {
    feature
        .tag(tag)
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or(PickError::MissingFeatureTag(tag))
}

#[cfg(test)]
mod tests {
    use super::{PickState, PickingController};
    use crate::error::PickError;
    use crate::host::ScreenPos;
    use crate::testing::{Call, FakeHost};
    use foundation::math::LatLon;
    use styling::FeatureProperties;

    #[test]
    fn enable_and_disable_are_idempotent() {
        let mut host = FakeHost::new();
        let viewer = 1;
        let mut picking = PickingController::new();

        assert!(picking.enable(&mut host, &viewer));
        assert!(!picking.enable(&mut host, &viewer));
        assert_eq!(host.active_subscriptions, 1);
        assert_eq!(picking.state(), PickState::Enabled);

        assert!(picking.disable(&mut host, &viewer));
        assert!(!picking.disable(&mut host, &viewer));
        assert_eq!(host.active_subscriptions, 0);
        assert_eq!(
            host.calls,
            vec![
                Call::SubscribePick,
                Call::InfoPanel(true),
                Call::UnsubscribePick,
                Call::InfoPanel(false),
            ]
        );
    }

    #[test]
    fn resolves_picked_building_coordinates() {
        let mut host = FakeHost::new();
        host.place(
            ScreenPos::new(10.0, 20.0),
            FeatureProperties::new()
                .with("cesium#latitude", 25.04)
                .with("cesium#longitude", "121.55"),
        );
        let mut picking = PickingController::new();
        picking.enable(&mut host, &1);
        assert_eq!(
            picking.resolve(&host, &1, ScreenPos::new(10.0, 20.0)),
            Ok(LatLon::new(25.04, 121.55))
        );
    }

    #[test]
    fn unusable_picks_are_classified() {
        let mut host = FakeHost::new();
        host.place(
            ScreenPos::new(1.0, 1.0),
            FeatureProperties::new().with("cesium#longitude", 121.0),
        );
        let mut picking = PickingController::new();

        assert_eq!(
            picking.resolve(&host, &1, ScreenPos::new(1.0, 1.0)),
            Err(PickError::Inactive)
        );
        picking.enable(&mut host, &1);
        assert_eq!(
            picking.resolve(&host, &1, ScreenPos::new(1.0, 1.0)),
            Err(PickError::MissingFeatureTag("cesium#latitude"))
        );
        assert_eq!(
            picking.resolve(&host, &1, ScreenPos::new(500.0, 5.0)),
            Err(PickError::NoFeaturePicked)
        );
    }
}
