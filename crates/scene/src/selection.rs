use catalog::{CityCatalog, CityPreset};
use foundation::camera::CameraPose;
use foundation::math::LatLon;
use styling::{DisplayMode, StyleDescriptor, by_distance, style_for};

use crate::error::SessionError;

/// Side effect of a selection transition, applied in order by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FlyTo(CameraPose),
    ApplyStyle(StyleDescriptor),
    EnablePicking,
    DisablePicking,
}

/// Where the distance style is currently anchored.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum DistanceOrigin {
    /// The selected city's landmark.
    #[default]
    City,
    Picked(LatLon),
}

/// Current dropdown selections.
///
/// Transitions only compute effects; applying them to the renderer is the
/// session's job. Teardown effects of the previous mode always precede the
/// new mode's effects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionState {
    mode: DisplayMode,
    city: usize,
    distance_origin: DistanceOrigin,
}

impl SelectionState {
    pub fn new(mode: DisplayMode, city: usize) -> Self {
        Self {
            mode,
            city,
            distance_origin: DistanceOrigin::City,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn city_index(&self) -> usize {
        self.city
    }

    pub fn distance_origin(&self) -> DistanceOrigin {
        self.distance_origin
    }

    /// Selects city `index`. The camera always flies there; in distance mode
    /// the style is re-anchored at the city, discarding any picked origin.
    pub fn set_city(
        &mut self,
        cities: &CityCatalog,
        index: usize,
    ) -> Result<Vec<Effect>, SessionError> {
        let preset = city(cities, index)?;
        self.city = index;
        self.distance_origin = DistanceOrigin::City;

        let mut effects = vec![Effect::FlyTo(preset.pose)];
        if self.mode == DisplayMode::ByDistance {
            effects.push(Effect::ApplyStyle(by_distance(preset.landmark)));
        }
        Ok(effects)
    }

    /// Switches display mode. Leaving distance mode disables picking before
    /// the new style lands; entering it anchors at the selected city and
    /// enables picking afterwards.
    pub fn set_mode(
        &mut self,
        cities: &CityCatalog,
        mode: DisplayMode,
    ) -> Result<Vec<Effect>, SessionError> {
        let landmark = city(cities, self.city)?.landmark;
        self.mode = mode;
        self.distance_origin = DistanceOrigin::City;

        let mut effects = Vec::with_capacity(2);
        if !mode.uses_picking() {
            effects.push(Effect::DisablePicking);
        }
        effects.push(Effect::ApplyStyle(style_for(mode, landmark)));
        if mode.uses_picking() {
            effects.push(Effect::EnablePicking);
        }
        Ok(effects)
    }

    /// Re-anchors the distance style at a picked point. Ignored outside
    /// distance mode.
    pub fn set_pick_origin(&mut self, origin: LatLon) -> Option<Effect> {
        if self.mode != DisplayMode::ByDistance {
            return None;
        }
        self.distance_origin = DistanceOrigin::Picked(origin);
        Some(Effect::ApplyStyle(by_distance(origin)))
    }
}

fn city(cities: &CityCatalog, index: usize) -> Result<&CityPreset, SessionError> {
    cities.get(index).ok_or(SessionError::InvalidCity {
        index,
        len: cities.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::{DistanceOrigin, Effect, SelectionState};
    use crate::error::SessionError;
    use catalog::{CityCatalog, CityPreset};
    use foundation::math::LatLon;
    use pretty_assertions::assert_eq;
    use styling::{Condition, DisplayMode, FeatureProperties, NamedColor, by_distance, by_type};

    #[test]
    fn city_change_flies_without_restyle_outside_distance_mode() {
        let cities = CityCatalog::default();
        let mut s = SelectionState::default();
        let effects = s.set_city(&cities, 1).unwrap();
        assert_eq!(effects, vec![Effect::FlyTo(CityPreset::taichung().pose)]);
        assert_eq!(s.city_index(), 1);
    }

    #[test]
    fn city_change_in_distance_mode_reanchors() {
        let cities = CityCatalog::default();
        let mut s = SelectionState::new(DisplayMode::ByDistance, 0);
        s.set_pick_origin(LatLon::new(25.1, 121.6));
        let effects = s.set_city(&cities, 2).unwrap();
        let kaohsiung = CityPreset::kaohsiung();
        assert_eq!(
            effects,
            vec![
                Effect::FlyTo(kaohsiung.pose),
                Effect::ApplyStyle(by_distance(kaohsiung.landmark)),
            ]
        );
        assert_eq!(s.distance_origin(), DistanceOrigin::City);
    }

    #[test]
    fn entering_distance_mode_styles_then_enables_picking() {
        let cities = CityCatalog::default();
        let mut s = SelectionState::default();
        let effects = s.set_mode(&cities, DisplayMode::ByDistance).unwrap();
        assert_eq!(
            effects,
            vec![
                Effect::ApplyStyle(by_distance(CityPreset::taipei().landmark)),
                Effect::EnablePicking,
            ]
        );
    }

    #[test]
    fn leaving_distance_mode_disables_picking_first() {
        let cities = CityCatalog::default();
        let mut s = SelectionState::new(DisplayMode::ByDistance, 0);
        let effects = s.set_mode(&cities, DisplayMode::ByType).unwrap();
        assert_eq!(effects, vec![Effect::DisablePicking, Effect::ApplyStyle(by_type())]);
        assert_eq!(s.mode(), DisplayMode::ByType);
    }

    #[test]
    fn pick_origin_only_applies_in_distance_mode() {
        let cities = CityCatalog::default();
        let mut s = SelectionState::default();
        assert_eq!(s.set_pick_origin(LatLon::new(1.0, 2.0)), None);
        assert_eq!(s.distance_origin(), DistanceOrigin::City);

        s.set_mode(&cities, DisplayMode::ByDistance).unwrap();
        let p = LatLon::new(25.05, 121.52);
        assert_eq!(s.set_pick_origin(p), Some(Effect::ApplyStyle(by_distance(p))));
        assert_eq!(s.distance_origin(), DistanceOrigin::Picked(p));
    }

    #[test]
    fn invalid_city_leaves_state_untouched() {
        let cities = CityCatalog::default();
        let mut s = SelectionState::default();
        assert_eq!(
            s.set_city(&cities, 7),
            Err(SessionError::InvalidCity { index: 7, len: 3 })
        );
        assert_eq!(s, SelectionState::default());
    }

    #[test]
    fn every_city_gets_decreasing_distance_bands_ending_in_catch_all() {
        let cities = CityCatalog::default();
        let mut s = SelectionState::new(DisplayMode::ByDistance, 0);
        for (index, preset) in cities.iter().enumerate() {
            let effects = s.set_city(&cities, index).unwrap();
            let Some(Effect::ApplyStyle(style)) = effects.last() else {
                panic!("{}: no restyle in distance mode", preset.name);
            };
            let conds: Vec<_> = style.color_conditions().unwrap().conditions().collect();
            assert_eq!(conds.last(), Some(&(Condition::Always, NamedColor::White)));

            // Walking north from the landmark passes each band from the inside out.
            let walk = [
                (0.00005, NamedColor::White),
                (0.005, NamedColor::Chartreuse),
                (0.02, NamedColor::Tomato),
                (0.04, NamedColor::DeepSkyBlue),
                (0.06, NamedColor::Gold),
            ];
            for (offset, expected) in walk {
                let feature = FeatureProperties::new()
                    .with("cesium#latitude", preset.landmark.lat_deg + offset)
                    .with("cesium#longitude", preset.landmark.lon_deg);
                assert_eq!(
                    style.evaluate(&feature).color,
                    Some(expected),
                    "{} at +{offset}",
                    preset.name
                );
            }
        }
    }
}
