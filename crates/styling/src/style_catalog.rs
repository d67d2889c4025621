//! Building styles offered by the mode dropdown.
//!
//! Every function here is pure: it builds a fresh [`StyleDescriptor`] and
//! touches no renderer state.

use foundation::math::LatLon;

use crate::building::{
    BUILDING_PART_TAG, BUILDING_TAG, COMMERCIAL, EDUCATION, HOTEL, HOUSE, LATITUDE_TAG,
    LEVELS_TAG, LONGITUDE_TAG, PART_LEVELS_TAG, PUBLIC_INSTITUTIONAL, RESIDENTIAL,
    RETAIL_INDUSTRIAL, residential_selection,
};
use crate::color::NamedColor;
use crate::descriptor::{ColorConditions, StyleDescriptor};
use crate::error::StyleError;
use crate::expr::Expr;
use crate::mode::DisplayMode;
use crate::value::Value;

/// Level thresholds, highest first. Every threshold is inclusive.
pub const HEIGHT_BANDS: [(f64, NamedColor); 4] = [
    (30.0, NamedColor::Gold),
    (20.0, NamedColor::Purple),
    (10.0, NamedColor::Violet),
    (5.0, NamedColor::DeepSkyBlue),
];
/// Color for buildings under the lowest height band.
pub const LOW_RISE: NamedColor = NamedColor::Chartreuse;

/// Degree-space distance thresholds, farthest first. Every threshold is exclusive.
pub const DISTANCE_BANDS: [(f64, NamedColor); 4] = [
    (0.05, NamedColor::Gold),
    (0.03, NamedColor::DeepSkyBlue),
    (0.01, NamedColor::Tomato),
    (0.0001, NamedColor::Chartreuse),
];

pub const SCHOOL_HIGHLIGHT: NamedColor = NamedColor::Fuchsia;

const HEIGHT: &str = "height";
const PART_HEIGHT: &str = "height2";
const DISTANCE: &str = "distance";
const BUILDING_TYPE: &str = "building_type";
const PART_TYPE: &str = "building_type2";

/// Colors buildings by level count, using the part's levels when the
/// building itself has none.
pub fn by_height() -> StyleDescriptor {
    let h = Expr::var(HEIGHT);
    let h2 = Expr::var(PART_HEIGHT);

    let mut conditions = ColorConditions::new(NamedColor::White);
    for (threshold, color) in HEIGHT_BANDS {
        conditions = conditions.when(
            h.clone()
                .ge(Expr::number(threshold))
                .or(h2.clone().ge(Expr::number(threshold))),
            color,
        );
    }
    let (lowest, _) = HEIGHT_BANDS[HEIGHT_BANDS.len() - 1];
    conditions = conditions.when(
        h.lt(Expr::number(lowest)).or(h2.lt(Expr::number(lowest))),
        LOW_RISE,
    );

    StyleDescriptor::color(conditions)
        .define(HEIGHT, Expr::to_number(Expr::feature(LEVELS_TAG)))
        .define(PART_HEIGHT, Expr::to_number(Expr::feature(PART_LEVELS_TAG)))
}

/// Classifies buildings by their OSM type.
///
/// Groups are tested in order, so a house matches the house group before the
/// residential one.
pub fn by_type() -> StyleDescriptor {
    let t = Expr::var(BUILDING_TYPE);
    let t2 = Expr::var(PART_TYPE);
    let group = |values: &[&str]| Expr::one_of(&t, values.iter().copied());

    let mut conditions = ColorConditions::new(NamedColor::White)
        .when(t.clone().strict_eq(Expr::null()), NamedColor::White);
    let groups: [(&[&str], NamedColor); 6] = [
        (HOUSE, NamedColor::SkyBlue),
        (RETAIL_INDUSTRIAL, NamedColor::Violet),
        (HOTEL, NamedColor::Purple),
        (RESIDENTIAL, NamedColor::IndianRed),
        (PUBLIC_INSTITUTIONAL, NamedColor::Green),
        (EDUCATION, NamedColor::DodgerBlue),
    ];
    for (values, color) in groups {
        if let Some(when) = group(values) {
            conditions = conditions.when(when, color);
        }
    }
    if let Some(commercial) = group(COMMERCIAL) {
        let part_commercial = t2.strict_eq(Expr::string(COMMERCIAL[0]));
        conditions = conditions.when(commercial.or(part_commercial), NamedColor::Yellow);
    }

    StyleDescriptor::color(conditions)
        .define(BUILDING_TYPE, Expr::feature(BUILDING_TAG))
        .define(PART_TYPE, Expr::feature(BUILDING_PART_TAG))
}

/// Colors buildings by degree-space distance from `origin`.
///
/// The origin's literals are embedded in the expression; nothing outside the
/// descriptor is captured.
pub fn by_distance(origin: LatLon) -> StyleDescriptor {
    let [lon, lat] = origin.lon_lat();
    let distance = Expr::distance(
        Expr::vec2(Expr::feature(LONGITUDE_TAG), Expr::feature(LATITUDE_TAG)),
        Expr::vec2(Expr::number(lon), Expr::number(lat)),
    );

    let d = Expr::var(DISTANCE);
    let mut conditions = ColorConditions::new(NamedColor::White);
    for (threshold, color) in DISTANCE_BANDS {
        conditions = conditions.when(d.clone().gt(Expr::number(threshold)), color);
    }
    StyleDescriptor::color(conditions).define(DISTANCE, distance)
}

pub fn highlight_school() -> StyleDescriptor {
    let b = Expr::feature(BUILDING_TAG);
    let mut conditions = ColorConditions::new(NamedColor::White);
    if let Some(when) = Expr::one_of(&b, ["university", "school"]) {
        conditions = conditions.when(when, SCHOOL_HIGHLIGHT);
    }
    StyleDescriptor::color(conditions)
}

/// Shows only residential buildings of the requested type, hiding the rest.
///
/// `"residential"` selects the whole family; `"apartments"` or `"house"`
/// select just that type.
pub fn show_residential(building_type: &str) -> Result<StyleDescriptor, StyleError> {
    residential_selection(building_type)
        .map(visible_types)
        .ok_or_else(|| StyleError::NotResidential(building_type.to_string()))
}

/// Descriptor for `mode`. `distance_origin` is only read by
/// [`DisplayMode::ByDistance`].
pub fn style_for(mode: DisplayMode, distance_origin: LatLon) -> StyleDescriptor {
    match mode {
        DisplayMode::ByHeight => by_height(),
        DisplayMode::ByDistance => by_distance(distance_origin),
        DisplayMode::ByType => by_type(),
        DisplayMode::HighlightSchool => highlight_school(),
        DisplayMode::ShowResidential => visible_types(RESIDENTIAL),
    }
}

fn visible_types(types: &[&str]) -> StyleDescriptor {
    let b = Expr::feature(BUILDING_TAG);
    let show = Expr::one_of(&b, types.iter().copied())
        .unwrap_or(Expr::Literal(Value::Bool(false)));
    StyleDescriptor::show(show)
}

#[cfg(test)]
mod tests {
    use foundation::math::LatLon;
    use pretty_assertions::assert_eq;

    use super::{
        by_distance, by_height, by_type, highlight_school, show_residential, style_for,
    };
    use crate::color::NamedColor;
    use crate::descriptor::{Condition, StyleDescriptor};
    use crate::error::StyleError;
    use crate::expr::{BinaryOp, Expr};
    use crate::mode::DisplayMode;
    use crate::value::{FeatureProperties, Value};

    fn color_of(d: &StyleDescriptor, f: FeatureProperties) -> NamedColor {
        d.evaluate(&f).color.expect("color rule")
    }

    fn levels(n: &str) -> FeatureProperties {
        FeatureProperties::new().with("building:levels", n)
    }

    fn building(t: &str) -> FeatureProperties {
        FeatureProperties::new().with("building", t)
    }

    fn at(lat: f64, lon: f64) -> FeatureProperties {
        FeatureProperties::new()
            .with("cesium#latitude", lat)
            .with("cesium#longitude", lon)
    }

    /// Thresholds of `${distance} > n` clauses, in evaluation order.
    fn distance_thresholds(d: &StyleDescriptor) -> Vec<f64> {
        d.color_conditions()
            .unwrap()
            .clauses()
            .iter()
            .filter_map(|c| match &c.when {
                Expr::Binary(BinaryOp::Gt, lhs, rhs) if **lhs == Expr::var("distance") => {
                    match **rhs {
                        Expr::Literal(Value::Number(n)) => Some(n),
                        _ => None,
                    }
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn height_bands() {
        let d = by_height();
        assert_eq!(color_of(&d, levels("25")), NamedColor::Purple);
        assert_eq!(color_of(&d, levels("31")), NamedColor::Gold);
        assert_eq!(color_of(&d, levels("3")), NamedColor::Chartreuse);
        assert_eq!(color_of(&d, levels("7")), NamedColor::DeepSkyBlue);
        assert_eq!(color_of(&d, levels("12")), NamedColor::Violet);
    }

    #[test]
    fn hex_level_tags_are_numbers() {
        let d = by_height();
        assert_eq!(color_of(&d, levels("0x20")), NamedColor::Gold);
        assert_eq!(color_of(&d, levels("0b110")), NamedColor::DeepSkyBlue);
    }

    #[test]
    fn height_boundaries_favor_higher_band() {
        let d = by_height();
        assert_eq!(color_of(&d, levels("30")), NamedColor::Gold);
        assert_eq!(color_of(&d, levels("20")), NamedColor::Purple);
        assert_eq!(color_of(&d, levels("5")), NamedColor::DeepSkyBlue);
    }

    #[test]
    fn height_falls_back_to_part_levels() {
        let d = by_height();
        let part = FeatureProperties::new().with("part#building:levels", "22");
        assert_eq!(color_of(&d, part), NamedColor::Purple);
        assert_eq!(color_of(&d, FeatureProperties::new()), NamedColor::White);
        assert_eq!(color_of(&d, levels("many")), NamedColor::White);
    }

    #[test]
    fn height_expressions_render_like_tile_styles() {
        let json = by_height().to_json();
        assert_eq!(json["defines"]["height"], "Number(${feature['building:levels']})");
        assert_eq!(
            json["color"]["conditions"][0],
            serde_json::json!(["${height} >= 30 || ${height2} >= 30", "color('gold')"])
        );
        assert_eq!(
            json["color"]["conditions"][4],
            serde_json::json!(["${height} < 5 || ${height2} < 5", "color('chartreuse')"])
        );
        assert_eq!(json["color"]["conditions"][5], serde_json::json!(["true", "color('white')"]));
    }

    #[test]
    fn type_classification() {
        let d = by_type();
        assert_eq!(color_of(&d, building("school")), NamedColor::DodgerBlue);
        assert_eq!(color_of(&d, building("hotel")), NamedColor::Purple);
        assert_eq!(color_of(&d, building("house")), NamedColor::SkyBlue);
        assert_eq!(color_of(&d, building("apartments")), NamedColor::IndianRed);
        assert_eq!(color_of(&d, building("industrial")), NamedColor::Violet);
        assert_eq!(color_of(&d, building("hospital")), NamedColor::Green);
        assert_eq!(color_of(&d, building("office")), NamedColor::Yellow);
        assert_eq!(color_of(&d, building("barn")), NamedColor::White);

        let null = FeatureProperties::new().with("building", Value::Null);
        assert_eq!(color_of(&d, null), NamedColor::White);

        let part = FeatureProperties::new()
            .with("building", "yes")
            .with("part#building:part", "commercial");
        assert_eq!(color_of(&d, part), NamedColor::Yellow);
    }

    #[test]
    fn type_null_clause_comes_first() {
        let d = by_type();
        let first = &d.color_conditions().unwrap().clauses()[0];
        assert_eq!(first.when.to_string(), "${building_type} === null");
        assert_eq!(first.color, NamedColor::White);
        assert_eq!(d.color_conditions().unwrap().clauses().len(), 8);
    }

    #[test]
    fn distance_bands_decrease_and_end_in_catch_all() {
        let d = by_distance(LatLon::new(25.03396, 121.5645));
        let thresholds = distance_thresholds(&d);
        assert_eq!(thresholds, vec![0.05, 0.03, 0.01, 0.0001]);
        assert!(thresholds.windows(2).all(|w| w[0] > w[1]));

        let conds: Vec<_> = d.color_conditions().unwrap().conditions().collect();
        assert_eq!(conds.last(), Some(&(Condition::Always, NamedColor::White)));
        let colors: Vec<_> = conds.iter().map(|(_, c)| *c).collect();
        assert_eq!(
            colors,
            vec![
                NamedColor::Gold,
                NamedColor::DeepSkyBlue,
                NamedColor::Tomato,
                NamedColor::Chartreuse,
                NamedColor::White
            ]
        );
    }

    #[test]
    fn distance_embeds_origin_in_lon_lat_order() {
        let d = by_distance(LatLon::new(25.03396, 121.5645));
        assert_eq!(
            d.defined("distance").unwrap().to_string(),
            "distance(vec2(${feature['cesium#longitude']}, ${feature['cesium#latitude']}), \
             vec2(121.5645, 25.03396))"
        );
    }

    #[test]
    fn distance_colors() {
        let d = by_distance(LatLon::new(25.0, 121.0));
        assert_eq!(color_of(&d, at(25.0, 121.1)), NamedColor::Gold);
        assert_eq!(color_of(&d, at(25.04, 121.0)), NamedColor::DeepSkyBlue);
        assert_eq!(color_of(&d, at(25.02, 121.0)), NamedColor::Tomato);
        assert_eq!(color_of(&d, at(25.001, 121.0)), NamedColor::Chartreuse);
        assert_eq!(color_of(&d, at(25.0, 121.0)), NamedColor::White);
        assert_eq!(color_of(&d, FeatureProperties::new()), NamedColor::White);
    }

    #[test]
    fn schools_are_highlighted() {
        let d = highlight_school();
        assert_eq!(color_of(&d, building("university")), NamedColor::Fuchsia);
        assert_eq!(color_of(&d, building("school")), NamedColor::Fuchsia);
        assert_eq!(color_of(&d, building("hotel")), NamedColor::White);
    }

    #[test]
    fn residential_visibility() {
        let d = show_residential("residential").unwrap();
        assert!(d.color_conditions().is_none());
        for t in ["residential", "apartments", "house"] {
            assert!(d.evaluate(&building(t)).show, "{t} should be shown");
        }
        assert!(!d.evaluate(&building("office")).show);
        assert!(!d.evaluate(&FeatureProperties::new()).show);
        assert_eq!(
            d.to_json()["show"],
            "${feature['building']} === 'residential' || ${feature['building']} === 'apartments' \
             || ${feature['building']} === 'house'"
        );
    }

    #[test]
    fn residential_single_member_and_rejection() {
        let d = show_residential("apartments").unwrap();
        assert!(d.evaluate(&building("apartments")).show);
        assert!(!d.evaluate(&building("house")).show);
        assert_eq!(
            show_residential("hotel"),
            Err(StyleError::NotResidential("hotel".to_string()))
        );
    }

    #[test]
    fn style_for_matches_catalog() {
        let origin = LatLon::new(22.61162, 120.30016);
        assert_eq!(style_for(DisplayMode::ByHeight, origin), by_height());
        assert_eq!(style_for(DisplayMode::ByDistance, origin), by_distance(origin));
        assert_eq!(style_for(DisplayMode::ByType, origin), by_type());
        assert_eq!(style_for(DisplayMode::HighlightSchool, origin), highlight_school());
        assert_eq!(
            style_for(DisplayMode::ShowResidential, origin),
            show_residential("residential").unwrap()
        );
    }

    #[test]
    fn catalog_is_deterministic() {
        assert_eq!(by_type().to_json(), by_type().to_json());
        assert_eq!(
            by_distance(LatLon::new(1.0, 2.0)),
            by_distance(LatLon::new(1.0, 2.0))
        );
    }
}
