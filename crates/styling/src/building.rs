//! OSM `building=*` values grouped the way the type styles classify them.

/// Tag holding the primary building type.
pub const BUILDING_TAG: &str = "building";
/// Tag holding the type of a building part.
pub const BUILDING_PART_TAG: &str = "part#building:part";
/// Tag holding the number of levels.
pub const LEVELS_TAG: &str = "building:levels";
/// Tag holding the number of levels of a building part.
pub const PART_LEVELS_TAG: &str = "part#building:levels";
/// Feature latitude in degrees, filled in by the tileset.
pub const LATITUDE_TAG: &str = "cesium#latitude";
/// Feature longitude in degrees, filled in by the tileset.
pub const LONGITUDE_TAG: &str = "cesium#longitude";

pub const HOUSE: &[&str] = &["house"];
pub const RETAIL_INDUSTRIAL: &[&str] = &["retail", "industrial"];
pub const HOTEL: &[&str] = &["hotel"];
pub const RESIDENTIAL: &[&str] = &["residential", "apartments", "house"];
pub const PUBLIC_INSTITUTIONAL: &[&str] = &[
    "public",
    "government",
    "stadium",
    "hospital",
    "construction",
    "service",
];
pub const EDUCATION: &[&str] = &["school", "university"];
pub const COMMERCIAL: &[&str] = &["commercial", "office"];

/// Name that selects the whole residential family.
pub const RESIDENTIAL_FAMILY: &str = "residential";

/// Building types shown for a residential visibility request.
///
/// The family name selects every member; an individual member selects only
/// itself. Anything else is not residential.
pub fn residential_selection(building_type: &str) -> Option<&'static [&'static str]> {
    let wanted = building_type.trim();
    if wanted.eq_ignore_ascii_case(RESIDENTIAL_FAMILY) {
        return Some(RESIDENTIAL);
    }
    RESIDENTIAL
        .iter()
        .position(|member| member.eq_ignore_ascii_case(wanted))
        .map(|i| &RESIDENTIAL[i..=i])
}
