//! Helpers behind the `citystyle` command line.

use std::fs;
use std::path::Path;

use catalog::{CityCatalog, ViewerConfig};
use foundation::math::LatLon;
use serde::Serialize;
use styling::{
    Appearance, DisplayMode, FeatureProperties, StyleDescriptor, Value, show_residential,
    style_for,
};

pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig, String> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    ViewerConfig::from_json(&text).map_err(|e| format!("{path:?}: {e}"))
}

/// Accepts a dropdown index (`1`) or a city name (`taichung`).
pub fn resolve_city(cities: &CityCatalog, key: &str) -> Result<usize, String> {
    let index = match key.parse::<usize>() {
        Ok(i) => i,
        Err(_) => cities
            .position(key)
            .ok_or_else(|| format!("unknown city: {key}"))?,
    };
    if cities.get(index).is_none() {
        return Err(format!(
            "city index {index} out of range (catalog has {})",
            cities.len()
        ));
    }
    Ok(index)
}

/// Parses `LAT,LON` in degrees.
pub fn parse_origin(s: &str) -> Result<LatLon, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {s:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("latitude {lat:?}: {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("longitude {lon:?}: {e}"))?;
    let origin = LatLon::new(lat, lon);
    if !origin.is_finite() || lat.abs() > 90.0 || lon.abs() > 180.0 {
        return Err(format!("origin out of range: {s}"));
    }
    Ok(origin)
}

/// Parses `KEY=VALUE`. The literal value `null` becomes a null tag; anything
/// else stays a string, as tiles store them.
pub fn parse_tag(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    if key.is_empty() {
        return Err(format!("empty tag name in {s:?}"));
    }
    let value = if value == "null" {
        Value::Null
    } else {
        Value::from(value)
    };
    Ok((key.to_string(), value))
}

pub fn feature_from_tags(tags: &[(String, Value)]) -> FeatureProperties {
    let mut feature = FeatureProperties::new();
    for (k, v) in tags {
        feature.insert(k.clone(), v.clone());
    }
    feature
}

/// Which inputs select the style to print or evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRequest {
    pub mode: DisplayMode,
    pub city: usize,
    pub origin: Option<LatLon>,
    pub residential: Option<String>,
}

pub fn build_style(cities: &CityCatalog, req: &StyleRequest) -> Result<StyleDescriptor, String> {
    if let (DisplayMode::ShowResidential, Some(kind)) = (req.mode, req.residential.as_deref()) {
        return show_residential(kind).map_err(|e| e.to_string());
    }
    let city = cities
        .get(req.city)
        .ok_or_else(|| format!("city index {} out of range", req.city))?;
    let origin = req.origin.unwrap_or(city.landmark);
    Ok(style_for(req.mode, origin))
}

#[derive(Debug, Serialize)]
pub struct Classification {
    pub mode: String,
    pub show: bool,
    pub color: Option<String>,
    pub hex: Option<String>,
}

pub fn classify(mode: DisplayMode, appearance: Appearance) -> Classification {
    Classification {
        mode: mode.to_string(),
        show: appearance.show,
        color: appearance.color.map(|c| c.to_string()),
        hex: appearance.color.map(|c| c.hex()),
    }
}

/// One line per display mode in dropdown order: index, name, label.
pub fn mode_listing() -> Vec<String> {
    DisplayMode::ALL
        .iter()
        .map(|m| format!("{}\t{}\t{}", m.index(), m.name(), m.label()))
        .collect()
}
