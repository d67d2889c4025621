use foundation::camera::CameraPose;
use foundation::math::LatLon;
use serde::{Deserialize, Serialize};

/// A city the camera can fly to from the city dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityPreset {
    pub name: String,
    pub pose: CameraPose,
    /// Default origin of the distance style while this city is selected.
    pub landmark: LatLon,
}

impl CityPreset {
    pub fn new(name: impl Into<String>, pose: CameraPose, landmark: LatLon) -> Self {
        Self {
            name: name.into(),
            pose,
            landmark,
        }
    }

    pub fn taipei() -> Self {
        Self::new(
            "Taipei",
            CameraPose::from_degrees(25.02477237064501, 121.56486743767994, 650.0, 0.0, -20.0),
            // Taipei 101.
            LatLon::new(25.03396, 121.5645),
        )
    }

    pub fn taichung() -> Self {
        Self::new(
            "Taichung",
            CameraPose::from_degrees(24.15635, 120.64049, 450.0, 0.0, -20.0),
            LatLon::new(24.16293, 120.64052),
        )
    }

    pub fn kaohsiung() -> Self {
        Self::new(
            "Kaohsiung",
            CameraPose::from_degrees(22.60157, 120.29859, 650.0, 0.0, -20.0),
            LatLon::new(22.61162, 120.30016),
        )
    }
}

/// Ordered city presets; index `i` is entry `i` of the city dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityCatalog {
    cities: Vec<CityPreset>,
}

impl CityCatalog {
    pub fn new(cities: Vec<CityPreset>) -> Result<Self, CatalogError> {
        if cities.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, city) in cities.iter().enumerate() {
            if !city.landmark.is_finite() || !city.pose.position.is_finite() {
                return Err(CatalogError::InvalidCoordinates(city.name.clone()));
            }
            if cities[..i].iter().any(|c| c.name == city.name) {
                return Err(CatalogError::DuplicateCity(city.name.clone()));
            }
        }
        Ok(Self { cities })
    }

    pub fn get(&self, index: usize) -> Option<&CityPreset> {
        self.cities.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.cities
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CityPreset> {
        self.cities.iter()
    }
}

impl Default for CityCatalog {
    fn default() -> Self {
        Self {
            cities: vec![
                CityPreset::taipei(),
                CityPreset::taichung(),
                CityPreset::kaohsiung(),
            ],
        }
    }
}

/// Terrain provider requested from the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainSource {
    /// The renderer's global world terrain.
    #[default]
    World,
    /// Flat ellipsoid, no terrain tiles.
    Ellipsoid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// DOM id of the element the viewer mounts into.
    pub container_id: String,
    pub terrain: TerrainSource,
    /// Ion access token. Left unset, the renderer's default token applies.
    pub access_token: Option<String>,
    /// Pose flown to once the building tileset has loaded.
    pub initial_pose: CameraPose,
    pub cities: CityCatalog,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            container_id: "cesiumContainer".to_string(),
            terrain: TerrainSource::World,
            access_token: None,
            initial_pose: CameraPose::from_degrees(25.02293, 121.56473, 600.0, 0.0, -15.0),
            cities: CityCatalog::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses a JSON config; missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let config: ViewerConfig =
            serde_json::from_str(text).map_err(|e| CatalogError::Corrupt(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.container_id.trim().is_empty() {
            return Err(CatalogError::MissingContainer);
        }
        // Re-run the catalog checks: serde bypasses `CityCatalog::new`.
        CityCatalog::new(self.cities.cities.clone()).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Empty,
    DuplicateCity(String),
    InvalidCoordinates(String),
    MissingContainer,
    Corrupt(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "city catalog is empty"),
            CatalogError::DuplicateCity(name) => write!(f, "duplicate city preset: {name}"),
            CatalogError::InvalidCoordinates(name) => {
                write!(f, "city preset {name} has non-finite coordinates")
            }
            CatalogError::MissingContainer => write!(f, "viewer container id is empty"),
            CatalogError::Corrupt(msg) => write!(f, "viewer config corrupt: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}
