use std::fmt;

use catalog::CatalogError;

/// Programmer errors in UI event routing. These are surfaced to the caller,
/// never defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    InvalidMode(usize),
    InvalidCity { index: usize, len: usize },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidMode(index) => write!(f, "no display mode at index {index}"),
            SessionError::InvalidCity { index, len } => {
                write!(f, "city index {index} out of range (catalog has {len})")
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Pick events that resolve to nothing usable. Always recovered locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickError {
    /// Picking is disabled; the event arrived after unsubscribing.
    Inactive,
    /// The click hit sky, terrain or anything but a building.
    NoFeaturePicked,
    MissingFeatureTag(&'static str),
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickError::Inactive => write!(f, "picking is not enabled"),
            PickError::NoFeaturePicked => write!(f, "no feature under cursor"),
            PickError::MissingFeatureTag(tag) => write!(f, "picked feature has no {tag} tag"),
        }
    }
}

impl std::error::Error for PickError {}

/// Failures reported by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    ViewerInit(String),
    TilesetLoad(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::ViewerInit(msg) => write!(f, "viewer init failed: {msg}"),
            HostError::TilesetLoad(msg) => write!(f, "building tileset load failed: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    Config(CatalogError),
    Host(HostError),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::Config(e) => write!(f, "invalid config: {e}"),
            BootstrapError::Host(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BootstrapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BootstrapError::Config(e) => Some(e),
            BootstrapError::Host(e) => Some(e),
        }
    }
}

impl From<CatalogError> for BootstrapError {
    fn from(e: CatalogError) -> Self {
        BootstrapError::Config(e)
    }
}

impl From<HostError> for BootstrapError {
    fn from(e: HostError) -> Self {
        BootstrapError::Host(e)
    }
}
