#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// The requested building type is not part of the residential family.
    NotResidential(String),
    /// A display mode name that no dropdown entry maps to.
    UnknownMode(String),
}

impl std::fmt::Display for StyleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleError::NotResidential(t) => write!(f, "building type {t:?} is not residential"),
            StyleError::UnknownMode(m) => write!(f, "unknown display mode {m:?}"),
        }
    }
}

impl std::error::Error for StyleError {}
