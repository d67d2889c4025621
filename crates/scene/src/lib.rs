pub mod error;
pub mod host;
pub mod picking;
pub mod selection;
pub mod session;

#[cfg(test)]
mod testing;

pub use error::*;
pub use host::*;
pub use picking::*;
pub use selection::*;
pub use session::*;
