pub mod camera;
pub mod math;

// Foundation crate: small, well-tested primitives only.
pub use camera::*;
pub use math::*;
