pub mod building;
pub mod color;
pub mod descriptor;
pub mod error;
pub mod expr;
pub mod mode;
pub mod style_catalog;
pub mod value;

pub use color::*;
pub use descriptor::*;
pub use error::*;
pub use expr::*;
pub use mode::*;
pub use style_catalog::*;
pub use value::*;
