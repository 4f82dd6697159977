pub mod picking;
pub mod selection;

pub use picking::*;
pub use selection::*;
