pub mod datasets;
pub mod source;

pub use datasets::*;
pub use source::*;
