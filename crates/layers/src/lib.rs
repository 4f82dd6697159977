pub mod containment;
pub mod feature;
pub mod places;
pub mod properties;
pub mod query;

pub use containment::*;
pub use feature::*;
pub use places::*;
pub use query::*;
