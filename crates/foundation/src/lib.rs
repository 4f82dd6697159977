pub mod bounds;
pub mod fields;
pub mod math;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use fields::*;
pub use math::*;
