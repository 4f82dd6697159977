//! Coordinate to display name, trying local datasets before the network.

pub mod naming;
pub mod pipeline;

pub use naming::*;
pub use pipeline::*;
