//! Reverse and forward geocoding against a Nominatim-compatible service.

pub mod client;
pub mod response;

pub use client::*;
pub use response::*;
