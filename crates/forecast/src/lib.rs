//! Weather prediction requests and the tolerant decoding of their replies.

pub mod client;
pub mod reading;

pub use client::*;
pub use reading::*;
