//! Request bookkeeping for asynchronous UI work.

pub mod busy;
pub mod generation;

pub use busy::*;
pub use generation::*;
