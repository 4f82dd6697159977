//! Globe / flat-map location picker.
//!
//! The host supplies the renderers ([`views::GlobeScene`], [`views::TileMap`])
//! and forwards input events; this crate keeps the selection in sync across
//! both views, names the picked place and requests the weather prediction.

pub mod app;
pub mod config;
pub mod controller;
pub mod predict;
pub mod telemetry;
pub mod views;

pub use app::*;
pub use config::PickerConfig;
pub use controller::{LocationLabel, PickController, ResolveOutcome};
pub use predict::{PredictionStatus, PredictionTrigger};
pub use views::{FlatMapView, GlobeScene, GlobeView, TileMap};
