//! The globe and flat-map views, reduced to what picking needs from them.
//!
//! Rendering stays with the host. A view turns its native input into a
//! [`GeoPoint`], writes it to the shared [`SelectionStore`] and moves its own
//! marker. When it becomes the active view it re-reads the store, so a pick
//! made in the other view shows up here.

use std::sync::Arc;

use foundation::math::{GeoPoint, Vec3};
use layers::feature::FeatureCollection;
use scene::picking::{GlobeFrame, Ray};
use scene::selection::SelectionStore;
use tracing::debug;

/// 3D renderer behind the globe view. Coordinates are in the scene frame.
pub trait GlobeScene {
    /// Ray from the active camera through a screen position, if the
    /// position is on the canvas.
    fn pick_ray(&self, x_px: f64, y_px: f64) -> Option<Ray>;
    fn place_marker(&mut self, at: Vec3);
    /// Land outlines in geographic coordinates, handed over once at startup.
    fn draw_land(&mut self, land: &FeatureCollection);
    /// Moves the camera to `eye`, looking at the globe center.
    fn look_from(&mut self, eye: Vec3);
}

/// Slippy-map widget behind the flat view.
pub trait TileMap {
    fn place_marker(&mut self, at: GeoPoint);
    fn center(&mut self, at: GeoPoint, zoom: u8);
}

pub struct GlobeView<S> {
    scene: S,
    frame: GlobeFrame,
    store: Arc<SelectionStore>,
}

impl<S: GlobeScene> GlobeView<S> {
    pub fn new(scene: S, frame: GlobeFrame, store: Arc<SelectionStore>) -> Self {
        Self { scene, frame, store }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn frame(&self) -> &GlobeFrame {
        &self.frame
    }

    /// Pointer down at a screen position. Misses leave the selection alone.
    pub fn pick(&mut self, x_px: f64, y_px: f64) -> Option<GeoPoint> {
        let ray = self.scene.pick_ray(x_px, y_px)?;
        let hit = self.frame.pick(ray)?;
        self.scene.place_marker(hit.surface);
        self.store.set(hit.point);
        debug!(lat = hit.point.lat_deg, lon = hit.point.lon_deg, "globe pick");
        Some(hit.point)
    }

    /// Marker on `point` and the camera straight above it.
    pub fn show(&mut self, point: GeoPoint) {
        self.scene.place_marker(self.frame.geo_to_scene(point));
        if let Some(eye) = self.frame.camera_position(point) {
            self.scene.look_from(eye);
        }
    }

    /// Re-centers on the current selection, if any.
    pub fn activate(&mut self) -> Option<GeoPoint> {
        let point = self.store.get()?;
        self.show(point);
        Some(point)
    }
}

pub struct FlatMapView<M> {
    map: M,
    zoom: u8,
    store: Arc<SelectionStore>,
}

impl<M: TileMap> FlatMapView<M> {
    pub fn new(map: M, zoom: u8, store: Arc<SelectionStore>) -> Self {
        Self { map, zoom, store }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// Map click. The map keeps its current viewport.
    pub fn click(&mut self, point: GeoPoint) -> GeoPoint {
        self.map.place_marker(point);
        self.store.set(point);
        debug!(lat = point.lat_deg, lon = point.lon_deg, "map click");
        point
    }

    pub fn show(&mut self, point: GeoPoint) {
        self.map.place_marker(point);
        self.map.center(point, self.zoom);
    }

    pub fn activate(&mut self) -> Option<GeoPoint> {
        let point = self.store.get()?;
        self.show(point);
        Some(point)
    }
}
