use serde::{Deserialize, Serialize};

use super::Vec3;
use super::precision::stable_total_cmp_f64;

/// Mean Earth radius (kilometers) used for great-circle distances.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0;

/// Geographic coordinate in degrees.
///
/// Ranges (`lat_deg` in [-90, 90], `lon_deg` in [-180, 180]) are a caller
/// contract; nothing here validates them.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat")]
    pub lat_deg: f64,
    #[serde(rename = "lon")]
    pub lon_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }

    /// `"lat, lon"` with six decimals, as shown to (and copied by) the user.
    pub fn coordinate_text(&self) -> String {
        format!("{:.6}, {:.6}", self.lat_deg, self.lon_deg)
    }
}

/// Recovers the geographic coordinate of a point on (or near) a sphere
/// centered at the origin, with +Z through the north pole and +X through
/// (0°, 0°).
///
/// The origin itself has no defined coordinate; the result is NaN there.
pub fn sphere_to_geo(p: Vec3) -> GeoPoint {
    let r = p.length();
    let lat = (p.z / r).clamp(-1.0, 1.0).asin().to_degrees();
    let lon = p.y.atan2(p.x).to_degrees();
    GeoPoint::new(lat, lon)
}

/// Places a geographic coordinate on a sphere of `radius`.
///
/// Longitude is measured from a 180° offset origin and latitude is turned
/// into a polar angle (`90° - lat`); the signs are chosen so that
/// [`sphere_to_geo`] is the exact inverse.
pub fn geo_to_sphere(lon_deg: f64, lat_deg: f64, radius: f64) -> Vec3 {
    let polar = (90.0 - lat_deg).to_radians();
    let theta = (lon_deg + 180.0).to_radians();
    let (sin_polar, cos_polar) = polar.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(
        -(radius * sin_polar * cos_theta),
        -(radius * sin_polar * sin_theta),
        radius * cos_polar,
    )
}

/// Great-circle distance in kilometers on a sphere of
/// [`EARTH_MEAN_RADIUS_KM`].
///
/// Arguments are put into a canonical order first so that
/// `haversine_distance_km(a, b) == haversine_distance_km(b, a)` holds
/// bit-for-bit.
pub fn haversine_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let swap = stable_total_cmp_f64(a.lat_deg, b.lat_deg)
        .then_with(|| stable_total_cmp_f64(a.lon_deg, b.lon_deg))
        .is_gt();
    let (a, b) = if swap { (b, a) } else { (a, b) };

    let lat1 = a.lat_deg.to_radians();
    let lat2 = b.lat_deg.to_radians();
    let d_lat = (b.lat_deg - a.lat_deg).to_radians();
    let d_lon = (b.lon_deg - a.lon_deg).to_radians();

    let s_lat = (d_lat / 2.0).sin();
    let s_lon = (d_lon / 2.0).sin();
    let h = s_lat * s_lat + lat1.cos() * lat2.cos() * s_lon * s_lon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_MEAN_RADIUS_KM * c
}
