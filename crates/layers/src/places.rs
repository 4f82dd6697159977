use foundation::math::{GeoPoint, haversine_distance_km};

/// Kilometers per degree of latitude, rounded down so the prefilter window
/// is never narrower than the search radius.
pub const KM_PER_DEGREE: f64 = 111.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedPlace {
    pub position: GeoPoint,
    pub name: Option<String>,
    pub population: Option<f64>,
}

impl PopulatedPlace {
    pub fn new(position: GeoPoint, name: Option<String>, population: Option<f64>) -> Self {
        Self {
            position,
            name,
            population,
        }
    }
}

/// Cheap lon/lat window used to skip places that cannot be within range
/// before computing exact distances.
///
/// The longitude half-width is scaled by the latitude closest to a pole
/// inside the window, and wraps across the antimeridian. Windows that reach
/// a pole accept every longitude.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SearchWindow {
    center: GeoPoint,
    half_lat_deg: f64,
    /// `None` means every longitude.
    half_lon_deg: Option<f64>,
}

impl SearchWindow {
    pub fn around(center: GeoPoint, radius_km: f64) -> Self {
        let half_lat_deg = radius_km / KM_PER_DEGREE;
        let poleward = center.lat_deg.abs() + half_lat_deg;
        let half_lon_deg = if poleward >= 90.0 {
            None
        } else {
            let w = half_lat_deg / poleward.to_radians().cos();
            (w < 180.0).then_some(w)
        };
        Self {
            center,
            half_lat_deg,
            half_lon_deg,
        }
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        if (p.lat_deg - self.center.lat_deg).abs() > self.half_lat_deg {
            return false;
        }
        let Some(half_lon) = self.half_lon_deg else {
            return true;
        };
        let d = (p.lon_deg - self.center.lon_deg).rem_euclid(360.0);
        d.min(360.0 - d) <= half_lon
    }
}

/// Nearest place within `max_distance_km` of `point`.
///
/// Ties keep the place seen first in `places` order.
pub fn find_nearest_place(
    point: GeoPoint,
    places: &[PopulatedPlace],
    max_distance_km: f64,
) -> Option<&PopulatedPlace> {
    let window = SearchWindow::around(point, max_distance_km);

    let mut best: Option<(f64, &PopulatedPlace)> = None;
    for place in places.iter().filter(|p| window.contains(p.position)) {
        let d = haversine_distance_km(point, place.position);
        if best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, place));
        }
    }

    let (d, place) = best?;
    tracing::trace!(distance_km = d, name = ?place.name, "nearest populated place");
    (d <= max_distance_km).then_some(place)
}
