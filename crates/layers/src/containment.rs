//! Even-odd point-in-polygon tests in (lon, lat) space.
//!
//! A horizontal ray is cast from the point towards +lon and boundary
//! crossings are counted; an odd count means inside. Points exactly on an
//! edge or vertex may classify either way.

use foundation::math::GeoPoint;

use crate::feature::{Feature, FeatureGeometry, Polygon, Ring};

pub fn ring_contains(point: GeoPoint, ring: &Ring) -> bool {
    let pts = ring.points();
    if pts.len() < 3 {
        return false;
    }
    let (lon, lat) = (point.lon_deg, point.lat_deg);
    if let Some(b) = ring.bounds()
        && !b.contains([lon, lat])
    {
        return false;
    }

    let mut inside = false;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        let [xi, yi] = pts[i];
        let [xj, yj] = pts[j];
        // The first clause guarantees yi != yj, so the division is safe.
        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Inside the outer ring and inside none of the holes.
pub fn polygon_contains(point: GeoPoint, polygon: &Polygon) -> bool {
    let Some(outer) = polygon.outer() else {
        return false;
    };
    ring_contains(point, outer) && !polygon.holes().iter().any(|h| ring_contains(point, h))
}

pub fn feature_contains(point: GeoPoint, feature: &Feature) -> bool {
    match &feature.geometry {
        FeatureGeometry::Polygon(p) => polygon_contains(point, p),
        FeatureGeometry::MultiPolygon(ps) => ps.iter().any(|p| polygon_contains(point, p)),
    }
}
