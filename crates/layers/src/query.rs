use foundation::math::GeoPoint;

use crate::containment::feature_contains;
use crate::feature::{Feature, FeatureCollection};

/// First feature, in collection order, that contains `point`.
///
/// Linear in the total vertex count; nothing is cached between calls.
pub fn find_containing_feature(point: GeoPoint, collection: &FeatureCollection) -> Option<&Feature> {
    collection
        .features
        .iter()
        .find(|f| feature_contains(point, f))
}
