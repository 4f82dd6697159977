use foundation::bounds::Aabb2;
use foundation::fields::FieldAliases;
use serde_json::{Map, Value};

/// Closed boundary as `[lon, lat]` pairs. The closing vertex may or may not
/// repeat the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<[f64; 2]>,
    bounds: Option<Aabb2>,
}

impl Ring {
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        let bounds = Aabb2::from_points(&points);
        Self { points, bounds }
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn bounds(&self) -> Option<Aabb2> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// `rings[0]` is the outer boundary, the rest are holes.
///
/// Hole nesting is assumed, not validated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn outer(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl FeatureGeometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            FeatureGeometry::Polygon(_) => GeometryKind::Polygon,
            FeatureGeometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    pub fn polygons(&self) -> &[Polygon] {
        match self {
            FeatureGeometry::Polygon(p) => std::slice::from_ref(p),
            FeatureGeometry::MultiPolygon(ps) => ps,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: FeatureGeometry,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: FeatureGeometry, properties: Map<String, Value>) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    pub fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }

    /// First usable text property among `aliases`.
    pub fn text(&self, aliases: &FieldAliases) -> Option<String> {
        aliases.text(&self.properties)
    }
}

/// Features in dataset order. Lookups return the first match in this order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
