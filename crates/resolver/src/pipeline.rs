use std::sync::Arc;

use catalog::Datasets;
use foundation::math::GeoPoint;
use geocoding::{Geocoder, ReverseGeocodeResponse};
use layers::places::find_nearest_place;
use layers::query::find_containing_feature;
use tracing::{debug, warn};

use crate::naming::{country_label, is_qualified, mentions_word, qualified, subnational_label};

pub const DEFAULT_NEAREST_PLACE_KM: f64 = 10.0;
pub const DEFAULT_FINE_GRAINED_NATION: &str = "India";

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub nearest_place_km: f64,
    /// Nation whose names are refined to `"{state}, {nation}"`; `None`
    /// disables the sub-national layers.
    pub fine_grained_nation: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            nearest_place_km: DEFAULT_NEAREST_PLACE_KM,
            fine_grained_nation: Some(DEFAULT_FINE_GRAINED_NATION.to_string()),
        }
    }
}

/// Which layer produced a name.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    NearestPlace,
    Country,
    Subnational,
    RemoteAdminArea,
    RemoteAddress,
    RemoteDisplayName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub name: String,
    pub source: ResolutionSource,
}

impl Resolution {
    fn new(name: String, source: ResolutionSource) -> Self {
        Self { name, source }
    }
}

/// Layered place-name lookup. Each layer runs only while no name has been
/// found, except that a name inside the fine-grained nation is refined to
/// state level when possible.
pub struct PlaceResolver<G> {
    datasets: Arc<Datasets>,
    geocoder: G,
    config: ResolverConfig,
}

impl<G: Geocoder> PlaceResolver<G> {
    pub fn new(datasets: Arc<Datasets>, geocoder: G, config: ResolverConfig) -> Self {
        Self {
            datasets,
            geocoder,
            config,
        }
    }

    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Resolves `point` to a display name. Never fails: unavailable datasets
    /// and geocoder errors only remove layers. At most one remote call is
    /// made.
    pub async fn resolve(&self, point: GeoPoint) -> Option<Resolution> {
        if let Some(r) = self.nearest_place(point) {
            return Some(r);
        }

        let nation = self.config.fine_grained_nation.as_deref().filter(|n| !n.is_empty());
        let mut found = self.country(point);

        if let Some(nation) = nation
            && needs_refinement(found.as_ref(), nation)
            && let Some(r) = self.subnational(point, nation)
        {
            found = Some(r);
        }

        let wants_remote = match (&found, nation) {
            (None, _) => true,
            (Some(r), Some(nation)) => needs_refinement(Some(r), nation),
            (Some(_), None) => false,
        };
        if !wants_remote {
            return found;
        }

        let Some(remote) = self.reverse(point).await else {
            return found;
        };

        if let Some(nation) = nation
            && let Some(r) = refine_remote(found.as_ref(), &remote, nation)
        {
            return Some(r);
        }
        if found.is_some() {
            return found;
        }

        if let Some(name) = remote.preferred_name() {
            debug!(name, "named from remote address");
            return Some(Resolution::new(name, ResolutionSource::RemoteAddress));
        }
        let head = remote.display_head()?;
        debug!(name = head, "named from remote display name");
        Some(Resolution::new(head, ResolutionSource::RemoteDisplayName))
    }

    /// Layers that need no network.
    pub fn resolve_local(&self, point: GeoPoint) -> Option<Resolution> {
        self.nearest_place(point).or_else(|| {
            let found = self.country(point);
            match self.config.fine_grained_nation.as_deref() {
                Some(nation) if !nation.is_empty() && needs_refinement(found.as_ref(), nation) => {
                    self.subnational(point, nation).or(found)
                }
                _ => found,
            }
        })
    }

    fn nearest_place(&self, point: GeoPoint) -> Option<Resolution> {
        let places = self.datasets.populated_places.as_deref()?;
        let place = find_nearest_place(point, places, self.config.nearest_place_km)?;
        let name = place.name.clone()?;
        debug!(name, "named from nearest populated place");
        Some(Resolution::new(name, ResolutionSource::NearestPlace))
    }

    fn country(&self, point: GeoPoint) -> Option<Resolution> {
        let countries = self.datasets.countries.as_ref()?;
        let feature = find_containing_feature(point, countries)?;
        let Some(name) = country_label(feature) else {
            debug!("containing country has no usable name");
            return None;
        };
        debug!(name, "named from country boundary");
        Some(Resolution::new(name, ResolutionSource::Country))
    }

    fn subnational(&self, point: GeoPoint, nation: &str) -> Option<Resolution> {
        let states = self.datasets.subnational.as_ref()?;
        let feature = find_containing_feature(point, states)?;
        let name = subnational_label(feature, nation)?;
        debug!(name, "named from sub-national boundary");
        Some(Resolution::new(name, ResolutionSource::Subnational))
    }

    async fn reverse(&self, point: GeoPoint) -> Option<ReverseGeocodeResponse> {
        match self.geocoder.reverse(point).await {
            Ok(resp) => Some(resp),
            Err(e) => {
                warn!(lat = point.lat_deg, lon = point.lon_deg, "reverse geocode failed: {e}");
                None
            }
        }
    }
}

/// No name yet, or a name inside `nation` that is not yet state-qualified.
fn needs_refinement(found: Option<&Resolution>, nation: &str) -> bool {
    match found {
        None => true,
        Some(r) => mentions_word(&r.name, nation) && !is_qualified(&r.name, nation),
    }
}

/// State-level name from the remote address, for points known to be in
/// `nation` (by the local name, or by the address when nothing local matched).
fn refine_remote(
    found: Option<&Resolution>,
    remote: &ReverseGeocodeResponse,
    nation: &str,
) -> Option<Resolution> {
    let in_nation = match found {
        Some(r) => mentions_word(&r.name, nation),
        None => remote
            .country()
            .is_some_and(|c| c.to_lowercase() == nation.to_lowercase()),
    };
    if !in_nation {
        return None;
    }
    let area = remote.admin_area()?;
    let name = qualified(&area, nation);
    debug!(name, "named from remote admin area");
    Some(Resolution::new(name, ResolutionSource::RemoteAdminArea))
}
