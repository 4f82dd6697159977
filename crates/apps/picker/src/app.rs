use std::sync::Arc;

use catalog::Datasets;
use chrono::{DateTime, Utc};
use forecast::{HttpPredictionClient, PredictionBackend};
use foundation::math::GeoPoint;
use geocoding::{CachedGeocoder, GeocodeError, Geocoder, NominatimClient};
use resolver::PlaceResolver;
use runtime::busy::BusyFlag;
use scene::selection::SelectionStore;
use tracing::{info, warn};

use crate::config::PickerConfig;
use crate::controller::{PickController, ResolveOutcome};
use crate::predict::{PredictionStatus, PredictionTrigger};
use crate::views::{FlatMapView, GlobeScene, GlobeView, TileMap};

pub type DefaultResolver = PlaceResolver<CachedGeocoder<NominatimClient>>;

/// Loads the datasets and builds the network clients named by `config`.
///
/// Missing datasets are not an error; only an unusable geocoder setup is.
pub async fn bootstrap(
    config: &PickerConfig,
) -> Result<(Arc<DefaultResolver>, HttpPredictionClient), GeocodeError> {
    let geocoder = config.geocoder()?;
    let source = config.data_source();
    let datasets = Datasets::load(source.as_ref(), &config.datasets).await;
    info!(
        countries = datasets.countries.is_some(),
        subnational = datasets.subnational.is_some(),
        places = datasets.populated_places.is_some(),
        "picker ready"
    );
    let resolver = PlaceResolver::new(Arc::new(datasets), geocoder, config.resolver_config());
    Ok((Arc::new(resolver), config.prediction_client()))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ActiveView {
    Globe,
    Map,
}

pub const TYPE_A_PLACE_NAME: &str = "Type a place name";
pub const NO_RESULTS: &str = "No results";
pub const GEOCODE_ERROR: &str = "Geocode error";

#[derive(Debug, Clone, PartialEq)]
pub enum SearchFeedback {
    EmptyQuery,
    NoResults,
    Failed,
    Found { point: GeoPoint, label: String },
}

impl SearchFeedback {
    pub fn message(&self) -> &str {
        match self {
            SearchFeedback::EmptyQuery => TYPE_A_PLACE_NAME,
            SearchFeedback::NoResults => NO_RESULTS,
            SearchFeedback::Failed => GEOCODE_ERROR,
            SearchFeedback::Found { label, .. } => label,
        }
    }
}

/// Both views over one selection, plus the pick, search and prediction
/// controls. One view is active at a time; switching re-centers the newly
/// active view on the shared selection.
pub struct Picker<S, M, G, B> {
    store: Arc<SelectionStore>,
    globe: GlobeView<S>,
    map: FlatMapView<M>,
    active: ActiveView,
    busy: BusyFlag,
    controller: Arc<PickController<G>>,
    prediction: Arc<PredictionTrigger<B>>,
}

impl<S, M, G, B> Picker<S, M, G, B>
where
    S: GlobeScene,
    M: TileMap,
    G: Geocoder,
    B: PredictionBackend,
{
    /// The land layer, if it loaded, goes to the globe scene here.
    pub fn new(
        mut scene: S,
        map: M,
        config: &PickerConfig,
        resolver: Arc<PlaceResolver<G>>,
        backend: B,
    ) -> Self {
        if let Some(land) = &resolver.datasets().land {
            scene.draw_land(land);
        }
        let store = Arc::new(SelectionStore::new());
        let busy = BusyFlag::new();
        Self {
            globe: GlobeView::new(scene, config.globe, store.clone()),
            map: FlatMapView::new(map, config.map_zoom, store.clone()),
            active: ActiveView::Globe,
            controller: Arc::new(PickController::new(resolver, busy.clone())),
            prediction: Arc::new(PredictionTrigger::new(backend, store.clone())),
            busy,
            store,
        }
    }

    pub fn store(&self) -> &Arc<SelectionStore> {
        &self.store
    }

    pub fn active(&self) -> ActiveView {
        self.active
    }

    pub fn globe(&self) -> &GlobeView<S> {
        &self.globe
    }

    pub fn map(&self) -> &FlatMapView<M> {
        &self.map
    }

    /// Shared so hosts can run several lookups concurrently.
    pub fn controller(&self) -> Arc<PickController<G>> {
        Arc::clone(&self.controller)
    }

    pub fn prediction(&self) -> Arc<PredictionTrigger<B>> {
        Arc::clone(&self.prediction)
    }

    /// Search and pick-resolution share one busy state.
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn toggle(&mut self) -> ActiveView {
        self.active = match self.active {
            ActiveView::Globe => ActiveView::Map,
            ActiveView::Map => ActiveView::Globe,
        };
        match self.active {
            ActiveView::Globe => self.globe.activate(),
            ActiveView::Map => self.map.activate(),
        };
        self.active
    }

    pub fn pick_globe(&mut self, x_px: f64, y_px: f64) -> Option<GeoPoint> {
        self.globe.pick(x_px, y_px)
    }

    pub fn click_map(&mut self, point: GeoPoint) -> GeoPoint {
        self.map.click(point)
    }

    /// Resolves the current selection's name.
    pub async fn resolve_selection(&self) -> Option<ResolveOutcome> {
        let point = self.store.get()?;
        Some(self.controller.resolve(point).await)
    }

    /// Forward search. A hit becomes the selection and is shown in the
    /// active view.
    pub async fn search(&mut self, query: &str) -> SearchFeedback {
        let query = query.trim();
        if query.is_empty() {
            return SearchFeedback::EmptyQuery;
        }

        let result = {
            let _busy = self.busy.acquire();
            self.controller.resolver().geocoder().search(query).await
        };
        let hit = match result {
            Ok(Some(hit)) => hit,
            Ok(None) => return SearchFeedback::NoResults,
            Err(e) => {
                warn!(query, "forward geocode failed: {e}");
                return SearchFeedback::Failed;
            }
        };

        let point = hit.point;
        self.store.set(point);
        match self.active {
            ActiveView::Globe => self.globe.show(point),
            ActiveView::Map => self.map.show(point),
        }
        let label = hit
            .display_name
            .as_deref()
            .and_then(|d| d.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(query)
            .to_string();
        SearchFeedback::Found { point, label }
    }

    pub async fn predict(&self, at: DateTime<Utc>) -> PredictionStatus {
        self.prediction.trigger(at).await
    }

    /// Clipboard text for the current selection.
    pub fn coordinate_text(&self) -> Option<String> {
        self.store.get().map(|p| p.coordinate_text())
    }
}
