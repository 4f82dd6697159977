use std::sync::Arc;

use foundation::math::GeoPoint;
use geocoding::Geocoder;
use resolver::{PlaceResolver, Resolution};
use runtime::busy::BusyFlag;
use runtime::generation::RequestGenerations;
use tokio::sync::watch;
use tracing::debug;

pub const LOADING_TEXT: &str = "Loading...";
pub const REVERSE_GEOCODE_FAILED: &str = "Reverse geocode failed";

/// What the location field shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocationLabel {
    #[default]
    Empty,
    Loading,
    Named(String),
    Failed,
}

impl LocationLabel {
    pub fn text(&self) -> &str {
        match self {
            LocationLabel::Empty => "",
            LocationLabel::Loading => LOADING_TEXT,
            LocationLabel::Named(name) => name,
            LocationLabel::Failed => REVERSE_GEOCODE_FAILED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Latest request; its result is now on the label.
    Applied(Option<Resolution>),
    /// A newer pick was made while this one was in flight.
    Discarded,
}

/// Runs place resolution for picks and publishes the label.
///
/// Every pick takes a fresh generation; a result is applied only if no
/// newer pick was issued in the meantime. The busy flag is held for the
/// whole lookup (search controls stay disabled while it is set).
pub struct PickController<G> {
    resolver: Arc<PlaceResolver<G>>,
    generations: RequestGenerations,
    busy: BusyFlag,
    label: watch::Sender<LocationLabel>,
}

impl<G: Geocoder> PickController<G> {
    pub fn new(resolver: Arc<PlaceResolver<G>>, busy: BusyFlag) -> Self {
        let (label, _) = watch::channel(LocationLabel::Empty);
        Self {
            resolver,
            generations: RequestGenerations::new(),
            busy,
            label,
        }
    }

    pub fn resolver(&self) -> &PlaceResolver<G> {
        &self.resolver
    }

    pub fn label(&self) -> LocationLabel {
        self.label.borrow().clone()
    }

    pub fn subscribe_label(&self) -> watch::Receiver<LocationLabel> {
        self.label.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub async fn resolve(&self, point: GeoPoint) -> ResolveOutcome {
        let generation = self.generations.issue();
        let _busy = self.busy.acquire();
        self.label.send_replace(LocationLabel::Loading);

        let resolution = self.resolver.resolve(point).await;

        if !self.generations.is_current(generation) {
            debug!(generation = generation.0, "discarding stale resolution");
            return ResolveOutcome::Discarded;
        }
        let label = match &resolution {
            Some(r) => LocationLabel::Named(r.name.clone()),
            None => LocationLabel::Failed,
        };
        self.label.send_replace(label);
        ResolveOutcome::Applied(resolution)
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::ScriptedGeocoder;
    use super::{LocationLabel, PickController, ResolveOutcome};
    use catalog::Datasets;
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;
    use resolver::{PlaceResolver, ResolutionSource, ResolverConfig};
    use runtime::busy::BusyFlag;
    use std::sync::Arc;

    fn controller(geocoder: ScriptedGeocoder) -> PickController<ScriptedGeocoder> {
        let resolver = PlaceResolver::new(Arc::new(Datasets::default()), geocoder, ResolverConfig::default());
        PickController::new(Arc::new(resolver), BusyFlag::new())
    }

    #[tokio::test]
    async fn applies_latest_result_and_releases_busy() {
        let c = controller(ScriptedGeocoder::default());
        let outcome = c.resolve(GeoPoint::new(1.5, 2.5)).await;
        match outcome {
            ResolveOutcome::Applied(Some(r)) => {
                assert_eq!(r.name, "1.5,2.5");
                assert_eq!(r.source, ResolutionSource::RemoteAddress);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(c.label(), LocationLabel::Named("1.5,2.5".to_string()));
        assert!(!c.is_busy());
    }

    #[tokio::test]
    async fn failure_shows_inline_message() {
        let c = controller(ScriptedGeocoder {
            fail: true,
            ..ScriptedGeocoder::default()
        });
        assert_eq!(c.resolve(GeoPoint::new(0.0, 0.0)).await, ResolveOutcome::Applied(None));
        assert_eq!(c.label().text(), "Reverse geocode failed");
        assert!(!c.is_busy());
    }

    #[tokio::test]
    async fn slow_earlier_pick_cannot_overwrite_newer_one() {
        let first = GeoPoint::new(10.0, 10.0);
        let second = GeoPoint::new(20.0, 20.0);
        let geocoder = ScriptedGeocoder {
            held: Some(first),
            ..ScriptedGeocoder::default()
        };
        let gate = geocoder.gate.clone();
        let c = controller(geocoder);
        let mut labels = c.subscribe_label();

        let (a, b) = tokio::join!(c.resolve(first), async {
            let out = c.resolve(second).await;
            assert!(c.is_busy(), "first lookup still in flight");
            gate.notify_one();
            out
        });

        assert_eq!(a, ResolveOutcome::Discarded);
        assert!(matches!(b, ResolveOutcome::Applied(Some(ref r)) if r.name == "20,20"));
        assert_eq!(labels.borrow_and_update().text(), "20,20");
        assert!(!c.is_busy());
    }
}
