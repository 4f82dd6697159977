use std::sync::Arc;

use chrono::{DateTime, Utc};
use forecast::{PredictionBackend, PredictionDisplay, PredictionRequest};
use runtime::busy::BusyFlag;
use runtime::generation::RequestGenerations;
use scene::selection::SelectionStore;
use tokio::sync::watch;
use tracing::{debug, warn};

pub const PICK_A_LOCATION_FIRST: &str = "Pick a location first";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PredictionStatus {
    #[default]
    Idle,
    Pending,
    Ready(PredictionDisplay),
    /// Inline error text.
    Failed(String),
}

/// The "check weather" button: sends the current selection to the
/// prediction backend and publishes the formatted result.
pub struct PredictionTrigger<B> {
    backend: B,
    store: Arc<SelectionStore>,
    generations: RequestGenerations,
    busy: BusyFlag,
    status: watch::Sender<PredictionStatus>,
}

impl<B: PredictionBackend> PredictionTrigger<B> {
    pub fn new(backend: B, store: Arc<SelectionStore>) -> Self {
        let (status, _) = watch::channel(PredictionStatus::Idle);
        Self {
            backend,
            store,
            generations: RequestGenerations::new(),
            busy: BusyFlag::new(),
            status,
        }
    }

    pub fn status(&self) -> PredictionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<PredictionStatus> {
        self.status.subscribe()
    }

    /// The button is disabled while a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Requests a prediction for the current selection at time `at`.
    ///
    /// Returns the status this call produced, even when a newer request has
    /// since replaced it on the published status.
    pub async fn trigger(&self, at: DateTime<Utc>) -> PredictionStatus {
        let Some(point) = self.store.get() else {
            let status = PredictionStatus::Failed(PICK_A_LOCATION_FIRST.to_string());
            self.status.send_replace(status.clone());
            return status;
        };

        let generation = self.generations.issue();
        let _busy = self.busy.acquire();
        self.status.send_replace(PredictionStatus::Pending);

        let status = match self.backend.predict(PredictionRequest::new(point, at)).await {
            Ok(reading) => PredictionStatus::Ready(reading.display()),
            Err(e) => {
                warn!(lat = point.lat_deg, lon = point.lon_deg, "prediction failed: {e}");
                PredictionStatus::Failed(e.inline_message())
            }
        };

        if self.generations.is_current(generation) {
            self.status.send_replace(status.clone());
        } else {
            debug!(generation = generation.0, "discarding stale prediction");
        }
        status
    }
}
