use foundation::math::GeoPoint;
use tokio::sync::watch;

/// The single canonical picked coordinate shared by every view.
///
/// Writes are last-writer-wins. Readers either poll (`get`, or a
/// [`SelectionWatcher`]'s `has_changed`/`current`) or await the next change
/// with [`SelectionWatcher::changed`].
///
/// Ordering contract:
/// - A `get` issued after `set` returns (on any handle) observes that value.
#[derive(Debug)]
pub struct SelectionStore {
    tx: watch::Sender<Option<GeoPoint>>,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStore {
    /// Starts with nothing selected.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn set(&self, point: GeoPoint) {
        self.tx.send_replace(Some(point));
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    pub fn get(&self) -> Option<GeoPoint> {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> SelectionWatcher {
        SelectionWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

/// A view's handle on the [`SelectionStore`].
#[derive(Debug, Clone)]
pub struct SelectionWatcher {
    rx: watch::Receiver<Option<GeoPoint>>,
}

impl SelectionWatcher {
    pub fn current(&self) -> Option<GeoPoint> {
        *self.rx.borrow()
    }

    /// Whether the store was written since this watcher last looked.
    pub fn has_changed(&self) -> bool {
        // The sender lives in the store; a closed channel means the store is
        // gone and nothing can change any more.
        self.rx.has_changed().unwrap_or(false)
    }

    /// Reads the current value and marks it as seen.
    pub fn mark_seen(&mut self) -> Option<GeoPoint> {
        *self.rx.borrow_and_update()
    }

    /// Waits for the next write. Returns `None` once the store is dropped.
    pub async fn changed(&mut self) -> Option<Option<GeoPoint>> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}
