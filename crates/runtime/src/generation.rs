use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence number captured when an asynchronous request is issued.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// Monotonic source of [`Generation`]s for one kind of request.
///
/// A response is applied only while its generation is still the latest one
/// issued; anything older has been superseded by a newer user action and is
/// dropped.
#[derive(Debug, Default)]
pub struct RequestGenerations {
    latest: AtomicU64,
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next generation. The first one issued is `Generation(1)`.
    pub fn issue(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Latest generation issued so far (`Generation(0)` before any).
    pub fn latest(&self) -> Generation {
        Generation(self.latest.load(Ordering::Acquire))
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest() == generation
    }
}
