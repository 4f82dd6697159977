use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared "work in progress" indicator behind a spinner or a disabled button.
///
/// Busy while at least one [`BusyGuard`] is alive. Guards release on drop,
/// so every exit path of the guarded work (success, error, early return,
/// cancellation of the future) restores the idle state.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    holders: Arc<AtomicUsize>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> BusyGuard {
        self.holders.fetch_add(1, Ordering::AcqRel);
        BusyGuard {
            holders: Arc::clone(&self.holders),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.holders.load(Ordering::Acquire) > 0
    }
}

#[derive(Debug)]
#[must_use = "the flag is released as soon as the guard is dropped"]
pub struct BusyGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.holders.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::BusyFlag;

    #[test]
    fn guard_releases_on_drop() {
        let flag = BusyFlag::new();
        assert!(!flag.is_busy());
        {
            let _g = flag.acquire();
            assert!(flag.is_busy());
        }
        assert!(!flag.is_busy());
    }

    #[test]
    fn overlapping_guards_keep_flag_busy() {
        let flag = BusyFlag::new();
        let a = flag.acquire();
        let b = flag.clone().acquire();
        drop(a);
        assert!(flag.is_busy());
        drop(b);
        assert!(!flag.is_busy());
    }

    #[test]
    fn error_path_releases() {
        fn fallible(flag: &BusyFlag, fail: bool) -> Result<(), &'static str> {
            let _busy = flag.acquire();
            if fail {
                return Err("boom");
            }
            Ok(())
        }
        let flag = BusyFlag::new();
        assert!(fallible(&flag, true).is_err());
        assert!(!flag.is_busy());
        assert!(fallible(&flag, false).is_ok());
        assert!(!flag.is_busy());
    }
}
