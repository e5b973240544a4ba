use std::sync::atomic::{AtomicBool, Ordering};

/// Allows at most one ingestion cycle at a time.
#[derive(Debug, Default)]
pub struct CycleGuard {
    running: AtomicBool,
}

impl CycleGuard {
    /// `None` while another cycle holds the guard.
    pub fn try_acquire(&self) -> Option<CyclePermit<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CyclePermit { guard: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

pub struct CyclePermit<'a> {
    guard: &'a CycleGuard,
}

impl Drop for CyclePermit<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let guard = CycleGuard::default();
        let permit = guard.try_acquire().expect("first permit");
        assert!(guard.is_running());
        assert!(guard.try_acquire().is_none());
        drop(permit);
        assert!(!guard.is_running());
        assert!(guard.try_acquire().is_some());
    }
}
