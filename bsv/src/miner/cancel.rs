use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cancellation token shared between the caller of a search and its threads.
///
/// Clones share the same flag. Once cancelled, a signal stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    cancelled: Arc<AtomicBool>,
}

impl CancellationSignal {
    pub fn new() -> CancellationSignal {
        CancellationSignal::default()
    }

    /// Ask every search holding this signal to stop. Further calls have no effect.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let signal = CancellationSignal::new();
        let other = signal.clone();
        assert!(!other.is_cancelled());
        signal.cancel();
        assert!(other.is_cancelled());
        other.cancel();
        assert!(signal.is_cancelled());
    }

    #[test]
    fn cancel_from_another_thread() {
        let signal = CancellationSignal::new();
        let remote = signal.clone();
        std::thread::spawn(move || remote.cancel()).join().unwrap();
        assert!(signal.is_cancelled());
    }
}
