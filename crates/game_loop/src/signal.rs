//! Cross-thread exit flags

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Sticky boolean flag shared between a writer and the loop thread
///
/// Setting it is a single atomic store, so it may be raised from any thread
/// (an OS callback, a signal handler thread). The loop reads it once per
/// iteration and sees the store no later than the next iteration.
#[derive(Debug, Clone, Default)]
pub struct ExitSignal {
    flag: Arc<AtomicBool>,
}

impl ExitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Idempotent.
    pub fn request(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether the flag has been raised
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Lower the flag so the owner can be reused
    pub(crate) fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Thread-safe handle for asking a running loop to stop
///
/// The request is honoured at the next iteration boundary; a tick in progress
/// is never interrupted.
#[derive(Debug, Clone)]
pub struct StopHandle {
    signal: ExitSignal,
}

impl StopHandle {
    pub(crate) fn new(signal: ExitSignal) -> Self {
        Self { signal }
    }

    /// Request the loop to stop
    pub fn stop(&self) {
        self.signal.request();
    }

    /// Whether a stop has been requested and not yet consumed
    pub fn is_stop_requested(&self) -> bool {
        self.signal.is_requested()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_starts_lowered() {
        assert!(!ExitSignal::new().is_requested());
    }

    #[test]
    fn test_signal_is_sticky() {
        let signal = ExitSignal::new();
        signal.request();
        signal.request();
        assert!(signal.is_requested());
        assert!(signal.is_requested());
    }

    #[test]
    fn test_clones_share_flag() {
        let signal = ExitSignal::new();
        let writer = signal.clone();
        writer.request();
        assert!(signal.is_requested());
    }

    #[test]
    fn test_stop_from_other_thread() {
        let signal = ExitSignal::new();
        let handle = StopHandle::new(signal.clone());
        std::thread::spawn(move || handle.stop())
            .join()
            .unwrap();
        assert!(signal.is_requested());
    }

    #[test]
    fn test_handle_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StopHandle>();
        assert_send_sync::<ExitSignal>();
    }
}
