// ── Loading / error flags ──
//
// `is_loading` is an in-flight counter rather than a boolean so two
// concurrent operations on one store cannot clear each other's flag.

use tokio::sync::watch;

/// Observable loading and error state of a store.
#[derive(Debug)]
pub struct StoreStatus {
    in_flight: watch::Sender<usize>,
    error: watch::Sender<Option<String>>,
}

impl Default for StoreStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreStatus {
    pub fn new() -> Self {
        let (in_flight, _) = watch::channel(0);
        let (error, _) = watch::channel(None);
        Self { in_flight, error }
    }

    /// Start an operation: clears the previous error and marks the store busy
    /// until the returned guard drops.
    pub fn begin(&self) -> LoadingGuard<'_> {
        self.error.send_replace(None);
        self.in_flight.send_modify(|n| *n += 1);
        LoadingGuard { status: self }
    }

    pub fn is_loading(&self) -> bool {
        *self.in_flight.borrow() > 0
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.error.send_replace(Some(message.into()));
    }

    pub fn clear_error(&self) {
        self.error.send_replace(None);
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<usize> {
        self.in_flight.subscribe()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }
}

/// Keeps its store marked as loading while alive.
#[must_use = "the store stops being marked as loading when the guard drops"]
pub struct LoadingGuard<'a> {
    status: &'a StoreStatus,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.status
            .in_flight
            .send_modify(|n| *n = n.saturating_sub(1));
    }
}
