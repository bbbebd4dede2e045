// ── Subscription handles ──
//
// What consumers hold to re-render on change: `current()` for a cheap
// read, `changed()` to await the next visible update.

use std::sync::Arc;

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

use crate::store::collection::Snapshot;
use crate::store::slot::SlotState;

/// Subscription to a store's list.
pub struct EntityStream<T: Send + Sync + 'static> {
    rx: watch::Receiver<Snapshot<T>>,
}

impl<T: Send + Sync + 'static> EntityStream<T> {
    pub(crate) fn new(rx: watch::Receiver<Snapshot<T>>) -> Self {
        Self { rx }
    }

    /// The list as of now, without marking it seen.
    pub fn current(&self) -> Arc<Vec<Arc<T>>> {
        Arc::clone(&self.rx.borrow().items)
    }

    /// The list as of now, marking it seen.
    pub fn latest(&mut self) -> Arc<Vec<Arc<T>>> {
        Arc::clone(&self.rx.borrow_and_update().items)
    }

    /// Wait for the next change. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Arc<T>>>> {
        self.rx.changed().await.ok()?;
        Some(self.latest())
    }

    /// Turn into a `Stream` yielding the current list, then every change.
    pub fn into_stream(self) -> impl Stream<Item = Arc<Vec<Arc<T>>>> {
        WatchStream::new(self.rx).map(|snap| snap.items)
    }
}

/// Subscription to a store's selected item.
pub struct SlotStream<T: Send + Sync + 'static> {
    rx: watch::Receiver<SlotState<T>>,
}

impl<T: Send + Sync + 'static> SlotStream<T> {
    pub(crate) fn new(rx: watch::Receiver<SlotState<T>>) -> Self {
        Self { rx }
    }

    pub fn current(&self) -> Option<Arc<T>> {
        self.rx.borrow().value.clone()
    }

    /// Wait for the next change. The outer `None` means the store is gone.
    pub async fn changed(&mut self) -> Option<Option<Arc<T>>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().value.clone())
    }
}
