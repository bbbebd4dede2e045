// ── Generic reactive collection ──
//
// Ordered snapshot storage with push-based change notification via a
// `watch` channel. The request generation lives inside the channel value
// so the "is this response still current?" check and the write happen
// under the same lock.

use std::sync::Arc;

use tokio::sync::watch;

use super::resource::Resource;
use crate::model::EntityId;

/// Identifies one issued request against a collection or slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub(crate) fn from_generation(generation: u64) -> Self {
        Self(generation)
    }
}

/// Channel value of a [`Collection`].
#[derive(Debug)]
pub struct Snapshot<T> {
    pub(crate) items: Arc<Vec<Arc<T>>>,
    pub(crate) generation: u64,
    pub(crate) version: u64,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            generation: self.generation,
            version: self.version,
        }
    }
}

/// A reactive, ordered list of server records.
///
/// Every mutation bumps `version` and notifies subscribers. Every issued
/// fetch and every local mutation bumps `generation`; a fetch result is
/// applied only if no newer fetch or local mutation happened since.
pub(crate) struct Collection<T: Resource> {
    state: watch::Sender<Snapshot<T>>,
}

impl<T: Resource> Collection<T> {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(Snapshot {
            items: Arc::new(Vec::new()),
            generation: 0,
            version: 0,
        });
        Self { state }
    }

    /// Reserve a generation for a fetch about to be issued.
    pub(crate) fn ticket(&self) -> Ticket {
        let mut ticket = Ticket(0);
        // Not a visible change: subscribers are not woken.
        self.state.send_if_modified(|s| {
            s.generation += 1;
            ticket = Ticket(s.generation);
            false
        });
        ticket
    }

    /// Replace the whole list if `ticket` is still the latest generation.
    /// Returns `false` when the result was stale and dropped.
    pub(crate) fn replace(&self, ticket: Ticket, items: Vec<T>) -> bool {
        self.state.send_if_modified(|s| {
            if s.generation != ticket.0 {
                return false;
            }
            s.items = Arc::new(items.into_iter().map(Arc::new).collect());
            s.version += 1;
            true
        })
    }

    /// Append a record created locally.
    pub(crate) fn push(&self, item: Arc<T>) {
        self.mutate(|items| items.push(item));
    }

    /// Insert a record at the front (newest first lists).
    pub(crate) fn push_front(&self, item: Arc<T>) {
        self.mutate(|items| items.insert(0, item));
    }

    /// Apply `f` to the record with `id`. Returns `true` if it was present.
    pub(crate) fn patch(&self, id: &EntityId, f: impl FnOnce(&mut T)) -> bool {
        self.state.send_if_modified(|s| {
            let Some(pos) = s.items.iter().position(|item| item.id() == id) else {
                return false;
            };
            let mut items: Vec<Arc<T>> = s.items.as_ref().clone();
            let mut record = items[pos].as_ref().clone();
            f(&mut record);
            items[pos] = Arc::new(record);
            s.items = Arc::new(items);
            s.generation += 1;
            s.version += 1;
            true
        })
    }

    /// Remove all records.
    pub(crate) fn clear(&self) {
        self.mutate(Vec::clear);
    }

    pub(crate) fn get(&self, id: &EntityId) -> Option<Arc<T>> {
        self.state
            .borrow()
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    /// Current list (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        Arc::clone(&self.state.borrow().items)
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.state.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        self.state.borrow().version
    }

    pub(crate) fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn mutate(&self, f: impl FnOnce(&mut Vec<Arc<T>>)) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.state.send_modify(|s| {
            let mut items = s.items.as_ref().clone();
            f(&mut items);
            s.items = Arc::new(items);
            s.generation += 1;
            s.version += 1;
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::resource::tests::Note;

    fn notes(ids: &[&str]) -> Vec<Note> {
        ids.iter().map(|id| Note::new(id, "x")).collect()
    }

    #[test]
    fn replace_applies_latest_ticket_only() {
        let col: Collection<Note> = Collection::new();
        let stale = col.ticket();
        let fresh = col.ticket();

        assert!(col.replace(fresh, notes(&["a", "b"])));
        assert!(!col.replace(stale, notes(&["z"])));
        assert_eq!(col.len(), 2);
    }

    #[test]
    fn local_mutation_supersedes_inflight_fetch() {
        let col: Collection<Note> = Collection::new();
        let ticket = col.ticket();
        col.push(Arc::new(Note::new("new", "created")));
        assert!(!col.replace(ticket, Vec::new()));
        assert_eq!(col.len(), 1);
    }

    #[test]
    fn patch_rewrites_one_record() {
        let col: Collection<Note> = Collection::new();
        let ticket = col.ticket();
        col.replace(ticket, notes(&["a", "b"]));

        assert!(col.patch(&EntityId::from("b"), |n| n.body = "patched".into()));
        assert_eq!(col.get(&EntityId::from("b")).unwrap().body, "patched");
        assert!(!col.patch(&EntityId::from("missing"), |n| n.body.clear()));
    }

    #[test]
    fn version_counts_visible_changes() {
        let col: Collection<Note> = Collection::new();
        let before = col.version();
        let _ = col.ticket();
        assert_eq!(col.version(), before);
        col.push_front(Arc::new(Note::new("a", "x")));
        col.clear();
        assert_eq!(col.version(), before + 2);
        assert!(col.snapshot().is_empty());
    }
}
