// ── Selected-item slot ──
//
// Holds the one record a detail view is looking at. Each fetch clears the
// slot and takes a ticket; only the latest ticket may fill it, so a slow
// response for an old id never overwrites a newer selection.

use std::sync::Arc;

use tokio::sync::watch;

use super::collection::Ticket;
use super::resource::Resource;
use crate::model::EntityId;

#[derive(Debug)]
pub struct SlotState<T> {
    pub(crate) value: Option<Arc<T>>,
    pub(crate) generation: u64,
}

impl<T> Clone for SlotState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            generation: self.generation,
        }
    }
}

pub(crate) struct Slot<T: Resource> {
    state: watch::Sender<SlotState<T>>,
}

impl<T: Resource> Slot<T> {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(SlotState {
            value: None,
            generation: 0,
        });
        Self { state }
    }

    /// Empty the slot and reserve a ticket for the fetch about to start.
    pub(crate) fn begin(&self) -> Ticket {
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            s.value = None;
            generation = s.generation;
        });
        Ticket::from_generation(generation)
    }

    /// Fill the slot if `ticket` is still the latest. Returns whether it applied.
    pub(crate) fn fill(&self, ticket: Ticket, value: Arc<T>) -> bool {
        self.state.send_if_modified(|s| {
            if Ticket::from_generation(s.generation) != ticket {
                return false;
            }
            s.value = Some(value);
            true
        })
    }

    /// Set the slot directly, superseding any in-flight fetch.
    pub(crate) fn set(&self, value: Option<Arc<T>>) {
        self.state.send_modify(|s| {
            s.generation += 1;
            s.value = value;
        });
    }

    /// Apply `f` to the held record if it has `id`.
    pub(crate) fn patch(&self, id: &EntityId, f: impl FnOnce(&mut T)) -> bool {
        self.state.send_if_modified(|s| {
            let Some(current) = s.value.as_ref().filter(|v| v.id() == id) else {
                return false;
            };
            let mut record = current.as_ref().clone();
            f(&mut record);
            s.value = Some(Arc::new(record));
            true
        })
    }

    pub(crate) fn get(&self) -> Option<Arc<T>> {
        self.state.borrow().value.clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SlotState<T>> {
        self.state.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::resource::tests::Note;

    #[test]
    fn newer_request_wins_regardless_of_arrival_order() {
        let slot: Slot<Note> = Slot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(slot.fill(second, Arc::new(Note::new("b", "second"))));
        assert!(!slot.fill(first, Arc::new(Note::new("a", "first"))));
        assert_eq!(slot.get().unwrap().id, EntityId::from("b"));
    }

    #[test]
    fn begin_clears_previous_value() {
        let slot: Slot<Note> = Slot::new();
        slot.set(Some(Arc::new(Note::new("a", "x"))));
        let _ticket = slot.begin();
        assert!(slot.get().is_none());
    }

    #[test]
    fn patch_only_touches_matching_record() {
        let slot: Slot<Note> = Slot::new();
        slot.set(Some(Arc::new(Note::new("a", "x"))));
        assert!(!slot.patch(&EntityId::from("b"), |n| n.body = "no".into()));
        assert!(slot.patch(&EntityId::from("a"), |n| n.body = "yes".into()));
        assert_eq!(slot.get().unwrap().body, "yes");
    }
}
