// ── Generic resource store ──
//
// One store shape for every server-mirrored resource: a list, a selected
// item, loading/error flags, and the fetch/create/cancel operations that
// every domain store used to repeat by hand.

use std::sync::Arc;

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use super::collection::Collection;
use super::slot::Slot;
use super::status::StoreStatus;
use crate::config::CancelRefresh;
use crate::error::StoreError;
use crate::model::EntityId;
use crate::session::Session;
use crate::stream::{EntityStream, SlotStream};
use resortly_api::ApiClient;

/// A record type served from a REST collection endpoint.
pub trait Resource: Clone + Send + Sync + DeserializeOwned + 'static {
    /// Collection path under `/api/`, e.g. `"room-bookings"`.
    const PATH: &'static str;
    /// Indonesian noun used in user-facing messages.
    const LABEL: &'static str;
    /// Catalog endpoints need no token.
    const PUBLIC: bool = false;

    fn id(&self) -> &EntityId;
}

/// HTTP verb of a `{PATH}/{id}/cancel` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelVerb {
    Put,
    Post,
}

/// A resource the customer may cancel.
pub trait Cancellable: Resource {
    const CANCEL_VERB: CancelVerb;

    /// Flip the local copy to its cancelled state.
    fn mark_cancelled(&mut self);
}

/// Server-mirrored list plus a selected item for one resource type.
pub struct ResourceStore<T: Resource> {
    api: ApiClient,
    session: Arc<Session>,
    items: Arc<Collection<T>>,
    selected: Arc<Slot<T>>,
    status: Arc<StoreStatus>,
}

impl<T: Resource> ResourceStore<T> {
    pub fn new(api: ApiClient, session: Arc<Session>) -> Self {
        Self::with_status(api, session, Arc::new(StoreStatus::new()))
    }

    /// Build a store that shares its loading/error flags with siblings.
    ///
    /// Account-scoped stores empty themselves when the session ends, so
    /// the next user never reads the previous user's records.
    pub fn with_status(api: ApiClient, session: Arc<Session>, status: Arc<StoreStatus>) -> Self {
        let items = Arc::new(Collection::new());
        let selected = Arc::new(Slot::new());
        if !T::PUBLIC {
            let list = Arc::downgrade(&items);
            let slot = Arc::downgrade(&selected);
            session.on_sign_out(move || {
                if let Some(list) = list.upgrade() {
                    list.clear();
                }
                if let Some(slot) = slot.upgrade() {
                    slot.set(None);
                }
            });
        }
        Self {
            api,
            session,
            items,
            selected,
            status,
        }
    }

    // ── State accessors ─────────────────────────────────────────────

    pub fn items(&self) -> Arc<Vec<Arc<T>>> {
        self.items.snapshot()
    }

    pub fn selected(&self) -> Option<Arc<T>> {
        self.selected.get()
    }

    /// Look a record up in the current list without a request.
    pub fn find(&self, id: &EntityId) -> Option<Arc<T>> {
        self.items.get(id)
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn subscribe(&self) -> EntityStream<T> {
        EntityStream::new(self.items.subscribe())
    }

    pub fn subscribe_selected(&self) -> SlotStream<T> {
        SlotStream::new(self.selected.subscribe())
    }

    // ── Operations ──────────────────────────────────────────────────

    /// GET the collection and replace the local list.
    ///
    /// On failure the previous list stays in place and `error` is set.
    pub async fn fetch_all(&self) -> Result<Arc<Vec<Arc<T>>>, StoreError> {
        let _loading = self.status.begin();
        let token = self.token()?;
        let ticket = self.items.ticket();

        match self.api.get::<Vec<T>>(T::PATH, token.as_deref()).await {
            Ok(list) => {
                debug!(resource = T::PATH, count = list.len(), "list fetched");
                if !self.items.replace(ticket, list) {
                    debug!(resource = T::PATH, "stale list response dropped");
                }
                Ok(self.items.snapshot())
            }
            Err(e) => Err(self.fail_api(
                &e,
                &format!("Gagal mengambil data {}", T::LABEL),
                token.as_ref(),
            )),
        }
    }

    /// GET one record into the selected slot.
    ///
    /// The slot is emptied before the request, and a response is applied
    /// only if no newer `fetch_one` was issued meanwhile.
    pub async fn fetch_one(&self, id: &EntityId) -> Result<Arc<T>, StoreError> {
        let _loading = self.status.begin();
        let ticket = self.selected.begin();
        let token = self.token()?;

        let path = format!("{}/{id}", T::PATH);
        match self.api.get::<T>(&path, token.as_deref()).await {
            Ok(record) => {
                let record = Arc::new(record);
                if !self.selected.fill(ticket, Arc::clone(&record)) {
                    debug!(resource = T::PATH, %id, "stale detail response dropped");
                }
                Ok(record)
            }
            Err(e) => Err(self.fail_api(
                &e,
                &format!("Gagal mengambil detail {}", T::LABEL),
                token.as_ref(),
            )),
        }
    }

    /// POST a new record and append the server's copy to the list.
    pub async fn create<B>(&self, body: &B) -> Result<Arc<T>, StoreError>
    where
        B: Serialize + Sync,
    {
        let _loading = self.status.begin();
        let token = self.token()?;

        match self.api.post::<T, B>(T::PATH, body, token.as_deref()).await {
            Ok(record) => {
                let record = Arc::new(record);
                info!(resource = T::PATH, id = %record.id(), "created");
                self.items.push(Arc::clone(&record));
                Ok(record)
            }
            Err(e) => Err(self.fail_api(
                &e,
                &format!("Gagal membuat {}", T::LABEL),
                token.as_ref(),
            )),
        }
    }

    /// Replace the selected record without a request.
    pub fn set_selected(&self, record: Option<T>) {
        self.selected.set(record.map(Arc::new));
    }

    // ── Crate-internal plumbing ─────────────────────────────────────

    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// Token for a request, honoring `T::PUBLIC`. Records the failure.
    pub(crate) fn token(&self) -> Result<Option<Arc<SecretString>>, StoreError> {
        if T::PUBLIC {
            return Ok(None);
        }
        self.session
            .require_token()
            .map(Some)
            .map_err(|e| self.record(e))
    }

    /// Put `record` at the front of the list (newest-first views).
    pub(crate) fn prepend(&self, record: Arc<T>) {
        self.items.push_front(record);
    }

    /// Empty the list and the selected slot.
    pub(crate) fn clear_local(&self) {
        self.items.clear();
        self.selected.set(None);
    }

    /// Apply `f` to the record in both the list and the selected slot.
    pub(crate) fn patch(&self, id: &EntityId, f: impl Fn(&mut T)) -> bool {
        let in_list = self.items.patch(id, |r| f(r));
        let in_slot = self.selected.patch(id, |r| f(r));
        in_list || in_slot
    }

    /// Re-fetch the list without touching the error flag.
    pub(crate) async fn refresh_quietly(&self, token: Option<&SecretString>) {
        let ticket = self.items.ticket();
        match self.api.get::<Vec<T>>(T::PATH, token).await {
            Ok(list) => {
                self.items.replace(ticket, list);
            }
            Err(e) => warn!(resource = T::PATH, error = %e, "follow-up refresh failed"),
        }
    }

    /// Translate an API failure, record it, and expire the session on 401.
    pub(crate) fn fail_api(
        &self,
        err: &resortly_api::Error,
        fallback: &str,
        token: Option<&Arc<SecretString>>,
    ) -> StoreError {
        let mapped = StoreError::from_api(err, fallback);
        if mapped.is_auth_required() {
            if let Some(used) = token {
                self.session.expire(used);
            }
        }
        warn!(resource = T::PATH, error = %err, "request failed");
        self.record(mapped)
    }

    /// Copy `err` into the observable error flag and hand it back.
    pub(crate) fn record(&self, err: StoreError) -> StoreError {
        self.status.set_error(err.to_string());
        err
    }
}

impl<T: Cancellable> ResourceStore<T> {
    /// Cancel a record server-side, then flip the local copy.
    ///
    /// With [`CancelRefresh::PatchThenRefetch`] the list is re-fetched
    /// afterwards; a failed follow-up refresh is logged, not returned.
    pub async fn cancel(&self, id: &EntityId, policy: CancelRefresh) -> Result<(), StoreError> {
        let _loading = self.status.begin();
        let token = self.session.require_token().map_err(|e| self.record(e))?;

        let path = format!("{}/{id}/cancel", T::PATH);
        let result = match T::CANCEL_VERB {
            CancelVerb::Put => self.api.put_unit(&path, &json!({}), Some(&*token)).await,
            CancelVerb::Post => self.api.post_unit(&path, &json!({}), Some(&*token)).await,
        };
        if let Err(e) = result {
            return Err(self.fail_api(
                &e,
                &format!("Gagal membatalkan {}", T::LABEL),
                Some(&token),
            ));
        }

        self.patch(id, T::mark_cancelled);
        info!(resource = T::PATH, %id, "cancelled");

        if policy == CancelRefresh::PatchThenRefetch {
            self.refresh_quietly(Some(&*token)).await;
        }
        Ok(())
    }
}
