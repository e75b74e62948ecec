//! Child roster store: the cached child collection plus the persisted
//! "currently selected child" the rest of the app operates on.

use std::sync::Arc;

use tracing::debug;

use crate::api::ApiClient;
use crate::models::{Child, ChildPayload};
use crate::storage::KeyValueStorage;

use super::entity::{Endpoint, EntityStore, StoreError};

/// Storage key for the persisted selection
pub const SELECTED_CHILD_KEY: &str = "selected_child_id";

const ENDPOINT: Endpoint = Endpoint {
    collection: "children",
    latest: None,
    error_fallback: "Gagal memproses data anak",
};

pub struct ChildStore {
    inner: EntityStore<Vec<Child>>,
    storage: Arc<dyn KeyValueStorage>,
    selected: Option<String>,
}

impl ChildStore {
    pub fn new(client: ApiClient, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            inner: EntityStore::new(client, ENDPOINT),
            storage,
            selected: None,
        }
    }

    pub fn children(&self) -> &[Child] {
        self.inner.items()
    }

    pub fn has_children(&self) -> bool {
        self.inner.has_items()
    }

    pub fn selected_child_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_child(&self) -> Option<&Child> {
        let id = self.selected.as_deref()?;
        self.children().iter().find(|c| c.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.inner.last_error()
    }

    /// Fetch the roster and reconcile the persisted selection against it.
    /// A failed fetch empties the collection, so the selection (and its
    /// persisted key) cannot be allowed to outlive it.
    pub async fn fetch_children(&mut self) -> Result<&[Child], StoreError> {
        let fetched = self.inner.fetch_all("").await.map(|_| ());
        match fetched {
            Ok(()) => {
                self.restore_selection();
                Ok(self.inner.items())
            }
            Err(err) => {
                self.selected = None;
                self.storage.remove(SELECTED_CHILD_KEY);
                Err(err)
            }
        }
    }

    /// Set the active selection and persist it. Ignored when the id is not
    /// in the current collection: the prior selection stays untouched.
    pub fn select_child(&mut self, child_id: &str) {
        if self.children().iter().any(|c| c.id == child_id) {
            self.selected = Some(child_id.to_string());
            self.storage.set(SELECTED_CHILD_KEY, child_id);
        } else {
            debug!(child_id, "ignoring selection of unknown child");
        }
    }

    pub async fn add_child(&mut self, payload: &ChildPayload) -> Result<Child, StoreError> {
        let created = self.inner.create::<_, Child>("", payload).await?;
        self.restore_selection();
        Ok(created)
    }

    pub async fn update_child(
        &mut self,
        child_id: &str,
        payload: &ChildPayload,
    ) -> Result<(), StoreError> {
        self.inner.update("", child_id, payload).await?;
        self.restore_selection();
        Ok(())
    }

    pub async fn delete_child(&mut self, child_id: &str) -> Result<(), StoreError> {
        self.inner.delete("", child_id).await?;
        if self.selected.as_deref() == Some(child_id) {
            self.selected = None;
            self.storage.remove(SELECTED_CHILD_KEY);
        }
        self.restore_selection();
        Ok(())
    }

    /// Empty collection, selection, error, and the persisted selection key.
    /// Invoked on logout and on auth-state loss.
    pub fn clear_state(&mut self) {
        self.inner.clear();
        self.selected = None;
        self.storage.remove(SELECTED_CHILD_KEY);
    }

    /// Selection-restore algorithm, run against a freshly fetched
    /// collection: restore the persisted id when it belongs to this
    /// account; discard it when stale; otherwise auto-select the first
    /// child. An empty collection clears everything.
    fn restore_selection(&mut self) {
        self.selected = None;

        if !self.inner.has_items() {
            self.storage.remove(SELECTED_CHILD_KEY);
            return;
        }

        if let Some(saved) = self.storage.get(SELECTED_CHILD_KEY) {
            if self.inner.items().iter().any(|c| c.id == saved) {
                self.selected = Some(saved);
                return;
            }
            // Persisted id does not belong to the current account's roster
            debug!(saved, "discarding stale persisted selection");
            self.storage.remove(SELECTED_CHILD_KEY);
        }

        let first = self.inner.items()[0].id.clone();
        self.storage.set(SELECTED_CHILD_KEY, &first);
        self.selected = Some(first);
    }
}
