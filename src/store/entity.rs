//! Generic entity cache/sync implementation.
//!
//! Every Tumbuh entity store (children, measurements, milestones,
//! immunizations, recommendations) shares one protocol: a full-replacement
//! local cache of a server-owned collection, an optional derived singleton
//! ("latest"), a loading flag, and a last-error string, with every write
//! followed by an unconditional refetch of the server's authoritative view.
//! `EntityStore` implements that protocol once; the per-entity modules only
//! supply an `Endpoint` and a page type.
//!
//! Consistency rules:
//! - a fetch either replaces the collection wholesale or, on failure,
//!   empties it (fail-safe-empty, never fail-safe-stale)
//! - the post-write refetch is awaited before the write returns, so a
//!   caller awaiting a mutation always observes post-mutation state
//! - overlapping calls through *different* store instances are not
//!   serialized; last write wins

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::ApiClient;

/// Human-readable store failure, already normalized through the
/// `ApiError::user_message` priority chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

/// One fetched page of an entity collection. Bare-array endpoints get the
/// blanket `Vec<T>` impl; wrapper endpoints (immunizations,
/// recommendations) split into items plus a derived summary.
pub trait EntityPage: DeserializeOwned {
    type Item: Clone + DeserializeOwned;
    type Summary: Clone;

    fn into_parts(self) -> (Vec<Self::Item>, Option<Self::Summary>);
}

impl<T: Clone + DeserializeOwned> EntityPage for Vec<T> {
    type Item = T;
    type Summary = ();

    fn into_parts(self) -> (Vec<T>, Option<()>) {
        (self, None)
    }
}

/// Endpoint template for one entity kind. `{child}` in a path is replaced
/// with the parent (child record) id.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub collection: &'static str,
    /// Derived-singleton path, e.g. the latest measurement.
    pub latest: Option<&'static str>,
    /// Shown when the server reply carries no usable error text.
    pub error_fallback: &'static str,
}

impl Endpoint {
    fn collection_path(&self, parent_id: &str) -> String {
        self.collection.replace("{child}", parent_id)
    }

    fn item_path(&self, parent_id: &str, id: &str) -> String {
        format!("{}/{}", self.collection_path(parent_id), id)
    }
}

/// Cache and write-protocol state for one entity collection.
pub struct EntityStore<P: EntityPage> {
    client: ApiClient,
    endpoint: Endpoint,
    items: Vec<P::Item>,
    summary: Option<P::Summary>,
    latest: Option<P::Item>,
    loading: bool,
    error: Option<String>,
}

impl<P: EntityPage> EntityStore<P> {
    pub fn new(client: ApiClient, endpoint: Endpoint) -> Self {
        Self {
            client,
            endpoint,
            items: Vec::new(),
            summary: None,
            latest: None,
            loading: false,
            error: None,
        }
    }

    pub fn items(&self) -> &[P::Item] {
        &self.items
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn summary(&self) -> Option<&P::Summary> {
        self.summary.as_ref()
    }

    pub fn latest(&self) -> Option<&P::Item> {
        self.latest.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the local collection with the server's. On any failure the
    /// collection and summary are emptied and the normalized message is
    /// recorded and returned.
    pub async fn fetch_all(&mut self, parent_id: &str) -> Result<&[P::Item], StoreError> {
        self.error = None;
        self.loading = true;
        let path = self.endpoint.collection_path(parent_id);
        let result = self.client.get::<P>(&path).await;
        self.loading = false;

        match result {
            Ok(page) => {
                let (items, summary) = page.into_parts();
                debug!(path = %path, count = items.len(), "collection refreshed");
                self.items = items;
                self.summary = summary;
                Ok(&self.items)
            }
            Err(err) => {
                let message = err.user_message(self.endpoint.error_fallback);
                warn!(path = %path, error = %err, "collection fetch failed");
                self.items.clear();
                self.summary = None;
                self.error = Some(message.clone());
                Err(StoreError(message))
            }
        }
    }

    /// Fetch the derived singleton. A 404 is a valid empty result, not a
    /// failure: it means nothing has been recorded yet.
    pub async fn fetch_latest(&mut self, parent_id: &str) -> Result<Option<&P::Item>, StoreError> {
        let Some(template) = self.endpoint.latest else {
            debug!(collection = self.endpoint.collection, "no derived-singleton endpoint configured");
            return Ok(None);
        };
        let path = template.replace("{child}", parent_id);

        match self.client.get::<P::Item>(&path).await {
            Ok(item) => {
                self.latest = Some(item);
                Ok(self.latest.as_ref())
            }
            Err(err) if err.is_not_found() => {
                self.latest = None;
                Ok(None)
            }
            Err(err) => {
                let message = err.user_message(self.endpoint.error_fallback);
                warn!(path = %path, error = %err, "singleton fetch failed");
                Err(StoreError(message))
            }
        }
    }

    /// Create an entity, then refetch the collection (and singleton) so the
    /// cache reflects the server's authoritative view. Returns the decoded
    /// created entity.
    pub async fn create<B: Serialize, R: DeserializeOwned>(
        &mut self,
        parent_id: &str,
        payload: &B,
    ) -> Result<R, StoreError> {
        self.error = None;
        self.loading = true;
        let path = self.endpoint.collection_path(parent_id);
        let result = self.client.post::<B, R>(&path, payload).await;
        self.loading = false;

        match result {
            Ok(created) => {
                self.refresh(parent_id).await;
                Ok(created)
            }
            Err(err) => {
                let message = err.user_message(self.endpoint.error_fallback);
                warn!(path = %path, error = %err, "create failed");
                self.error = Some(message.clone());
                Err(StoreError(message))
            }
        }
    }

    /// Full-update an entity, then refetch.
    pub async fn update<B: Serialize>(
        &mut self,
        parent_id: &str,
        id: &str,
        payload: &B,
    ) -> Result<(), StoreError> {
        self.error = None;
        self.loading = true;
        let path = self.endpoint.item_path(parent_id, id);
        let result = self.client.put(&path, payload).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.refresh(parent_id).await;
                Ok(())
            }
            Err(err) => {
                let message = err.user_message(self.endpoint.error_fallback);
                warn!(path = %path, error = %err, "update failed");
                self.error = Some(message.clone());
                Err(StoreError(message))
            }
        }
    }

    /// Delete an entity, then refetch.
    pub async fn delete(&mut self, parent_id: &str, id: &str) -> Result<(), StoreError> {
        self.error = None;
        self.loading = true;
        let path = self.endpoint.item_path(parent_id, id);
        let result = self.client.delete(&path).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.refresh(parent_id).await;
                Ok(())
            }
            Err(err) => {
                let message = err.user_message(self.endpoint.error_fallback);
                warn!(path = %path, error = %err, "delete failed");
                self.error = Some(message.clone());
                Err(StoreError(message))
            }
        }
    }

    /// Empty collection, summary, singleton, and error.
    pub fn clear(&mut self) {
        self.items.clear();
        self.summary = None;
        self.latest = None;
        self.error = None;
    }

    // The write already succeeded when this runs; a refetch failure lands
    // in `error` (and empties the cache) rather than failing the write.
    async fn refresh(&mut self, parent_id: &str) {
        let _ = self.fetch_all(parent_id).await;
        if self.endpoint.latest.is_some() {
            let _ = self.fetch_latest(parent_id).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;

    use crate::api::ApiClient;
    use crate::auth::StaticToken;
    use crate::models::{Measurement, MeasurementPayload};
    use crate::testutil::MockApi;

    const ENDPOINT: Endpoint = Endpoint {
        collection: "children/{child}/measurements",
        latest: Some("children/{child}/measurements/latest"),
        error_fallback: "Gagal memproses pengukuran",
    };

    fn store(base: &str) -> EntityStore<Vec<Measurement>> {
        let client = ApiClient::new(base, Arc::new(StaticToken::new("tok"))).expect("client");
        EntityStore::new(client, ENDPOINT)
    }

    fn measurement_json(id: &str) -> String {
        format!(
            r#"{{"id": "{}", "child_id": "c-1", "measurement_date": "2024-03-05", "weight": 7.4, "height": 66.0}}"#,
            id
        )
    }

    fn payload() -> MeasurementPayload {
        MeasurementPayload {
            measurement_date: NaiveDate::from_ymd_opt(2024, 3, 5).expect("date"),
            weight: 7.4,
            height: 66.0,
            head_circumference: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_all_replaces_collection() {
        let server = MockApi::serve(vec![(
            200,
            format!("[{}, {}]", measurement_json("m-1"), measurement_json("m-2")),
        )]);
        let mut store = store(&server.base_url());

        store.fetch_all("c-1").await.expect("fetch");
        assert_eq!(store.items().len(), 2);
        assert!(!store.is_loading());
        assert_eq!(store.last_error(), None);

        let request = server.into_requests().remove(0);
        assert!(request.contains("GET /api/children/c-1/measurements "));
    }

    #[tokio::test]
    async fn test_failed_fetch_empties_collection() {
        let server = MockApi::serve(vec![
            (200, format!("[{}]", measurement_json("m-1"))),
            (500, r#"{"error": "database unavailable"}"#.to_string()),
        ]);
        let mut store = store(&server.base_url());

        store.fetch_all("c-1").await.expect("first fetch");
        assert_eq!(store.items().len(), 1);

        let err = store.fetch_all("c-1").await.unwrap_err();
        assert_eq!(err.0, "database unavailable");
        // Fail-safe-empty, not fail-safe-stale
        assert!(store.items().is_empty());
        assert_eq!(store.last_error(), Some("database unavailable"));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_latest_treats_404_as_empty() {
        let server = MockApi::serve(vec![(
            404,
            r#"{"error": "no measurements found"}"#.to_string(),
        )]);
        let mut store = store(&server.base_url());

        let latest = store.fetch_latest("c-1").await.expect("latest");
        assert!(latest.is_none());
        assert!(store.latest().is_none());
    }

    #[tokio::test]
    async fn test_create_refetches_collection_and_latest_in_order() {
        let server = MockApi::serve(vec![
            (201, measurement_json("m-9")),
            (200, format!("[{}]", measurement_json("m-9"))),
            (200, measurement_json("m-9")),
        ]);
        let mut store = store(&server.base_url());

        let created: Measurement = store.create("c-1", &payload()).await.expect("create");
        assert_eq!(created.id, "m-9");
        // Awaited mutation observes post-mutation state
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.latest().map(|m| m.id.as_str()), Some("m-9"));

        let requests = server.into_requests();
        assert!(requests[0].starts_with("POST /api/children/c-1/measurements "));
        assert!(requests[1].starts_with("GET /api/children/c-1/measurements "));
        assert!(requests[2].starts_with("GET /api/children/c-1/measurements/latest "));
    }

    #[tokio::test]
    async fn test_failed_create_keeps_collection_and_records_error() {
        let server = MockApi::serve(vec![
            (200, format!("[{}]", measurement_json("m-1"))),
            (400, r#"{"message": "berat badan tidak valid"}"#.to_string()),
        ]);
        let mut store = store(&server.base_url());
        store.fetch_all("c-1").await.expect("seed");

        let err = store
            .create::<_, Measurement>("c-1", &payload())
            .await
            .unwrap_err();
        assert_eq!(err.0, "berat badan tidak valid");
        assert_eq!(store.last_error(), Some("berat badan tidak valid"));
        // A failed write does not touch the cached collection
        assert_eq!(store.items().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_targets_item_path_then_refetches() {
        let server = MockApi::serve(vec![
            (200, "{}".to_string()),
            (200, "[]".to_string()),
            (404, "{}".to_string()),
        ]);
        let mut store = store(&server.base_url());

        store.delete("c-1", "m-1").await.expect("delete");
        assert!(store.items().is_empty());

        let requests = server.into_requests();
        assert!(requests[0].starts_with("DELETE /api/children/c-1/measurements/m-1 "));
        assert!(requests[1].starts_with("GET /api/children/c-1/measurements "));
    }

    #[tokio::test]
    async fn test_opaque_error_body_uses_endpoint_fallback() {
        let server = MockApi::serve(vec![(502, "<html>bad gateway</html>".to_string())]);
        let mut store = store(&server.base_url());

        let err = store.fetch_all("c-1").await.unwrap_err();
        assert_eq!(err.0, "Gagal memproses pengukuran");
    }

    #[test]
    fn test_clear_empties_all_derived_state() {
        let client =
            ApiClient::new("http://localhost:8080", Arc::new(StaticToken::new("tok"))).expect("client");
        let mut store: EntityStore<Vec<Measurement>> = EntityStore::new(client, ENDPOINT);
        store.clear();
        assert!(store.items().is_empty());
        assert!(store.latest().is_none());
        assert_eq!(store.last_error(), None);
    }
}
