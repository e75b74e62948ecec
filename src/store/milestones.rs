//! Milestone screening store: catalog fetches, locally buffered draft
//! assessments with write-through persistence, and the batched submit.
//!
//! Drafts survive restarts: every upsert is persisted immediately, and a
//! fresh store hydrates the draft map from storage before first use. A
//! failed batch submit leaves the child's drafts untouched so the answers
//! can be retried.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use crate::api::ApiClient;
use crate::models::{
    AssessmentStatus, AssessmentSummary, BatchAssessmentRequest, DraftAssessment, DraftMap,
    Milestone,
};
use crate::storage::KeyValueStorage;

use super::entity::StoreError;

/// Storage key for the persisted draft map
pub const DRAFTS_KEY: &str = "milestone_drafts";

const SYNC_FALLBACK: &str = "Gagal menyimpan penilaian";
const FETCH_FALLBACK: &str = "Gagal memuat data milestone";

pub struct MilestoneStore {
    client: ApiClient,
    storage: Arc<dyn KeyValueStorage>,
    milestones: Vec<Milestone>,
    summary: Option<AssessmentSummary>,
    drafts: DraftMap,
    loading: bool,
    error: Option<String>,
}

impl MilestoneStore {
    pub fn new(client: ApiClient, storage: Arc<dyn KeyValueStorage>) -> Self {
        let mut store = Self {
            client,
            storage,
            milestones: Vec::new(),
            summary: None,
            drafts: DraftMap::new(),
            loading: false,
            error: None,
        };
        store.load_drafts_from_storage();
        store
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn summary(&self) -> Option<&AssessmentSummary> {
        self.summary.as_ref()
    }

    pub fn drafts_for(&self, child_id: &str) -> &[DraftAssessment] {
        self.drafts.get(child_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_drafts(&self, child_id: &str) -> bool {
        !self.drafts_for(child_id).is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the learning-pyramid milestone catalog for an age.
    pub async fn fetch_milestones(&mut self, age_months: u32) -> Result<&[Milestone], StoreError> {
        let path = format!("milestones?age_months={age_months}");
        self.fetch_catalog(&path).await
    }

    /// Fetch the Denver II milestone catalog for an age.
    pub async fn fetch_denver_milestones(
        &mut self,
        age_months: u32,
    ) -> Result<&[Milestone], StoreError> {
        let path = format!("milestones/denver-ii?age_months={age_months}");
        self.fetch_catalog(&path).await
    }

    async fn fetch_catalog(&mut self, path: &str) -> Result<&[Milestone], StoreError> {
        self.error = None;
        self.loading = true;
        let result = self.client.get::<Vec<Milestone>>(path).await;
        self.loading = false;

        match result {
            Ok(milestones) => {
                self.milestones = milestones;
                Ok(&self.milestones)
            }
            Err(err) => {
                let message = err.user_message(FETCH_FALLBACK);
                self.milestones.clear();
                self.error = Some(message.clone());
                Err(StoreError(message))
            }
        }
    }

    /// Fetch the backend-derived assessment summary for a child.
    pub async fn fetch_summary(
        &mut self,
        child_id: &str,
    ) -> Result<&AssessmentSummary, StoreError> {
        self.error = None;
        self.loading = true;
        let path = format!("children/{child_id}/assessments/summary");
        let result = self.client.get::<AssessmentSummary>(&path).await;
        self.loading = false;

        match result {
            Ok(summary) => Ok(&*self.summary.insert(summary)),
            Err(err) => {
                let message = err.user_message(FETCH_FALLBACK);
                self.summary = None;
                self.error = Some(message.clone());
                Err(StoreError(message))
            }
        }
    }

    /// Buffer one answer for a child, replacing any earlier answer to the
    /// same milestone, and persist the whole draft map immediately.
    pub fn save_draft(
        &mut self,
        child_id: &str,
        milestone_id: &str,
        status: AssessmentStatus,
        notes: impl Into<String>,
    ) {
        let drafts = self.drafts.entry(child_id.to_string()).or_default();
        drafts.retain(|d| d.milestone_id != milestone_id);
        drafts.push(DraftAssessment {
            milestone_id: milestone_id.to_string(),
            status,
            notes: notes.into(),
        });
        self.persist_drafts();
    }

    /// Submit every buffered draft for a child as one batch. On success the
    /// child's drafts are cleared and the summary refetched; on failure the
    /// drafts stay buffered.
    pub async fn sync_assessments(
        &mut self,
        child_id: &str,
        assessment_date: NaiveDate,
    ) -> Result<(), StoreError> {
        let items = match self.drafts.get(child_id) {
            Some(items) if !items.is_empty() => items.clone(),
            _ => {
                return Err(StoreError(
                    "Tidak ada data penilaian untuk disimpan".to_string(),
                ))
            }
        };

        self.error = None;
        self.loading = true;
        let request = BatchAssessmentRequest {
            assessment_date,
            items,
        };
        let path = format!("children/{child_id}/assessments/batch");
        let result = self.client.put(&path, &request).await;
        self.loading = false;
        if let Err(err) = result {
            let message = err.user_message(SYNC_FALLBACK);
            self.error = Some(message.clone());
            return Err(StoreError(message));
        }

        self.drafts.remove(child_id);
        self.persist_drafts();

        // Keep the displayed progress in step with what was just submitted.
        // A summary refetch failure surfaces through the store error, not
        // through the submit result: the answers are already saved.
        let _ = self.fetch_summary(child_id).await;
        Ok(())
    }

    /// Drop everything, including persisted drafts. Invoked on logout.
    pub fn clear_state(&mut self) {
        self.milestones.clear();
        self.summary = None;
        self.drafts.clear();
        self.loading = false;
        self.error = None;
        self.storage.remove(DRAFTS_KEY);
    }

    fn load_drafts_from_storage(&mut self) {
        let Some(raw) = self.storage.get(DRAFTS_KEY) else {
            return;
        };
        match serde_json::from_str::<DraftMap>(&raw) {
            Ok(drafts) => self.drafts = drafts,
            Err(err) => {
                warn!(%err, "discarding unreadable persisted drafts");
                self.drafts = DraftMap::new();
            }
        }
    }

    // Persistence failures must never lose the in-memory drafts, so the
    // storage layer only logs on write errors.
    fn persist_drafts(&self) {
        match serde_json::to_string(&self.drafts) {
            Ok(raw) => self.storage.set(DRAFTS_KEY, &raw),
            Err(err) => warn!(%err, "failed to serialize drafts"),
        }
    }
}
