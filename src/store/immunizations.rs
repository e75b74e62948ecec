//! Immunization store: the schedule endpoint wraps per-vaccine statuses
//! in an envelope carrying the child's age and a completion summary.

use crate::api::ApiClient;
use crate::models::{
    ChildImmunization, ImmunizationOverview, ImmunizationScheduleResponse, ImmunizationStatus,
    RecordImmunizationPayload,
};

use super::entity::{Endpoint, EntityPage, EntityStore, StoreError};

const ENDPOINT: Endpoint = Endpoint {
    collection: "children/{child}/immunizations",
    latest: None,
    error_fallback: "Gagal memproses data imunisasi",
};

impl EntityPage for ImmunizationScheduleResponse {
    type Item = ImmunizationStatus;
    type Summary = ImmunizationOverview;

    fn into_parts(self) -> (Vec<ImmunizationStatus>, Option<ImmunizationOverview>) {
        let overview = ImmunizationOverview {
            age_months: self.age_months,
            age_days: self.age_days,
            summary: self.summary,
        };
        (self.immunizations, Some(overview))
    }
}

pub type ImmunizationStore = EntityStore<ImmunizationScheduleResponse>;

pub fn immunization_store(client: ApiClient) -> ImmunizationStore {
    EntityStore::new(client, ENDPOINT)
}

impl ImmunizationStore {
    /// Record an administered vaccine for the child, then refetch the
    /// schedule so the per-vaccine statuses and summary reflect it.
    pub async fn record(
        &mut self,
        child_id: &str,
        payload: &RecordImmunizationPayload,
    ) -> Result<ChildImmunization, StoreError> {
        self.create(child_id, payload).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::auth::StaticToken;
    use crate::testutil::MockApi;

    fn schedule_envelope(completed: u32) -> String {
        format!(
            r#"{{
                "child_id": "c-1",
                "age_months": 2,
                "age_days": 61,
                "immunizations": [],
                "summary": {{"total": 18, "completed": {}, "pending": 8, "overdue": 0, "upcoming": 2}}
            }}"#,
            completed
        )
    }

    #[tokio::test]
    async fn test_schedule_envelope_splits_into_items_and_overview() {
        let server = MockApi::serve(vec![(
            200,
            r#"{
                "child_id": "c-1",
                "age_months": 6,
                "age_days": 183,
                "immunizations": [{
                    "schedule": {
                        "id": "sch-1", "name": "DTP-HB-Hib 3",
                        "dose_number": 3, "category": "routine",
                        "priority": "high", "is_required": true,
                        "source": "kemenkes"
                    },
                    "status": "overdue",
                    "days_overdue": 12
                }],
                "summary": {"total": 18, "completed": 9, "pending": 6, "overdue": 1, "upcoming": 2}
            }"#
            .to_string(),
        )]);
        let client =
            ApiClient::new(server.base_url(), Arc::new(StaticToken::new("tok"))).expect("client");
        let mut store = immunization_store(client);

        store.fetch_all("c-1").await.expect("fetch");
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].schedule.name, "DTP-HB-Hib 3");

        let overview = store.summary().expect("overview");
        assert_eq!(overview.age_months, 6);
        assert_eq!(overview.summary.as_ref().map(|s| s.overdue), Some(1));
    }

    #[tokio::test]
    async fn test_record_posts_payload_then_refetches_schedule() {
        let server = MockApi::serve(vec![
            (
                201,
                r#"{"id": "ci-1", "child_id": "c-1",
                    "immunization_schedule_id": "sch-1",
                    "given_date": "2024-04-10"}"#
                    .to_string(),
            ),
            (200, schedule_envelope(10)),
        ]);
        let client =
            ApiClient::new(server.base_url(), Arc::new(StaticToken::new("tok"))).expect("client");
        let mut store = immunization_store(client);

        let payload = RecordImmunizationPayload {
            immunization_schedule_id: "sch-1".to_string(),
            given_date: NaiveDate::from_ymd_opt(2024, 4, 10).expect("date"),
            location: None,
            healthcare_facility: Some("Puskesmas Menteng".to_string()),
            doctor_name: None,
            vaccine_batch_number: None,
            notes: None,
        };
        let recorded = store.record("c-1", &payload).await.expect("record");
        assert_eq!(recorded.id, "ci-1");
        // Awaited refetch already reflects the new record in the summary
        assert_eq!(
            store.summary().and_then(|o| o.summary.as_ref()).map(|s| s.completed),
            Some(10)
        );

        let requests = server.into_requests();
        assert!(requests[0].starts_with("POST /api/children/c-1/immunizations "));
        assert!(requests[0].contains(r#""immunization_schedule_id":"sch-1""#));
        assert!(requests[1].starts_with("GET /api/children/c-1/immunizations "));
    }
}
