//! Stimulation recommendation store. The endpoint wraps the list in an
//! envelope whose age field doubles as the summary.

use crate::api::ApiClient;
use crate::models::{Recommendation, RecommendationsResponse};

use super::entity::{Endpoint, EntityPage, EntityStore};

const ENDPOINT: Endpoint = Endpoint {
    collection: "children/{child}/recommendations",
    latest: None,
    error_fallback: "Gagal memuat rekomendasi",
};

impl EntityPage for RecommendationsResponse {
    type Item = Recommendation;
    type Summary = i32;

    fn into_parts(self) -> (Vec<Recommendation>, Option<i32>) {
        (self.recommendations, Some(self.age_months))
    }
}

pub type RecommendationStore = EntityStore<RecommendationsResponse>;

pub fn recommendation_store(client: ApiClient) -> RecommendationStore {
    EntityStore::new(client, ENDPOINT)
}
