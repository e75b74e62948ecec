//! Growth measurement store: a bare-array collection endpoint plus the
//! derived latest-measurement singleton.

use crate::api::ApiClient;
use crate::models::Measurement;

use super::entity::{Endpoint, EntityStore};

const ENDPOINT: Endpoint = Endpoint {
    collection: "children/{child}/measurements",
    latest: Some("children/{child}/measurements/latest"),
    error_fallback: "Gagal memproses pengukuran",
};

pub type MeasurementStore = EntityStore<Vec<Measurement>>;

pub fn measurement_store(client: ApiClient) -> MeasurementStore {
    EntityStore::new(client, ENDPOINT)
}
