mod inmemory;
mod postgres;

pub use inmemory::InMemoryOverdueMarkerRepo;
pub use postgres::PostgresOverdueMarkerRepo;

use coursebell_domain::{OverdueSendMarker, ID};

/// One marker per event once its overdue notice has been attempted. Insert
/// is idempotent so a marker can never be duplicated.
#[async_trait::async_trait]
pub trait IOverdueMarkerRepo: Send + Sync {
    async fn insert(&self, marker: &OverdueSendMarker) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> Option<OverdueSendMarker>;
}
