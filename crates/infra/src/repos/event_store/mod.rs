mod inmemory;
mod postgres;

pub use inmemory::InMemoryEventStoreRepo;
pub use postgres::PostgresEventStoreRepo;

use crate::repos::shared::query_structs::EventTimeQuery;
use coursebell_domain::{CalendarEvent, ID};

/// Read side of the external calendar event store. Events are snapshots;
/// this engine never updates them. The insert exists so deployments syncing
/// an upstream calendar (and tests) can feed the store.
#[async_trait::async_trait]
pub trait IEventStoreRepo: Send + Sync {
    async fn insert(&self, event: &CalendarEvent) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> Option<CalendarEvent>;
    /// All events with some configured lead offset landing inside the scan
    /// window, regardless of category. One query per cycle.
    async fn find_due_for_reminder(&self, query: &EventTimeQuery)
        -> anyhow::Result<Vec<CalendarEvent>>;
    /// Visible deadline (due/close) events whose start lies in `[from, to)`,
    /// candidates for an overdue follow-up.
    async fn find_passed_deadlines(&self, from: i64, to: i64) -> anyhow::Result<Vec<CalendarEvent>>;
}
