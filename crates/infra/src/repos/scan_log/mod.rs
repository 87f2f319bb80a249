mod inmemory;
mod postgres;

pub use inmemory::InMemoryScanLogRepo;
pub use postgres::PostgresScanLogRepo;

use crate::repos::shared::repo::DeleteResult;
use coursebell_domain::ScanLogRecord;

/// Append-only log of completed scan cycles. Only the most recent record is
/// ever consulted; it is the serialization point for the whole engine.
#[async_trait::async_trait]
pub trait IScanLogRepo: Send + Sync {
    async fn insert(&self, record: &ScanLogRecord) -> anyhow::Result<()>;
    async fn find_latest(&self) -> Option<ScanLogRecord>;
    /// Prunes old records, for operators running the log cleanup task.
    async fn delete_all_before(&self, before: i64) -> anyhow::Result<DeleteResult>;
}
