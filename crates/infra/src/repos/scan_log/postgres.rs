use super::IScanLogRepo;
use crate::repos::shared::repo::DeleteResult;
use coursebell_domain::{ScanLogRecord, ScanOutcome};
use sqlx::{FromRow, PgPool};

pub struct PostgresScanLogRepo {
    pool: PgPool,
}

impl PostgresScanLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScanLogRaw {
    time: i64,
    outcome: String,
}

impl ScanLogRaw {
    fn into_record(self) -> Option<ScanLogRecord> {
        Some(ScanLogRecord {
            time: self.time,
            outcome: ScanOutcome::parse(&self.outcome)?,
        })
    }
}

#[async_trait::async_trait]
impl IScanLogRepo for PostgresScanLogRepo {
    async fn insert(&self, record: &ScanLogRecord) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO reminder_log (time, outcome) VALUES($1, $2)")
            .bind(record.time)
            .bind(record.outcome.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_latest(&self) -> Option<ScanLogRecord> {
        sqlx::query_as::<_, ScanLogRaw>(
            "SELECT time, outcome FROM reminder_log ORDER BY time DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .and_then(|raw| raw.into_record())
    }

    async fn delete_all_before(&self, before: i64) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query("DELETE FROM reminder_log WHERE time < $1")
            .bind(before)
            .execute(&self.pool)
            .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
