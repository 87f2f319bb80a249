use super::IScanLogRepo;
use crate::repos::shared::repo::DeleteResult;
use coursebell_domain::ScanLogRecord;
use std::sync::Mutex;

pub struct InMemoryScanLogRepo {
    records: Mutex<Vec<ScanLogRecord>>,
}

impl InMemoryScanLogRepo {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryScanLogRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IScanLogRepo for InMemoryScanLogRepo {
    async fn insert(&self, record: &ScanLogRecord) -> anyhow::Result<()> {
        let mut records = self.records.lock().unwrap();
        records.push(record.clone());
        Ok(())
    }

    async fn find_latest(&self) -> Option<ScanLogRecord> {
        let records = self.records.lock().unwrap();
        records.iter().max_by_key(|r| r.time).cloned()
    }

    async fn delete_all_before(&self, before: i64) -> anyhow::Result<DeleteResult> {
        let mut records = self.records.lock().unwrap();
        let len_before = records.len();
        records.retain(|r| r.time >= before);
        Ok(DeleteResult {
            deleted_count: (len_before - records.len()) as i64,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use coursebell_domain::ScanOutcome;

    #[tokio::test]
    async fn latest_record_wins() {
        let repo = InMemoryScanLogRepo::new();
        assert!(repo.find_latest().await.is_none());

        for time in [100, 300, 200] {
            repo.insert(&ScanLogRecord {
                time,
                outcome: ScanOutcome::Sent,
            })
            .await
            .unwrap();
        }
        assert_eq!(repo.find_latest().await.unwrap().time, 300);

        let res = repo.delete_all_before(250).await.unwrap();
        assert_eq!(res.deleted_count, 2);
        assert_eq!(repo.find_latest().await.unwrap().time, 300);
    }
}
