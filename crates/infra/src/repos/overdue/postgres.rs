use super::IOverdueMarkerRepo;
use coursebell_domain::{OverdueSendMarker, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresOverdueMarkerRepo {
    pool: PgPool,
}

impl PostgresOverdueMarkerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MarkerRaw {
    event_uid: Uuid,
    sent_at: i64,
}

impl From<MarkerRaw> for OverdueSendMarker {
    fn from(m: MarkerRaw) -> Self {
        Self {
            event_id: m.event_uid.into(),
            sent_at: m.sent_at,
        }
    }
}

#[async_trait::async_trait]
impl IOverdueMarkerRepo for PostgresOverdueMarkerRepo {
    async fn insert(&self, marker: &OverdueSendMarker) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO overdue_markers (event_uid, sent_at)
            VALUES($1, $2)
            ON CONFLICT (event_uid) DO NOTHING
            "#,
        )
        .bind(marker.event_id.inner_ref())
        .bind(marker.sent_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<OverdueSendMarker> {
        sqlx::query_as::<_, MarkerRaw>("SELECT * FROM overdue_markers WHERE event_uid = $1")
            .bind(event_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(Into::into)
    }
}
