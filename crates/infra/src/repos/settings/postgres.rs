use super::ISettingsRepo;
use coursebell_domain::ReminderConfig;
use sqlx::PgPool;
use tracing::warn;

pub struct PostgresSettingsRepo {
    pool: PgPool,
}

impl PostgresSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ISettingsRepo for PostgresSettingsRepo {
    async fn get(&self) -> ReminderConfig {
        let row = sqlx::query_as::<_, (serde_json::Value,)>(
            "SELECT config FROM reminder_settings WHERE onerow_id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_default();

        match row {
            Some((value,)) => match serde_json::from_value(value) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Stored reminder settings are not readable ({}), using defaults.", e);
                    ReminderConfig::default()
                }
            },
            None => ReminderConfig::default(),
        }
    }

    async fn save(&self, config: &ReminderConfig) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminder_settings (onerow_id, config)
            VALUES(1, $1)
            ON CONFLICT (onerow_id) DO UPDATE SET config = $1
            "#,
        )
        .bind(serde_json::to_value(config)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
