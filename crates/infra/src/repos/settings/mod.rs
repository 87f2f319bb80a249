mod inmemory;
mod postgres;

pub use inmemory::InMemorySettingsRepo;
pub use postgres::PostgresSettingsRepo;

use coursebell_domain::ReminderConfig;

/// Source of the per-cycle reminder configuration. The engine loads it once
/// at the top of every cycle and treats it as immutable from there on.
#[async_trait::async_trait]
pub trait ISettingsRepo: Send + Sync {
    /// The stored configuration, or the defaults when none has been saved.
    async fn get(&self) -> ReminderConfig;
    async fn save(&self, config: &ReminderConfig) -> anyhow::Result<()>;
}
