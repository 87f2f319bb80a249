use super::ISettingsRepo;
use coursebell_domain::ReminderConfig;
use std::sync::Mutex;

pub struct InMemorySettingsRepo {
    config: Mutex<ReminderConfig>,
}

impl InMemorySettingsRepo {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(ReminderConfig::default()),
        }
    }
}

impl Default for InMemorySettingsRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISettingsRepo for InMemorySettingsRepo {
    async fn get(&self) -> ReminderConfig {
        self.config.lock().unwrap().clone()
    }

    async fn save(&self, config: &ReminderConfig) -> anyhow::Result<()> {
        *self.config.lock().unwrap() = config.clone();
        Ok(())
    }
}
