mod course_override;
mod courses;
mod directory;
mod event_store;
mod overdue;
mod scan_log;
mod settings;
mod shared;

use course_override::{InMemoryCourseOverrideRepo, PostgresCourseOverrideRepo};
use courses::{InMemoryCourseRepo, PostgresCourseRepo};
use directory::{InMemoryDirectoryRepo, PostgresDirectoryRepo};
use event_store::{InMemoryEventStoreRepo, PostgresEventStoreRepo};
use overdue::{InMemoryOverdueMarkerRepo, PostgresOverdueMarkerRepo};
use scan_log::{InMemoryScanLogRepo, PostgresScanLogRepo};
use settings::{InMemorySettingsRepo, PostgresSettingsRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

pub use course_override::ICourseOverrideRepo;
pub use courses::ICourseRepo;
pub use directory::IDirectoryRepo;
pub use event_store::IEventStoreRepo;
pub use overdue::IOverdueMarkerRepo;
pub use scan_log::IScanLogRepo;
pub use settings::ISettingsRepo;
pub use shared::query_structs::{EventTimeQuery, RoleScope};
pub use shared::repo::DeleteResult;

#[derive(Clone)]
pub struct Repos {
    pub events: Arc<dyn IEventStoreRepo>,
    pub directory: Arc<dyn IDirectoryRepo>,
    pub courses: Arc<dyn ICourseRepo>,
    pub scan_log: Arc<dyn IScanLogRepo>,
    pub overdue_markers: Arc<dyn IOverdueMarkerRepo>,
    pub course_overrides: Arc<dyn ICourseOverrideRepo>,
    pub settings: Arc<dyn ISettingsRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            events: Arc::new(PostgresEventStoreRepo::new(pool.clone())),
            directory: Arc::new(PostgresDirectoryRepo::new(pool.clone())),
            courses: Arc::new(PostgresCourseRepo::new(pool.clone())),
            scan_log: Arc::new(PostgresScanLogRepo::new(pool.clone())),
            overdue_markers: Arc::new(PostgresOverdueMarkerRepo::new(pool.clone())),
            course_overrides: Arc::new(PostgresCourseOverrideRepo::new(pool.clone())),
            settings: Arc::new(PostgresSettingsRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            events: Arc::new(InMemoryEventStoreRepo::new()),
            directory: Arc::new(InMemoryDirectoryRepo::new()),
            courses: Arc::new(InMemoryCourseRepo::new()),
            scan_log: Arc::new(InMemoryScanLogRepo::new()),
            overdue_markers: Arc::new(InMemoryOverdueMarkerRepo::new()),
            course_overrides: Arc::new(InMemoryCourseOverrideRepo::new()),
            settings: Arc::new(InMemorySettingsRepo::new()),
        }
    }
}
