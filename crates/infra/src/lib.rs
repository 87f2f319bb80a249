mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{
    DeleteResult, EventTimeQuery, ICourseOverrideRepo, ICourseRepo, IDirectoryRepo,
    IEventStoreRepo, IOverdueMarkerRepo, IScanLogRepo, ISettingsRepo, Repos, RoleScope,
};
pub use services::{ITransport, InMemoryTransport, WebhookTransport};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct ReminderContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub transport: Arc<dyn ITransport>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl ReminderContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let transport: Arc<dyn ITransport> = match &config.webhook_url {
            Some(url) => Arc::new(WebhookTransport::new(
                url.clone(),
                config.webhook_key.clone(),
            )),
            None => Arc::new(InMemoryTransport::new()),
        };
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            transport,
        }
    }

    /// A fully in-memory context, used by tests and local experimentation.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            transport: Arc::new(InMemoryTransport::new()),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> ReminderContext {
    ReminderContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
