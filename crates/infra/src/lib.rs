mod bus;
mod config;
mod repos;
mod services;
mod system;

pub use bus::{ChangeBus, StoreEvent};
pub use config::Config;
pub use repos::{
    DeleteResult, IPushSubscriptionRepo, IReminderRepo, IScheduledNotificationRepo,
    InMemoryPushSubscriptionRepo, InMemoryReminderRepo, InMemoryScheduledNotificationRepo, Repos,
};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct ChimeContext {
    pub repos: Repos,
    pub config: Config,
    pub services: Services,
    pub bus: ChangeBus,
    pub sys: Arc<dyn ISys>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl ChimeContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        Self {
            repos,
            config: Config::new(),
            services: Services::production(),
            bus: ChangeBus::new(),
            sys: Arc::new(RealSys {}),
        }
    }

    /// In-memory context for tests. Swap individual repos or services on the
    /// returned value to seed data or stub out delivery.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            services: Services::production(),
            bus: ChangeBus::new(),
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> ChimeContext {
    ChimeContext::create(ContextParams {
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

    sqlx::migrate!("../../migrations").run(&pool).await
}
