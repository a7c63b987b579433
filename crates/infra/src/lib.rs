mod config;
mod mailer;
mod repos;
mod system;

pub use config::Config;
pub use mailer::{IMailer, InMemoryMailer, Mail, RelayMailer};
pub use repos::{InMemoryReminderRepo, Repos};
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::info;

#[derive(Clone)]
pub struct Context {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mailer: Arc<dyn IMailer>,
}

/// Will setup the infrastructure context given the environment.
/// When no mongodb connection string is configured the repos fall back to
/// in-memory storage, which is only meant for local development and tests.
pub async fn setup_context() -> Context {
    const MONGODB_CONNECTION_STRING: &str = "MONGODB_CONNECTION_STRING";
    const MONGODB_NAME: &str = "MONGODB_NAME";

    let repos = match std::env::var(MONGODB_CONNECTION_STRING) {
        Ok(connection_string) => {
            let db_name = std::env::var(MONGODB_NAME).unwrap_or_else(|_| "ledgerdesk".into());
            Repos::create_mongodb(&connection_string, &db_name)
                .await
                .expect("Mongodb credentials must be set and valid")
        }
        Err(_) => {
            info!(
                "Did not find {} environment variable. Using in-memory repos.",
                MONGODB_CONNECTION_STRING
            );
            Repos::create_inmemory()
        }
    };

    let config = Config::new();
    Context {
        mailer: mailer::setup_mailer(&config),
        repos,
        config,
        sys: Arc::new(RealSys {}),
    }
}

/// Context backed entirely by in-memory collaborators, for tests
pub fn setup_context_inmemory() -> Context {
    Context {
        repos: Repos::create_inmemory(),
        config: Config::default(),
        sys: Arc::new(RealSys {}),
        mailer: Arc::new(InMemoryMailer::new()),
    }
}
