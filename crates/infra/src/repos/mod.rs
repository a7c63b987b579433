mod firm;
mod reminder;
mod shared;
mod user;

pub use firm::IFirmRepo;
use firm::{InMemoryFirmRepo, MongoFirmRepo};
use mongodb::{options::ClientOptions, Client};
pub use reminder::{IReminderRepo, InMemoryReminderRepo};
use reminder::MongoReminderRepo;
use std::sync::Arc;
use tracing::info;
pub use user::IUserRepo;
use user::{InMemoryUserRepo, MongoUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub firms: Arc<dyn IFirmRepo>,
    pub users: Arc<dyn IUserRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
}

impl Repos {
    pub async fn create_mongodb(
        connection_string: &str,
        db_name: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let client_options = ClientOptions::parse(connection_string).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // This is needed to make sure that db is ready when opening server
        info!("DB CHECKING CONNECTION ...");
        db.collection::<mongodb::bson::Document>("server-start")
            .insert_one(
                mongodb::bson::doc! {
                "server-start": 1
                },
                None,
            )
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            firms: Arc::new(MongoFirmRepo::new(&db)),
            users: Arc::new(MongoUserRepo::new(&db)),
            reminders: Arc::new(MongoReminderRepo::new(&db)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            firms: Arc::new(InMemoryFirmRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
            reminders: Arc::new(InMemoryReminderRepo::new()),
        }
    }
}
