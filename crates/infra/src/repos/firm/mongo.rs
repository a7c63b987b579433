use super::IFirmRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use ledgerdesk_domain::{Firm, FirmSettings, ID};
use mongodb::{
    bson::{doc, Document},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

pub struct MongoFirmRepo {
    collection: Collection<Document>,
}

impl MongoFirmRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("firms"),
        }
    }
}

#[async_trait::async_trait]
impl IFirmRepo for MongoFirmRepo {
    async fn insert(&self, firm: &Firm) -> anyhow::Result<()> {
        mongo_repo::insert::<_, FirmMongo>(&self.collection, firm).await
    }

    async fn save(&self, firm: &Firm) -> anyhow::Result<()> {
        mongo_repo::save::<_, FirmMongo>(&self.collection, firm).await
    }

    async fn find(&self, firm_id: &ID) -> Option<Firm> {
        mongo_repo::find::<_, FirmMongo>(&self.collection, &firm_id.as_string()).await
    }

    async fn find_by_api_key(&self, api_key: &str) -> Option<Firm> {
        let filter = doc! {
            "secret_api_key": api_key
        };
        mongo_repo::find_one_by::<_, FirmMongo>(&self.collection, filter).await
    }
}

/// A malformed `_id` fails deserialization so the document is skipped and
/// logged instead of surfacing a firm with a freshly minted id.
#[derive(Debug, Serialize, Deserialize)]
struct FirmMongo {
    _id: ID,
    name: String,
    secret_api_key: String,
    reply_to_email: Option<String>,
}

impl MongoDocument<Firm> for FirmMongo {
    fn to_domain(self) -> Firm {
        Firm {
            id: self._id,
            name: self.name,
            secret_api_key: self.secret_api_key,
            settings: FirmSettings {
                reply_to_email: self.reply_to_email,
            },
        }
    }

    fn from_domain(firm: &Firm) -> Self {
        Self {
            _id: firm.id.clone(),
            name: firm.name.clone(),
            secret_api_key: firm.secret_api_key.clone(),
            reply_to_email: firm.settings.reply_to_email.clone(),
        }
    }

    fn get_id_filter(&self) -> Document {
        mongo_repo::id_filter(&self._id.as_string())
    }
}
