use super::IUserRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use ledgerdesk_domain::{Metadata, PlanTier, User, ID};
use mongodb::{bson::Document, Collection, Database};
use serde::{Deserialize, Serialize};

pub struct MongoUserRepo {
    collection: Collection<Document>,
}

impl MongoUserRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for MongoUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        mongo_repo::insert::<_, UserMongo>(&self.collection, user).await
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        mongo_repo::save::<_, UserMongo>(&self.collection, user).await
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        mongo_repo::find::<_, UserMongo>(&self.collection, &user_id.as_string()).await
    }
}

/// A malformed id fails deserialization so the document is skipped and
/// logged instead of surfacing a user with a freshly minted id.
#[derive(Debug, Serialize, Deserialize)]
struct UserMongo {
    _id: ID,
    firm_id: ID,
    email: String,
    plan_tier: PlanTier,
    metadata: Metadata,
}

impl MongoDocument<User> for UserMongo {
    fn to_domain(self) -> User {
        User {
            id: self._id,
            firm_id: self.firm_id,
            email: self.email,
            plan_tier: self.plan_tier,
            metadata: self.metadata,
        }
    }

    fn from_domain(user: &User) -> Self {
        Self {
            _id: user.id.clone(),
            firm_id: user.firm_id.clone(),
            email: user.email.clone(),
            plan_tier: user.plan_tier,
            metadata: user.metadata.clone(),
        }
    }

    fn get_id_filter(&self) -> Document {
        mongo_repo::id_filter(&self._id.as_string())
    }
}
