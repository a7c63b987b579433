use super::IReminderRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use chrono::{DateTime, Utc};
use ledgerdesk_domain::{Metadata, Reminder, ID};
use mongodb::{
    bson::{doc, Document},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

pub struct MongoReminderRepo {
    collection: Collection<Document>,
}

impl MongoReminderRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("reminders"),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for MongoReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        mongo_repo::insert::<_, ReminderMongo>(&self.collection, reminder).await
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        mongo_repo::save::<_, ReminderMongo>(&self.collection, reminder).await
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        mongo_repo::find::<_, ReminderMongo>(&self.collection, &reminder_id.as_string()).await
    }

    async fn find_active(&self) -> anyhow::Result<Vec<Reminder>> {
        let filter = doc! {
            "is_active": true
        };
        mongo_repo::find_many_by::<_, ReminderMongo>(&self.collection, filter).await
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        let filter = doc! {
            "user_id": user_id.as_string()
        };
        mongo_repo::find_many_by::<_, ReminderMongo>(&self.collection, filter).await
    }
}

/// Persisted shape of a `Reminder`. The ids and the due date are stored as
/// strings; a document with an unparseable id or date fails deserialization
/// and is skipped (and logged) instead of aborting the whole query. A partly
/// readable reminder must never reach the scheduler, it would fire but not
/// persist its bookkeeping.
#[derive(Debug, Serialize, Deserialize)]
struct ReminderMongo {
    _id: ID,
    user_id: ID,
    firm_id: Option<ID>,
    compliance_type: String,
    client_label: String,
    due_date: DateTime<Utc>,
    offsets: Vec<i64>,
    fired_offsets: Vec<i64>,
    is_active: bool,
    sent_immediate: bool,
    sent_at: Option<i64>,
    metadata: Metadata,
}

impl MongoDocument<Reminder> for ReminderMongo {
    fn to_domain(self) -> Reminder {
        Reminder {
            id: self._id,
            user_id: self.user_id,
            firm_id: self.firm_id,
            compliance_type: self.compliance_type,
            client_label: self.client_label,
            due_date: self.due_date,
            offsets: self.offsets,
            fired_offsets: self.fired_offsets,
            is_active: self.is_active,
            sent_immediate: self.sent_immediate,
            sent_at: self.sent_at,
            metadata: self.metadata,
        }
    }

    fn from_domain(reminder: &Reminder) -> Self {
        Self {
            _id: reminder.id.clone(),
            user_id: reminder.user_id.clone(),
            firm_id: reminder.firm_id.clone(),
            compliance_type: reminder.compliance_type.clone(),
            client_label: reminder.client_label.clone(),
            due_date: reminder.due_date,
            offsets: reminder.offsets.clone(),
            fired_offsets: reminder.fired_offsets.clone(),
            is_active: reminder.is_active,
            sent_immediate: reminder.sent_immediate,
            sent_at: reminder.sent_at,
            metadata: reminder.metadata.clone(),
        }
    }

    fn get_id_filter(&self) -> Document {
        mongo_repo::id_filter(&self._id.as_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mongodb::bson::{doc, from_document, Bson};

    fn valid_doc() -> Document {
        doc! {
            "_id": ID::new().as_string(),
            "user_id": ID::new().as_string(),
            "firm_id": Bson::Null,
            "compliance_type": "vat-q2",
            "client_label": "Acme AS",
            "due_date": "2021-06-10T00:00:00Z",
            "offsets": [-1i64, 0],
            "fired_offsets": [],
            "is_active": true,
            "sent_immediate": false,
            "sent_at": Bson::Null,
            "metadata": {},
        }
    }

    #[test]
    fn it_deserializes_a_well_formed_document() {
        let reminder = from_document::<ReminderMongo>(valid_doc())
            .unwrap()
            .to_domain();
        assert_eq!(reminder.offsets, vec![-1, 0]);
        assert!(reminder.is_active);
    }

    #[test]
    fn malformed_id_fails_deserialization_instead_of_minting_a_new_one() {
        let mut doc = valid_doc();
        doc.insert("_id", "not-an-id");
        assert!(from_document::<ReminderMongo>(doc).is_err());

        let mut doc = valid_doc();
        doc.insert("user_id", "123");
        assert!(from_document::<ReminderMongo>(doc).is_err());
    }
}
