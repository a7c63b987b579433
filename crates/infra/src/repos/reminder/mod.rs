mod inmemory;
mod mongo;

pub use inmemory::InMemoryReminderRepo;
use ledgerdesk_domain::{Reminder, ID};
pub use mongo::MongoReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// All reminders the scheduler should consider. No pagination, which is
    /// acceptable at expected scale but a known limitation for large datasets.
    async fn find_active(&self) -> anyhow::Result<Vec<Reminder>>;
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Reminder>>;
}
