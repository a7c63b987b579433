mod inmemory;
mod mongo;

pub use inmemory::InMemoryFirmRepo;
use ledgerdesk_domain::{Firm, ID};
pub use mongo::MongoFirmRepo;

#[async_trait::async_trait]
pub trait IFirmRepo: Send + Sync {
    async fn insert(&self, firm: &Firm) -> anyhow::Result<()>;
    async fn save(&self, firm: &Firm) -> anyhow::Result<()>;
    async fn find(&self, firm_id: &ID) -> Option<Firm>;
    async fn find_by_api_key(&self, api_key: &str) -> Option<Firm>;
}
