mod inmemory;
mod mongo;

pub use inmemory::InMemoryUserRepo;
use ledgerdesk_domain::{User, ID};
pub use mongo::MongoUserRepo;

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn save(&self, user: &User) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> Option<User>;
}
