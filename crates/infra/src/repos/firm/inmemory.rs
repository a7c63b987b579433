use super::IFirmRepo;
use crate::repos::shared::inmemory_repo::*;
use ledgerdesk_domain::{Firm, ID};

pub struct InMemoryFirmRepo {
    firms: std::sync::Mutex<Vec<Firm>>,
}

impl InMemoryFirmRepo {
    pub fn new() -> Self {
        Self {
            firms: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IFirmRepo for InMemoryFirmRepo {
    async fn insert(&self, firm: &Firm) -> anyhow::Result<()> {
        insert(firm, &self.firms);
        Ok(())
    }

    async fn save(&self, firm: &Firm) -> anyhow::Result<()> {
        save(firm, &self.firms);
        Ok(())
    }

    async fn find(&self, firm_id: &ID) -> Option<Firm> {
        find(firm_id, &self.firms)
    }

    async fn find_by_api_key(&self, api_key: &str) -> Option<Firm> {
        self.firms
            .lock()
            .unwrap()
            .iter()
            .find(|firm| firm.secret_api_key == api_key)
            .cloned()
    }
}
