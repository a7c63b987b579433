use crate::{
    shared::entity::{Entity, ID},
    Metadata,
};
use serde::{Deserialize, Serialize};

/// Subscription level of a `User`. Decides which default reminder
/// offsets a new `Reminder` gets when the caller does not supply any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Standard,
    Premium,
}

impl Default for PlanTier {
    fn default() -> Self {
        Self::Standard
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub firm_id: ID,
    pub email: String,
    pub plan_tier: PlanTier,
    pub metadata: Metadata,
}

impl User {
    pub fn new(firm_id: ID, email: &str) -> Self {
        Self {
            id: Default::default(),
            firm_id,
            email: email.to_string(),
            plan_tier: Default::default(),
            metadata: Default::default(),
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
