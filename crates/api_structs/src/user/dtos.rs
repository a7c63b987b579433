use ledgerdesk_domain::{Metadata, PlanTier, User, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: ID,
    pub firm_id: ID,
    pub email: String,
    pub plan_tier: PlanTier,
    pub metadata: Metadata,
}

impl UserDTO {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id,
            firm_id: user.firm_id,
            email: user.email,
            plan_tier: user.plan_tier,
            metadata: user.metadata,
        }
    }
}
