use ledgerdesk_domain::{Firm, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FirmDTO {
    pub id: ID,
    pub name: String,
    pub reply_to_email: Option<String>,
}

impl FirmDTO {
    pub fn new(firm: Firm) -> Self {
        Self {
            id: firm.id,
            name: firm.name,
            reply_to_email: firm.settings.reply_to_email,
        }
    }
}
