use crate::dtos::FirmDTO;
use ledgerdesk_domain::Firm;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmResponse {
    pub firm: FirmDTO,
}

impl FirmResponse {
    pub fn new(firm: Firm) -> Self {
        Self {
            firm: FirmDTO::new(firm),
        }
    }
}

pub mod create_firm {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        pub code: String,
        pub reply_to_email: Option<String>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub firm: FirmDTO,
        pub secret_api_key: String,
    }

    impl APIResponse {
        pub fn new(firm: Firm) -> Self {
            Self {
                secret_api_key: firm.secret_api_key.clone(),
                firm: FirmDTO::new(firm),
            }
        }
    }
}

pub mod get_firm {
    use super::*;

    pub type APIResponse = FirmResponse;
}
