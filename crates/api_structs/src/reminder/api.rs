use crate::dtos::ReminderDTO;
use chrono::{DateTime, Utc};
use ledgerdesk_domain::{Metadata, Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod create_reminder {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub compliance_type: String,
        pub client_label: String,
        pub due_date: DateTime<Utc>,
        /// Signed day offsets relative to the due date. When omitted the
        /// owner's plan tier decides the default set.
        pub offsets: Option<Vec<i64>>,
        /// Share this reminder with the whole firm
        pub firm_wide: Option<bool>,
        pub metadata: Option<Metadata>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminders {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>) -> Self {
            Self {
                reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
            }
        }
    }
}

pub mod update_reminder {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub compliance_type: Option<String>,
        pub client_label: Option<String>,
        pub due_date: Option<DateTime<Utc>>,
        pub offsets: Option<Vec<i64>>,
        pub is_active: Option<bool>,
        pub metadata: Option<Metadata>,
    }

    pub type APIResponse = ReminderResponse;
}
