use chrono::{DateTime, Utc};
use ledgerdesk_domain::{Metadata, Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub user_id: ID,
    pub firm_id: Option<ID>,
    pub compliance_type: String,
    pub client_label: String,
    pub due_date: DateTime<Utc>,
    pub offsets: Vec<i64>,
    pub fired_offsets: Vec<i64>,
    pub is_active: bool,
    pub sent_immediate: bool,
    pub sent_at: Option<i64>,
    pub metadata: Metadata,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            user_id: reminder.user_id,
            firm_id: reminder.firm_id,
            compliance_type: reminder.compliance_type,
            client_label: reminder.client_label,
            due_date: reminder.due_date,
            offsets: reminder.offsets,
            fired_offsets: reminder.fired_offsets,
            is_active: reminder.is_active,
            sent_immediate: reminder.sent_immediate,
            sent_at: reminder.sent_at,
            metadata: reminder.metadata,
        }
    }
}
