use crate::shared::entity::{Entity, ID};
use crate::Metadata;
use chrono::{DateTime, Utc};

/// A `Reminder` tracks an upcoming compliance deadline (VAT filing, annual
/// accounts, tax return etc.) for one of a `User`s clients. Notifications
/// fire on the days given by `offsets`, counted relative to `due_date`.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: ID,
    /// The `User` that owns this reminder and receives its notifications
    pub user_id: ID,
    /// Optional owning `Firm`, set when the reminder should be visible firm-wide
    pub firm_id: Option<ID>,
    /// Free-text category tag for the compliance item, e.g. "vat-q2"
    pub compliance_type: String,
    /// Free-text label identifying the client this deadline belongs to
    pub client_label: String,
    /// Absolute due instant, time-of-day normally midnight UTC
    pub due_date: DateTime<Utc>,
    /// Signed day-counts relative to `due_date` on which to notify.
    /// Negative means before the due date, 0 the due date itself.
    pub offsets: Vec<i64>,
    /// The subset of `offsets` that already triggered a notification.
    /// Only ever grows, an offset present here must never fire again.
    pub fired_offsets: Vec<i64>,
    /// Inactive reminders are skipped by the scheduler (soft-disable)
    pub is_active: bool,
    /// Whether the creation-time near-due courtesy notice has been sent.
    /// Tracked separately from `fired_offsets` and never retried.
    pub sent_immediate: bool,
    /// Timestamp in millis of the most recent scheduler-triggered send
    pub sent_at: Option<i64>,
    pub metadata: Metadata,
}

/// Signed whole-day distance from `now` to `due`, both truncated to UTC
/// midnight before differencing. 0 means due today, negative overdue,
/// positive due in the future.
pub fn day_diff(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    due.date_naive()
        .signed_duration_since(now.date_naive())
        .num_days()
}

impl Reminder {
    pub fn new(user_id: ID, compliance_type: &str, client_label: &str, due_date: DateTime<Utc>) -> Self {
        Self {
            id: Default::default(),
            user_id,
            firm_id: None,
            compliance_type: compliance_type.to_string(),
            client_label: client_label.to_string(),
            due_date,
            offsets: Vec::new(),
            fired_offsets: Vec::new(),
            is_active: true,
            sent_immediate: false,
            sent_at: None,
            metadata: Default::default(),
        }
    }

    /// The offset that is due to fire at `now`, if any. `now`s day position
    /// relative to the due date is `-day_diff(due, now)`, so offset `-1`
    /// matches the day before the due date and `0` the due day itself.
    /// Always evaluates the live `offsets` and `due_date`.
    pub fn offset_due_at(&self, now: DateTime<Utc>) -> Option<i64> {
        let position = -day_diff(self.due_date, now);
        if self.offsets.contains(&position) && !self.fired_offsets.contains(&position) {
            Some(position)
        } else {
            None
        }
    }

    /// Record that the notification for `offset` went out. Appending before
    /// the actual send is what makes a `(reminder, offset)` pair at-most-once.
    pub fn mark_fired(&mut self, offset: i64, sent_at: i64) {
        if !self.fired_offsets.contains(&offset) {
            self.fired_offsets.push(offset);
        }
        self.sent_at = Some(sent_at);
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}
