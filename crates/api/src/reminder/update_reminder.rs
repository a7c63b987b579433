use crate::error::LedgerdeskError;
use crate::shared::{
    auth::protect_firm_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use ledgerdesk_api_structs::update_reminder::*;
use ledgerdesk_domain::{Firm, Metadata, Reminder, ID};
use ledgerdesk_infra::Context;

pub async fn update_reminder_admin_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, LedgerdeskError> {
    let firm = protect_firm_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = UpdateReminderUseCase {
        firm,
        reminder_id: path_params.reminder_id.clone(),
        compliance_type: body.compliance_type,
        client_label: body.client_label,
        due_date: body.due_date,
        offsets: body.offsets,
        is_active: body.is_active,
        metadata: body.metadata,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(LedgerdeskError::from)
}

/// Generic partial update. Deliberately unable to touch `fired_offsets` or
/// `sent_immediate`, those are owned by the firing paths.
#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub firm: Firm,
    pub reminder_id: ID,
    pub compliance_type: Option<String>,
    pub client_label: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub offsets: Option<Vec<i64>>,
    pub is_active: Option<bool>,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for LedgerdeskError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) => reminder,
            None => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        // The reminder must belong to a user of the authenticated firm
        match ctx.repos.users.find(&reminder.user_id).await {
            Some(user) if user.firm_id == self.firm.id => (),
            _ => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        }

        if let Some(compliance_type) = self.compliance_type.take() {
            reminder.compliance_type = compliance_type;
        }
        if let Some(client_label) = self.client_label.take() {
            reminder.client_label = client_label;
        }
        if let Some(due_date) = self.due_date {
            reminder.due_date = due_date;
        }
        if let Some(offsets) = self.offsets.take() {
            reminder.offsets = super::create_reminder::dedup_offsets(offsets);
        }
        if let Some(is_active) = self.is_active {
            reminder.is_active = is_active;
        }
        if let Some(metadata) = self.metadata.take() {
            reminder.metadata = metadata;
        }

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ledgerdesk_domain::User;
    use ledgerdesk_infra::setup_context_inmemory;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    async fn setup() -> (Context, Firm, Reminder) {
        let ctx = setup_context_inmemory();
        let firm = Firm::new("Acme Accountants");
        ctx.repos.firms.insert(&firm).await.unwrap();
        let user = User::new(firm.id.clone(), "anna@acme.no");
        ctx.repos.users.insert(&user).await.unwrap();

        let mut reminder = Reminder::new(user.id.clone(), "vat-q2", "Acme AS", at(2021, 6, 10));
        reminder.offsets = vec![-1, 0];
        reminder.fired_offsets = vec![-1];
        reminder.sent_immediate = true;
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        (ctx, firm, reminder)
    }

    fn empty_update(firm: Firm, reminder_id: ID) -> UpdateReminderUseCase {
        UpdateReminderUseCase {
            firm,
            reminder_id,
            compliance_type: None,
            client_label: None,
            due_date: None,
            offsets: None,
            is_active: None,
            metadata: None,
        }
    }

    #[actix_web::test]
    async fn deactivation_is_a_soft_disable() {
        let (ctx, firm, reminder) = setup().await;
        let mut usecase = empty_update(firm, reminder.id.clone());
        usecase.is_active = Some(false);
        execute(usecase, &ctx).await.unwrap();

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert!(!stored.is_active);
        // Still present, soft-disabled rather than deleted
        assert_eq!(stored.client_label, "Acme AS");
    }

    #[actix_web::test]
    async fn update_never_touches_firing_bookkeeping() {
        let (ctx, firm, reminder) = setup().await;
        let mut usecase = empty_update(firm, reminder.id.clone());
        usecase.offsets = Some(vec![-7, -3, -1, 0]);
        usecase.due_date = Some(at(2021, 6, 14));
        let updated = execute(usecase, &ctx).await.unwrap();

        assert_eq!(updated.offsets, vec![-7, -3, -1, 0]);
        assert_eq!(updated.due_date, at(2021, 6, 14));
        assert_eq!(updated.fired_offsets, vec![-1]);
        assert!(updated.sent_immediate);
    }

    #[actix_web::test]
    async fn updated_offsets_are_deduped_like_at_creation() {
        let (ctx, firm, reminder) = setup().await;
        let mut usecase = empty_update(firm, reminder.id.clone());
        usecase.offsets = Some(vec![-3, 0, -3, 0]);
        let updated = execute(usecase, &ctx).await.unwrap();
        assert_eq!(updated.offsets, vec![-3, 0]);
    }

    #[actix_web::test]
    async fn other_firms_cannot_update_the_reminder() {
        let (ctx, _firm, reminder) = setup().await;
        let other_firm = Firm::new("Rival Revisjon");
        ctx.repos.firms.insert(&other_firm).await.unwrap();

        let mut usecase = empty_update(other_firm, reminder.id.clone());
        usecase.is_active = Some(false);
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::NotFound(reminder.id));
    }
}
