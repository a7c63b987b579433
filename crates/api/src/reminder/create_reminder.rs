use crate::error::LedgerdeskError;
use crate::shared::{
    auth::{firm_can_modify_user, protect_firm_route},
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use ledgerdesk_api_structs::create_reminder::*;
use ledgerdesk_domain::{day_diff, Firm, Metadata, Reminder, User};
use ledgerdesk_infra::{Context, Mail};
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

pub async fn create_reminder_admin_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, LedgerdeskError> {
    let firm = protect_firm_route(&http_req, &ctx).await?;
    let user = firm_can_modify_user(&firm, &path_params.user_id, &ctx).await?;

    let body = body.0;
    let usecase = CreateReminderUseCase {
        user,
        firm,
        compliance_type: body.compliance_type,
        client_label: body.client_label,
        due_date: body.due_date,
        offsets: body.offsets,
        firm_wide: body.firm_wide.unwrap_or(false),
        metadata: body.metadata.unwrap_or_default(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(LedgerdeskError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub user: User,
    pub firm: Firm,
    pub compliance_type: String,
    pub client_label: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub offsets: Option<Vec<i64>>,
    pub firm_wide: bool,
    pub metadata: Metadata,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyField(&'static str),
    StorageError,
}

impl From<UseCaseError> for LedgerdeskError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyField(field) => {
                Self::BadClientData(format!("The field: {}, must not be empty", field))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if self.compliance_type.trim().is_empty() {
            return Err(UseCaseError::EmptyField("complianceType"));
        }
        if self.client_label.trim().is_empty() {
            return Err(UseCaseError::EmptyField("clientLabel"));
        }

        let offsets = match self.offsets.take() {
            Some(offsets) => dedup_offsets(offsets),
            None => ctx.config.default_offsets_for(self.user.plan_tier),
        };

        let mut reminder = Reminder::new(
            self.user.id.clone(),
            &self.compliance_type,
            &self.client_label,
            self.due_date,
        );
        reminder.offsets = offsets;
        if self.firm_wide {
            reminder.firm_id = Some(self.firm.id.clone());
        }
        reminder.metadata = self.metadata.clone();

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // Near-due courtesy notice: fired once at creation time when the due
        // date is already close. Failures never fail the request and the
        // notice is not retried, `sent_immediate` simply stays false.
        let days_left = day_diff(reminder.due_date, ctx.sys.get_utc_datetime());
        if days_left >= 0 && days_left <= ctx.config.near_due_window_days {
            let mail = render_near_due_mail(&reminder, &self.user, &self.firm, days_left);
            let send_timeout = Duration::from_secs(ctx.config.mail_send_timeout_secs);
            match timeout(send_timeout, ctx.mailer.send(mail)).await {
                Ok(Ok(())) => {
                    reminder.sent_immediate = true;
                    if let Err(e) = ctx.repos.reminders.save(&reminder).await {
                        warn!(
                            "Unable to record the near-due notice for reminder: {} : {:?}",
                            reminder.id, e
                        );
                        reminder.sent_immediate = false;
                    }
                }
                Ok(Err(e)) => {
                    warn!(
                        "Near-due notice for new reminder: {} failed to send: {:?}",
                        reminder.id, e
                    );
                }
                Err(_) => {
                    warn!(
                        "Near-due notice for new reminder: {} timed out",
                        reminder.id
                    );
                }
            }
        }

        Ok(reminder)
    }
}

/// Keeps the first occurrence of every offset, preserving caller order
pub(super) fn dedup_offsets(offsets: Vec<i64>) -> Vec<i64> {
    let mut seen = Vec::with_capacity(offsets.len());
    for offset in offsets {
        if !seen.contains(&offset) {
            seen.push(offset);
        }
    }
    seen
}

fn render_near_due_mail(reminder: &Reminder, user: &User, firm: &Firm, days_left: i64) -> Mail {
    let due = reminder.due_date.format("%Y-%m-%d");
    let when = match days_left {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n => format!("in {} days", n),
    };
    Mail {
        to: user.email.clone(),
        subject: format!(
            "Heads up: {} for {} is due {}",
            reminder.compliance_type, reminder.client_label, when
        ),
        body_text: format!(
            "The {} deadline for {} that was just added is due {} ({}).",
            reminder.compliance_type, reminder.client_label, when, due
        ),
        body_html: None,
        reply_to: firm.settings.reply_to_email.clone(),
    }
}
