use crate::shared::usecase::UseCase;
use chrono::{DateTime, Utc};
use ledgerdesk_domain::{Reminder, User};
use ledgerdesk_infra::{Context, Mail};
use std::time::Duration;
use tokio::time::timeout;
use tracing::error;

/// One scheduler tick: evaluates every active reminder against a single
/// reference instant and fires the outstanding offset notifications.
#[derive(Debug)]
pub struct FireDueRemindersUseCase {}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

/// What happened to the reminders of one tick, for logging
#[derive(Debug, Default, PartialEq)]
pub struct TickSummary {
    pub fired: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[async_trait::async_trait(?Send)]
impl UseCase for FireDueRemindersUseCase {
    type Response = TickSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "FireDueReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        // One reference instant for the whole tick so every reminder is
        // evaluated against the same calendar day
        let now = ctx.sys.get_utc_datetime();

        let reminders = ctx.repos.reminders.find_active().await.map_err(|e| {
            error!("Unable to query active reminders: {:?}", e);
            UseCaseError::StorageError
        })?;

        let mut summary = TickSummary::default();
        for reminder in reminders {
            // A failing reminder must not take down the rest of the tick
            match fire_reminder(reminder, now, ctx).await {
                Ok(true) => summary.fired += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    error!("Failed to process reminder: {:?}", e);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}

/// Fires the outstanding offset notification for one reminder, if any.
/// Returns whether a notification went out.
async fn fire_reminder(
    mut reminder: Reminder,
    now: DateTime<Utc>,
    ctx: &Context,
) -> anyhow::Result<bool> {
    let offset = match reminder.offset_due_at(now) {
        Some(offset) => offset,
        None => return Ok(false),
    };

    let user = ctx
        .repos
        .users
        .find(&reminder.user_id)
        .await
        .ok_or_else(|| {
            anyhow::anyhow!("Owner user: {} of reminder not found", reminder.user_id)
        })?;

    // Write before send: if the process dies after this save the offset is
    // marked fired without a mail going out. That loses one notification but
    // can never spam the user with duplicates.
    reminder.mark_fired(offset, ctx.sys.get_timestamp_millis());
    ctx.repos.reminders.save(&reminder).await?;

    let mail = render_offset_mail(&reminder, &user, ctx).await;
    let send_timeout = Duration::from_secs(ctx.config.mail_send_timeout_secs);
    match timeout(send_timeout, ctx.mailer.send(mail)).await {
        Ok(Ok(())) => Ok(true),
        Ok(Err(e)) => {
            // The offset is already persisted as fired and will not be
            // retried. Operators have to act on this log line.
            error!(
                "Reminder: {} offset: {} was marked fired but the mail send failed: {:?}",
                reminder.id, offset, e
            );
            Ok(true)
        }
        Err(_) => {
            error!(
                "Reminder: {} offset: {} was marked fired but the mail send timed out",
                reminder.id, offset
            );
            Ok(true)
        }
    }
}

async fn render_offset_mail(reminder: &Reminder, user: &User, ctx: &Context) -> Mail {
    let due = reminder.due_date.format("%Y-%m-%d");
    let reply_to = match &reminder.firm_id {
        Some(firm_id) => ctx
            .repos
            .firms
            .find(firm_id)
            .await
            .and_then(|firm| firm.settings.reply_to_email),
        None => None,
    };
    Mail {
        to: user.email.clone(),
        subject: format!(
            "Deadline reminder: {} for {} due {}",
            reminder.compliance_type, reminder.client_label, due
        ),
        body_text: format!(
            "The {} deadline for {} is due on {}.",
            reminder.compliance_type, reminder.client_label, due
        ),
        body_html: Some(format!(
            "<p>The <strong>{}</strong> deadline for <strong>{}</strong> is due on {}.</p>",
            reminder.compliance_type, reminder.client_label, due
        )),
        reply_to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::TimeZone;
    use ledgerdesk_domain::{Firm, PlanTier, User};
    use ledgerdesk_infra::{setup_context_inmemory, ISys, InMemoryMailer, InMemoryReminderRepo};
    use std::sync::Arc;

    struct StaticTimeSys(DateTime<Utc>);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0.timestamp_millis()
        }
        fn get_utc_datetime(&self) -> DateTime<Utc> {
            self.0
        }
    }

    struct TestContext {
        ctx: Context,
        mailer: Arc<InMemoryMailer>,
        user: User,
    }

    async fn setup(now: DateTime<Utc>) -> TestContext {
        let mut ctx = setup_context_inmemory();
        let mailer = Arc::new(InMemoryMailer::new());
        ctx.mailer = mailer.clone();
        ctx.sys = Arc::new(StaticTimeSys(now));

        let firm = Firm::new("Acme Accountants");
        ctx.repos.firms.insert(&firm).await.unwrap();
        let mut user = User::new(firm.id.clone(), "anna@acme.no");
        user.plan_tier = PlanTier::Premium;
        ctx.repos.users.insert(&user).await.unwrap();

        TestContext { ctx, mailer, user }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    async fn insert_reminder(
        test_ctx: &TestContext,
        due: DateTime<Utc>,
        offsets: Vec<i64>,
    ) -> Reminder {
        insert_reminder_into(&test_ctx.ctx, &test_ctx.user, due, offsets).await
    }

    async fn insert_reminder_into(
        ctx: &Context,
        user: &User,
        due: DateTime<Utc>,
        offsets: Vec<i64>,
    ) -> Reminder {
        let mut reminder = Reminder::new(user.id.clone(), "vat-q2", "Acme AS", due);
        reminder.offsets = offsets;
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        reminder
    }

    async fn run_tick(ctx: &Context) -> TickSummary {
        execute(FireDueRemindersUseCase {}, ctx).await.unwrap()
    }

    #[actix_web::test]
    async fn fires_when_day_diff_matches_an_offset() {
        let test_ctx = setup(at(2021, 6, 9, 10)).await;
        let reminder = insert_reminder(&test_ctx, at(2021, 6, 10, 0), vec![-7, -3, -1, 0]).await;

        let summary = run_tick(&test_ctx.ctx).await;
        assert_eq!(summary.fired, 1);
        assert_eq!(test_ctx.mailer.sent().len(), 1);
        let sent = &test_ctx.mailer.sent()[0];
        assert_eq!(sent.to, "anna@acme.no");
        assert!(sent.subject.contains("vat-q2"));
        assert!(sent.subject.contains("Acme AS"));
        assert!(sent.subject.contains("2021-06-10"));

        let stored = test_ctx.ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.fired_offsets, vec![-1]);
        assert!(stored.sent_at.is_some());
    }

    #[actix_web::test]
    async fn does_not_fire_between_offsets() {
        // Offsets [-1, 0] with a due date 5 days out: nothing to do
        let test_ctx = setup(at(2021, 6, 5, 12)).await;
        insert_reminder(&test_ctx, at(2021, 6, 10, 0), vec![-1, 0]).await;

        let summary = run_tick(&test_ctx.ctx).await;
        assert_eq!(summary, TickSummary { fired: 0, skipped: 1, failed: 0 });
        assert!(test_ctx.mailer.sent().is_empty());
    }

    #[actix_web::test]
    async fn fires_at_most_once_per_offset_across_many_ticks() {
        // A reminder due today with offset 0 fires exactly once no matter
        // how many ticks run on that calendar day
        let test_ctx = setup(at(2021, 6, 10, 0)).await;
        insert_reminder(&test_ctx, at(2021, 6, 10, 0), vec![0]).await;

        for _ in 0..5 {
            run_tick(&test_ctx.ctx).await;
        }
        assert_eq!(test_ctx.mailer.sent().len(), 1);
    }

    #[actix_web::test]
    async fn fired_offsets_only_grow() {
        let test_ctx = setup(at(2021, 6, 9, 8)).await;
        let reminder = insert_reminder(&test_ctx, at(2021, 6, 10, 0), vec![-1, 0]).await;

        run_tick(&test_ctx.ctx).await;
        run_tick(&test_ctx.ctx).await;
        let stored = test_ctx.ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.fired_offsets, vec![-1]);

        // Next calendar day, offset 0 fires on top of the recorded -1
        let mut ctx = test_ctx.ctx.clone();
        ctx.sys = Arc::new(StaticTimeSys(at(2021, 6, 10, 8)));
        execute(FireDueRemindersUseCase {}, &ctx).await.unwrap();
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.fired_offsets, vec![-1, 0]);
        assert_eq!(test_ctx.mailer.sent().len(), 2);
    }

    #[actix_web::test]
    async fn inactive_reminders_are_skipped() {
        let test_ctx = setup(at(2021, 6, 10, 0)).await;
        let mut reminder = insert_reminder(&test_ctx, at(2021, 6, 10, 0), vec![0]).await;
        reminder.is_active = false;
        test_ctx.ctx.repos.reminders.save(&reminder).await.unwrap();

        let summary = run_tick(&test_ctx.ctx).await;
        assert_eq!(summary, TickSummary::default());
        assert!(test_ctx.mailer.sent().is_empty());
    }

    #[actix_web::test]
    async fn overdue_reminder_does_not_fire_on_unlisted_days() {
        // Due yesterday but only offset 0 was requested: -1 is not fired
        let test_ctx = setup(at(2021, 6, 11, 9)).await;
        insert_reminder(&test_ctx, at(2021, 6, 10, 0), vec![0]).await;

        let summary = run_tick(&test_ctx.ctx).await;
        assert_eq!(summary.fired, 0);
        assert!(test_ctx.mailer.sent().is_empty());
    }

    #[actix_web::test]
    async fn send_failure_after_persist_is_not_retried() {
        let test_ctx = setup(at(2021, 6, 10, 0)).await;
        let reminder = insert_reminder(&test_ctx, at(2021, 6, 10, 0), vec![0]).await;

        test_ctx.mailer.set_failing(true);
        run_tick(&test_ctx.ctx).await;

        // Offset was persisted as fired even though the send failed
        let stored = test_ctx.ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.fired_offsets, vec![0]);

        // The accepted trade-off: recovery of the mail relay does not
        // resurrect the missed notification
        test_ctx.mailer.set_failing(false);
        run_tick(&test_ctx.ctx).await;
        assert!(test_ctx.mailer.sent().is_empty());
    }

    #[actix_web::test]
    async fn persist_failure_aborts_before_any_mail_goes_out() {
        let test_ctx = setup(at(2021, 6, 10, 0)).await;
        let repo = Arc::new(InMemoryReminderRepo::new());
        let mut ctx = test_ctx.ctx.clone();
        ctx.repos.reminders = repo.clone();
        let reminder = insert_reminder_into(&ctx, &test_ctx.user, at(2021, 6, 10, 0), vec![0]).await;

        repo.set_failing(true);
        let summary = execute(FireDueRemindersUseCase {}, &ctx).await.unwrap();
        assert_eq!(summary.failed, 1);
        // Write-before-send: the save failed, so nothing was sent
        assert!(test_ctx.mailer.sent().is_empty());
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert!(stored.fired_offsets.is_empty());

        // Once the store recovers the next tick picks the offset up again
        repo.set_failing(false);
        let summary = execute(FireDueRemindersUseCase {}, &ctx).await.unwrap();
        assert_eq!(summary.fired, 1);
        assert_eq!(test_ctx.mailer.sent().len(), 1);
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.fired_offsets, vec![0]);
    }

    #[actix_web::test]
    async fn reminder_with_missing_owner_counts_as_failed_and_is_retryable() {
        let test_ctx = setup(at(2021, 6, 10, 0)).await;
        let mut reminder = Reminder::new(Default::default(), "vat-q2", "Ghost AS", at(2021, 6, 10, 0));
        reminder.offsets = vec![0];
        test_ctx.ctx.repos.reminders.insert(&reminder).await.unwrap();

        let summary = run_tick(&test_ctx.ctx).await;
        assert_eq!(summary.failed, 1);

        // No state was touched, so the reminder stays eligible
        let stored = test_ctx.ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert!(stored.fired_offsets.is_empty());
    }

    #[actix_web::test]
    async fn one_bad_reminder_does_not_abort_the_tick() {
        let test_ctx = setup(at(2021, 6, 10, 0)).await;
        // Reminder with an owner that does not exist
        let mut orphan = Reminder::new(Default::default(), "vat-q2", "Ghost AS", at(2021, 6, 10, 0));
        orphan.offsets = vec![0];
        test_ctx.ctx.repos.reminders.insert(&orphan).await.unwrap();
        insert_reminder(&test_ctx, at(2021, 6, 10, 0), vec![0]).await;

        let summary = run_tick(&test_ctx.ctx).await;
        assert_eq!(summary.fired, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(test_ctx.mailer.sent().len(), 1);
    }

    #[actix_web::test]
    async fn live_offset_edits_take_effect_next_tick() {
        let test_ctx = setup(at(2021, 6, 7, 9)).await;
        let mut reminder = insert_reminder(&test_ctx, at(2021, 6, 10, 0), vec![-1, 0]).await;

        let summary = run_tick(&test_ctx.ctx).await;
        assert_eq!(summary.fired, 0);

        // An externally made edit is picked up because every tick re-reads
        reminder.offsets = vec![-3, -1, 0];
        test_ctx.ctx.repos.reminders.save(&reminder).await.unwrap();
        let summary = run_tick(&test_ctx.ctx).await;
        assert_eq!(summary.fired, 1);
    }
}
