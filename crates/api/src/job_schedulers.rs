use crate::reminder::fire_due_reminders::FireDueRemindersUseCase;
use crate::shared::usecase::execute;
use ledgerdesk_infra::Context;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{error, info, warn};

/// Handle to the running reminder job, lets the owner stop the loop
pub struct JobHandle {
    shutdown: Arc<Notify>,
}

impl JobHandle {
    pub fn stop(&self) {
        self.shutdown.notify_one();
    }
}

/// Guard that allows at most one tick in flight. Two overlapping ticks
/// would race on `fired_offsets` reads and could both send the same
/// notification, so a tick that fires while the previous one is still
/// running is skipped instead.
#[derive(Clone)]
pub struct SingleFlight {
    in_progress: Arc<AtomicBool>,
}

pub struct TickPermit {
    in_progress: Arc<AtomicBool>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self {
            in_progress: Arc::new(AtomicBool::new(false)),
        }
    }

    /// `None` when a tick is already running
    pub fn begin_tick(&self) -> Option<TickPermit> {
        if self.in_progress.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(TickPermit {
            in_progress: self.in_progress.clone(),
        })
    }
}

impl Default for SingleFlight {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TickPermit {
    fn drop(&mut self) {
        self.in_progress.store(false, Ordering::SeqCst);
    }
}

/// Spawns the long lived reminder job: every configured interval one tick
/// evaluates all active reminders and fires the due notifications. The loop
/// never exits on error, a failed tick only logs and waits for the next one.
pub fn start_send_reminders_job(ctx: Context) -> JobHandle {
    let shutdown = Arc::new(Notify::new());
    let handle = JobHandle {
        shutdown: shutdown.clone(),
    };
    let single_flight = SingleFlight::new();

    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(
            ctx.config.reminder_job_interval_secs,
        ));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let permit = match single_flight.begin_tick() {
                        Some(permit) => permit,
                        None => {
                            warn!("Previous reminder tick still running, skipping this tick");
                            continue;
                        }
                    };
                    let context = ctx.clone();
                    actix_web::rt::spawn(async move {
                        match execute(FireDueRemindersUseCase {}, &context).await {
                            Ok(summary) => {
                                if summary.fired > 0 || summary.failed > 0 {
                                    info!("Reminder tick done: {:?}", summary);
                                }
                            }
                            Err(e) => error!("Reminder tick failed: {:?}", e),
                        }
                        drop(permit);
                    });
                }
                _ = shutdown.notified() => {
                    info!("Reminder job received shutdown signal");
                    break;
                }
            }
        }
    });

    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use ledgerdesk_domain::{Firm, Reminder, User};
    use ledgerdesk_infra::{setup_context_inmemory, ISys, InMemoryMailer};

    #[test]
    fn single_flight_allows_one_tick_at_a_time() {
        let single_flight = SingleFlight::new();

        let permit = single_flight.begin_tick();
        assert!(permit.is_some());
        assert!(single_flight.begin_tick().is_none());

        drop(permit);
        assert!(single_flight.begin_tick().is_some());
    }

    struct StaticTimeSys(DateTime<Utc>);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0.timestamp_millis()
        }
        fn get_utc_datetime(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[actix_web::test]
    async fn overlapping_tick_is_skipped_and_cannot_double_send() {
        let mut ctx = setup_context_inmemory();
        let mailer = Arc::new(InMemoryMailer::new());
        ctx.mailer = mailer.clone();
        let now = Utc.with_ymd_and_hms(2021, 6, 10, 9, 0, 0).unwrap();
        ctx.sys = Arc::new(StaticTimeSys(now));

        let firm = Firm::new("Acme Accountants");
        ctx.repos.firms.insert(&firm).await.unwrap();
        let user = User::new(firm.id.clone(), "anna@acme.no");
        ctx.repos.users.insert(&user).await.unwrap();
        let mut reminder = Reminder::new(user.id.clone(), "vat-q2", "Acme AS", now);
        reminder.offsets = vec![0];
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let single_flight = SingleFlight::new();

        // First tick holds the permit while it runs
        let permit = single_flight.begin_tick().unwrap();
        // A second tick firing before the first finished is rejected and
        // never reads `fired_offsets`
        assert!(single_flight.begin_tick().is_none());
        execute(FireDueRemindersUseCase {}, &ctx).await.unwrap();
        drop(permit);

        // The next permitted tick sees the persisted `fired_offsets`
        let _permit = single_flight.begin_tick().unwrap();
        execute(FireDueRemindersUseCase {}, &ctx).await.unwrap();

        assert_eq!(mailer.sent().len(), 1);
    }
}
