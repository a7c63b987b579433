use ledgerdesk_domain::PlanTier;
use ledgerdesk_utils::create_random_secret;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret code used to create new `Firm`s
    pub create_firm_secret_code: String,
    /// Port for the application to run on
    pub port: usize,
    /// Interval in seconds between reminder job ticks
    pub reminder_job_interval_secs: u64,
    /// Upper bound in days (inclusive, from 0) of the near-due window that
    /// triggers a courtesy notification at reminder creation
    pub near_due_window_days: i64,
    /// Maximum duration in seconds one notification send may take before the
    /// job gives up on it
    pub mail_send_timeout_secs: u64,
    /// Mail relay endpoint, `None` means outgoing mail is only logged
    pub mail_relay_url: Option<Url>,
    /// Api key for the mail relay
    pub mail_relay_key: Option<String>,
    /// Default offsets for reminders owned by premium tier users
    pub premium_default_offsets: Vec<i64>,
    /// Default offsets for reminders owned by standard tier users
    pub standard_default_offsets: Vec<i64>,
}

impl Config {
    pub fn new() -> Self {
        let create_firm_secret_code = match std::env::var("CREATE_FIRM_SECRET_CODE") {
            Ok(code) => code,
            Err(_) => {
                info!("Did not find CREATE_FIRM_SECRET_CODE environment variable. Going to create one.");
                let code = create_random_secret(16);
                info!(
                    "Secret code for creating firms was generated and set to: {}",
                    code
                );
                code
            }
        };
        let port = parse_env_number("PORT", 5000);
        let reminder_job_interval_secs =
            parse_env_number("REMINDER_JOB_INTERVAL_SECS", 60 * 15) as u64;
        let near_due_window_days = parse_env_number("NEAR_DUE_WINDOW_DAYS", 2) as i64;
        let mail_send_timeout_secs = parse_env_number("MAIL_SEND_TIMEOUT_SECS", 30) as u64;
        let mail_relay_url = std::env::var("MAIL_RELAY_URL")
            .ok()
            .and_then(|url| match Url::parse(&url) {
                Ok(url) => Some(url),
                Err(_) => {
                    warn!(
                        "The given MAIL_RELAY_URL: {} is not a valid url and will be ignored.",
                        url
                    );
                    None
                }
            });
        let mail_relay_key = std::env::var("MAIL_RELAY_KEY").ok();

        Self {
            create_firm_secret_code,
            port,
            reminder_job_interval_secs,
            near_due_window_days,
            mail_send_timeout_secs,
            mail_relay_url,
            mail_relay_key,
            premium_default_offsets: vec![-7, -3, -1, 0],
            standard_default_offsets: vec![-1, 0],
        }
    }

    /// Default reminder offsets for the given plan tier, used when a
    /// reminder is created without an explicit offset list
    pub fn default_offsets_for(&self, tier: PlanTier) -> Vec<i64> {
        match tier {
            PlanTier::Premium => self.premium_default_offsets.clone(),
            PlanTier::Standard => self.standard_default_offsets.clone(),
        }
    }
}

fn parse_env_number(var: &str, default: usize) -> usize {
    let value = match std::env::var(var) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.parse::<usize>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                var, value, default
            );
            default
        }
    }
}

/// Fixed values, independent of the process environment. `Config::new` is
/// the env-reading constructor; tests rely on `default()` being stable no
/// matter which variables happen to be exported.
impl Default for Config {
    fn default() -> Self {
        Self {
            create_firm_secret_code: create_random_secret(16),
            port: 5000,
            reminder_job_interval_secs: 60 * 15,
            near_due_window_days: 2,
            mail_send_timeout_secs: 30,
            mail_relay_url: None,
            mail_relay_key: None,
            premium_default_offsets: vec![-7, -3, -1, 0],
            standard_default_offsets: vec![-1, 0],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config_ignores_the_environment() {
        std::env::set_var("NEAR_DUE_WINDOW_DAYS", "0");
        std::env::set_var("PORT", "9");
        let config = Config::default();
        assert_eq!(config.near_due_window_days, 2);
        assert_eq!(config.port, 5000);
        std::env::remove_var("NEAR_DUE_WINDOW_DAYS");
        std::env::remove_var("PORT");
    }

    #[test]
    fn default_offsets_follow_plan_tier() {
        let config = Config::new();
        assert_eq!(
            config.default_offsets_for(PlanTier::Premium),
            vec![-7, -3, -1, 0]
        );
        assert_eq!(config.default_offsets_for(PlanTier::Standard), vec![-1, 0]);
    }
}
