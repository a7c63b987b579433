use crate::config::Config;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;
use url::Url;

/// One outgoing notification mail
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub reply_to: Option<String>,
}

/// Abstracted mail sending capability. The reminder job only cares that a
/// send either completes or errors, delivery receipts are not consumed.
#[async_trait::async_trait]
pub trait IMailer: Send + Sync {
    async fn send(&self, mail: Mail) -> anyhow::Result<()>;
}

/// Posts mails as json to an HTTP mail relay
pub struct RelayMailer {
    client: reqwest::Client,
    url: Url,
    key: Option<String>,
}

impl RelayMailer {
    pub fn new(url: Url, key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            key,
        }
    }
}

#[async_trait::async_trait]
impl IMailer for RelayMailer {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        let mut req = self.client.post(self.url.clone()).json(&mail);
        if let Some(key) = &self.key {
            req = req.header("ledgerdesk-relay-key", key);
        }
        let res = req.send().await?;
        res.error_for_status()?;
        Ok(())
    }
}

/// Fallback mailer when no relay is configured, only logs the mail
pub struct LogMailer {}

#[async_trait::async_trait]
impl IMailer for LogMailer {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        info!(
            "No mail relay configured. Would have sent mail to {} with subject: {}",
            mail.to, mail.subject
        );
        Ok(())
    }
}

/// Mailer that records sent mails, for tests. Can be toggled to fail
/// every send to exercise the error paths.
pub struct InMemoryMailer {
    sent: Mutex<Vec<Mail>>,
    failing: AtomicBool,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMailer for InMemoryMailer {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("Mail relay unreachable");
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

pub fn setup_mailer(config: &Config) -> Arc<dyn IMailer> {
    match &config.mail_relay_url {
        Some(url) => Arc::new(RelayMailer::new(
            url.clone(),
            config.mail_relay_key.clone(),
        )),
        None => Arc::new(LogMailer {}),
    }
}
