use crate::shared::entity::{Entity, ID};
use ledgerdesk_utils::create_random_secret;

const API_KEY_LEN: usize = 30;

/// A `Firm` acts as a namespace for all other resources and lets multiple
/// accountancy practices use the same instance of this server without
/// interfering with each other.
#[derive(Debug, Clone)]
pub struct Firm {
    pub id: ID,
    pub name: String,
    pub secret_api_key: String,
    pub settings: FirmSettings,
}

#[derive(Debug, Clone, Default)]
pub struct FirmSettings {
    /// Reply-to address stamped on outgoing reminder mails, when set
    pub reply_to_email: Option<String>,
}

impl FirmSettings {
    pub fn set_reply_to_email(&mut self, email: Option<String>) -> bool {
        match email {
            Some(email) => {
                // Very coarse sanity check, the mail relay does the real validation
                if !email.contains('@') || email.trim().len() < 3 {
                    return false;
                }
                self.reply_to_email = Some(email);
            }
            None => {
                self.reply_to_email = None;
            }
        }
        true
    }
}

impl Firm {
    pub fn new(name: &str) -> Self {
        Self {
            id: Default::default(),
            name: name.to_string(),
            secret_api_key: Self::generate_secret_api_key(),
            settings: Default::default(),
        }
    }

    pub fn generate_secret_api_key() -> String {
        let rand_secret = create_random_secret(API_KEY_LEN);
        format!("sk_{}", rand_secret)
    }
}

impl Entity for Firm {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Default for Firm {
    fn default() -> Self {
        Self::new("My firm")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_creates_firm_with_api_key() {
        let firm = Firm::new("Acme Accountants");
        assert!(firm.secret_api_key.starts_with("sk_"));
        assert!(firm.secret_api_key.len() > API_KEY_LEN);
    }

    #[test]
    fn it_rejects_invalid_reply_to() {
        let mut settings = FirmSettings::default();
        assert!(!settings.set_reply_to_email(Some("invalid".into())));
        assert!(settings.reply_to_email.is_none());
        assert!(settings.set_reply_to_email(Some("post@acme.no".into())));
        assert_eq!(settings.reply_to_email, Some("post@acme.no".into()));
        assert!(settings.set_reply_to_email(None));
        assert!(settings.reply_to_email.is_none());
    }
}
