use std::env;
use std::fmt;

pub const SENDER_EMAIL_VAR: &str = "SENDER_EMAIL";
pub const SENDER_PASSWORD_VAR: &str = "SENDER_PASSWORD";
pub const NOTIFY_EMAIL_VAR: &str = "NOTIFY_EMAIL";

/// Mail relay login plus the alert recipient, supplied through the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailCredentials {
    pub sender: String,
    pub password: String,
    pub recipient: String,
}

impl EmailCredentials {
    /// `None` when the sender or password is missing. Email is then disabled for the run.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let sender = non_empty(SENDER_EMAIL_VAR)?;
        let password = non_empty(SENDER_PASSWORD_VAR)?;
        let recipient = non_empty(NOTIFY_EMAIL_VAR).unwrap_or_else(|| sender.clone());

        Some(Self {
            sender,
            password,
            recipient,
        })
    }
}

// 避免密碼出現在日誌中
impl fmt::Debug for EmailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("sender", &self.sender)
            .field("password", &"***")
            .field("recipient", &self.recipient)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_credentials_disable_email() {
        assert!(EmailCredentials::from_lookup(lookup(&[])).is_none());
        assert!(EmailCredentials::from_lookup(lookup(&[("SENDER_EMAIL", "me@example.com")])).is_none());
        assert!(EmailCredentials::from_lookup(lookup(&[
            ("SENDER_EMAIL", "me@example.com"),
            ("SENDER_PASSWORD", "  "),
        ]))
        .is_none());
    }

    #[test]
    fn test_recipient_defaults_to_sender() {
        let creds = EmailCredentials::from_lookup(lookup(&[
            ("SENDER_EMAIL", "me@example.com"),
            ("SENDER_PASSWORD", "app-password"),
        ]))
        .unwrap();

        assert_eq!(creds.recipient, "me@example.com");
    }

    #[test]
    fn test_explicit_recipient_and_redacted_debug() {
        let creds = EmailCredentials::from_lookup(lookup(&[
            ("SENDER_EMAIL", "me@example.com"),
            ("SENDER_PASSWORD", "app-password"),
            ("NOTIFY_EMAIL", "family@example.com"),
        ]))
        .unwrap();

        assert_eq!(creds.recipient, "family@example.com");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("app-password"));
    }
}
