use crate::config::credentials::EmailCredentials;
use crate::config::settings::{EmailSettings, SmtpSecurity};
use crate::domain::model::{Delivery, Notification};
use crate::domain::ports::Notifier;
use crate::utils::error::Result;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);
const CONSOLE_DETAILS_MAX_CHARS: usize = 200;

/// Sends the alert through an authenticated SMTP relay. One attempt per run.
pub struct SmtpNotifier {
    credentials: EmailCredentials,
    settings: EmailSettings,
}

impl SmtpNotifier {
    pub fn new(credentials: EmailCredentials, settings: EmailSettings) -> Self {
        Self {
            credentials,
            settings,
        }
    }

    pub fn build_message(&self, notification: &Notification) -> Result<Message> {
        let from: Mailbox = self.credentials.sender.parse()?;
        let to: Mailbox = self.credentials.recipient.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(notification.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                notification.text_body.clone(),
                notification.html_body.clone(),
            ))?;
        Ok(message)
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let host = self.settings.smtp_host.as_str();
        let builder = match self.settings.security {
            SmtpSecurity::Smtps => AsyncSmtpTransport::<Tokio1Executor>::relay(host)?,
            SmtpSecurity::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?,
        };

        Ok(builder
            .port(self.settings.effective_port())
            .credentials(Credentials::new(
                self.credentials.sender.clone(),
                self.credentials.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, notification: &Notification) -> Result<Delivery> {
        let message = self.build_message(notification)?;
        let transport = self.transport()?;

        tracing::debug!(
            "Sending alert via {}:{} ({:?})",
            self.settings.smtp_host,
            self.settings.effective_port(),
            self.settings.security
        );
        transport.send(message).await?;

        Ok(Delivery::Emailed {
            recipient: self.credentials.recipient.clone(),
        })
    }
}

/// Fallback when no mail credentials are configured: the results go to stdout instead.
#[derive(Debug, Default, Clone)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, notification: &Notification) -> Result<Delivery> {
        tracing::warn!("Email credentials not configured. Printing results instead");

        for result in &notification.results {
            println!("\nTICKETS AVAILABLE!");
            println!("   Route: {}", result.query.route);
            println!("   Date: {}", result.query.date);
            println!("   URL: {}", result.query.url);
            if let Some(details) = result.details() {
                let short: String = details.chars().take(CONSOLE_DETAILS_MAX_CHARS).collect();
                println!("   Details: {}", short);
            }
        }

        Ok(Delivery::Printed)
    }
}

/// Picks the SMTP notifier when credentials are present, the console one otherwise.
pub fn notifier_for(credentials: Option<EmailCredentials>, settings: &EmailSettings) -> Box<dyn Notifier> {
    match credentials {
        Some(credentials) => {
            tracing::info!("📧 Alerts will be emailed to {}", credentials.recipient);
            Box::new(SmtpNotifier::new(credentials, settings.clone()))
        }
        None => {
            tracing::warn!("SENDER_EMAIL / SENDER_PASSWORD not set, email alerts disabled");
            Box::new(ConsoleNotifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Availability, AvailabilityResult, RouteQuery};
    use crate::utils::error::MonitorError;
    use chrono::NaiveDate;

    fn notification() -> Notification {
        let results = vec![AvailabilityResult {
            query: RouteQuery {
                route: "Riyadh to Qurayyat".to_string(),
                origin: "RIY".to_string(),
                destination: "QUR".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
                url: "https://tickets.sar.com.sa/select-trip?DepartureDateString=2025-03-04".to_string(),
            },
            availability: Availability::Available {
                count: Some(1),
                details: Some("08:00 Riyadh".to_string()),
            },
        }];
        Notification::from_results(&results).unwrap()
    }

    fn credentials(sender: &str) -> EmailCredentials {
        EmailCredentials {
            sender: sender.to_string(),
            password: "app-password".to_string(),
            recipient: "family@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_message_headers() {
        let notifier = SmtpNotifier::new(credentials("me@example.com"), EmailSettings::default());

        let message = notifier.build_message(&notification()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: me@example.com"));
        assert!(raw.contains("To: family@example.com"));
        assert!(raw.contains("Subject: SAR Tickets Available! (1 trips found)"));
        assert!(raw.contains("multipart/alternative"));
    }

    #[test]
    fn test_invalid_sender_is_send_error() {
        let notifier = SmtpNotifier::new(credentials("not-an-address"), EmailSettings::default());

        let result = notifier.build_message(&notification());
        assert!(matches!(result, Err(MonitorError::SendError { .. })));
    }

    #[tokio::test]
    async fn test_console_notifier_prints() {
        let delivery = ConsoleNotifier.notify(&notification()).await.unwrap();
        assert_eq!(delivery, Delivery::Printed);
    }

    #[tokio::test]
    async fn test_missing_credentials_select_console() {
        let notifier = notifier_for(None, &EmailSettings::default());
        let delivery = notifier.notify(&notification()).await.unwrap();
        assert_eq!(delivery, Delivery::Printed);
    }
}
