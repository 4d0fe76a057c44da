//! # Email Delivery
//!
//! Outbound mail for the confirmation task. Senders sit behind a trait so
//! the worker and the tests can swap in a mock.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::errors::{TaskError, TaskResult};

/// SMTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// SMTP server host
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP username; empty means unauthenticated (local dev server)
    pub smtp_user: String,
    /// SMTP password
    pub smtp_password: String,
    /// From address
    pub from_email: String,
    /// From display name
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@confero.local".to_string(),
            from_name: "Confero".to_string(),
        }
    }
}

/// An outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailMessage {
    /// Confirmation sent to an organizer after creating a conference
    ConferenceCreated {
        to: String,
        conference_info: String,
    },
}

impl EmailMessage {
    fn render(&self) -> (String, String, String) {
        match self {
            EmailMessage::ConferenceCreated {
                to,
                conference_info,
            } => (
                to.clone(),
                "You created a new Conference!".to_string(),
                format!(
                    "Hi, you have created a following conference:\r\n\r\n{}",
                    conference_info
                ),
            ),
        }
    }
}

/// Abstraction over outbound mail
pub trait EmailSender: Send + Sync {
    fn send(&self, message: EmailMessage) -> TaskResult<()>;
}

/// Records messages instead of sending them; for tests and queue-less runs
#[derive(Debug, Default)]
pub struct MockEmailSender {
    sent: RwLock<Vec<EmailMessage>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages recorded so far
    pub fn sent_count(&self) -> usize {
        self.sent.read().map(|sent| sent.len()).unwrap_or(0)
    }

    /// Copy of the recorded messages
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .read()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl EmailSender for MockEmailSender {
    fn send(&self, message: EmailMessage) -> TaskResult<()> {
        if let Ok(mut sent) = self.sent.write() {
            sent.push(message);
        }
        Ok(())
    }
}

/// Sends mail over SMTP via lettre
pub struct SmtpEmailSender {
    config: EmailConfig,
}

impl SmtpEmailSender {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

impl EmailSender for SmtpEmailSender {
    fn send(&self, message: EmailMessage) -> TaskResult<()> {
        use lettre::message::header::ContentType;
        use lettre::transport::smtp::authentication::Credentials;
        use lettre::{Message, SmtpTransport, Transport};

        let (to, subject, body) = message.render();

        let email = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_email)
                    .parse()
                    .map_err(|e| TaskError::Email(format!("invalid from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| TaskError::Email(format!("invalid to address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| TaskError::Email(format!("failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_user.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let credentials = Credentials::new(
                self.config.smtp_user.clone(),
                self.config.smtp_password.clone(),
            );
            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| TaskError::Email(format!("SMTP relay error: {}", e)))?
                .credentials(credentials)
                .port(self.config.smtp_port)
                .build()
        };

        mailer
            .send(&email)
            .map_err(|e| TaskError::Email(format!("failed to send email: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_messages() {
        let sender = MockEmailSender::new();
        sender
            .send(EmailMessage::ConferenceCreated {
                to: "test1@test.com".into(),
                conference_info: "{\"name\":\"room #1\"}".into(),
            })
            .unwrap();
        assert_eq!(sender.sent_count(), 1);
        let EmailMessage::ConferenceCreated { to, .. } = &sender.sent()[0];
        assert_eq!(to, "test1@test.com");
    }

    #[test]
    fn test_confirmation_render() {
        let message = EmailMessage::ConferenceCreated {
            to: "test1@test.com".into(),
            conference_info: "room #1".into(),
        };
        let (to, subject, body) = message.render();
        assert_eq!(to, "test1@test.com");
        assert_eq!(subject, "You created a new Conference!");
        assert!(body.contains("room #1"));
    }
}
