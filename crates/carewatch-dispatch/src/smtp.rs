use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};

use crate::channels::{BoxFuture, Mailer};
use crate::email::EmailReport;
use crate::error::DispatchError;

/// Mail submission settings. The password is never logged.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub from: String,
    /// The fixed clinical reviewer every report is addressed to.
    pub reviewer: String,
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DispatchError> {
    address.parse().map_err(|e: lettre::address::AddressError| DispatchError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Sends reports over authenticated SMTP submission (STARTTLS).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    reviewer: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, DispatchError> {
        let from = parse_mailbox(&settings.from)?;
        let reviewer = parse_mailbox(&settings.reviewer)?;

        let credentials = Credentials::new(
            settings.username.clone(),
            settings.password.expose_secret().to_string(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| DispatchError::Email(e.to_string()))?
            .port(settings.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from,
            reviewer,
        })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, report: EmailReport) -> BoxFuture<'_, Result<(), DispatchError>> {
        Box::pin(async move {
            let message = Message::builder()
                .from(self.from.clone())
                .to(self.reviewer.clone())
                .subject(report.subject)
                .header(ContentType::TEXT_HTML)
                .body(report.html)
                .map_err(|e| DispatchError::Email(e.to_string()))?;

            self.transport
                .send(message)
                .await
                .map_err(|e| DispatchError::Email(e.to_string()))?;
            Ok(())
        })
    }
}

/// Stand-in used when no SMTP settings are present. Every send fails, so
/// each skipped email still shows up in the logs as a dispatch failure.
pub struct UnconfiguredMailer;

impl Mailer for UnconfiguredMailer {
    fn send(&self, _report: EmailReport) -> BoxFuture<'_, Result<(), DispatchError>> {
        Box::pin(async { Err(DispatchError::NotConfigured("email transport")) })
    }
}
