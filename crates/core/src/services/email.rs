//! Outbound email notifications over SMTP.
//!
//! The service is a no-op when SMTP is not configured; callers treat every
//! send as best effort.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use sampark_common::{config::SmtpConfig, AppError, AppResult};
use tracing::info;

/// Email notification service.
#[derive(Clone)]
pub struct EmailService {
    config: Option<SmtpConfig>,
    public_url: String,
}

impl EmailService {
    /// Create a new email service.
    #[must_use]
    pub const fn new(config: Option<SmtpConfig>, public_url: String) -> Self {
        Self { config, public_url }
    }

    /// Check if email sending is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Tell an applicant their registration was approved.
    pub async fn send_approval_notice(&self, to: &str, name: &str) -> AppResult<()> {
        let body = format!(
            "Hello {name},\n\n\
             Your registration has been approved. You can now sign in at {}.\n\n\
             Thank you for joining the campaign.",
            self.public_url
        );
        self.send(to, "Your registration was approved", &body).await
    }

    /// Tell an applicant their registration was rejected.
    pub async fn send_rejection_notice(&self, to: &str, name: &str) -> AppResult<()> {
        let body = format!(
            "Hello {name},\n\n\
             We are sorry, but your registration request was not approved.\n\
             You can reply to this email if you believe this is a mistake."
        );
        self.send(to, "Your registration request", &body).await
    }

    /// Tell the configured admin address a new request is waiting.
    pub async fn notify_admin_new_request(&self, kind: &str, applicant: &str) -> AppResult<()> {
        let Some(config) = &self.config else {
            return Ok(());
        };
        let admin = config.admin_address.clone();

        let body = format!(
            "A new {kind} registration request from {applicant} is waiting for review.\n\n\
             Review it at {}/admin/requests.",
            self.public_url
        );
        self.send(&admin, "New registration request", &body).await
    }

    /// Send a plain-text email.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let Some(config) = &self.config else {
            // Not configured; silently succeed so callers need no special case.
            return Ok(());
        };

        let message = Message::builder()
            .from(
                config
                    .from_address
                    .parse()
                    .map_err(|e| AppError::Config(format!("bad from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::BadRequest(format!("bad recipient address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Internal(format!("build email: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::ExternalService(format!("SMTP relay: {e}")))?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let transport = builder.build();
        transport
            .send(message)
            .await
            .map_err(|e| AppError::ExternalService(format!("SMTP send: {e}")))?;

        info!(to, subject, "Sent email notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_without_config_is_noop() {
        let service = EmailService::new(None, "http://localhost:3000".to_string());

        assert!(!service.is_enabled());
        service
            .send("someone@example.org", "subject", "body")
            .await
            .unwrap();
    }
}
