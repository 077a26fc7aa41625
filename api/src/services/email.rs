//! Outgoing mail for event reminders and PD letters.
//!
//! All sends go through a single SMTP client configured from the
//! environment. Non-production deployments set `EMAIL_DEBUG_OVERRIDE` to
//! divert every message to one inbox; the override is applied in
//! [`EmailService::resolve_recipients`] so no flow can bypass it.

use lettre::{
    AsyncTransport, Tokio1Executor,
    message::{Message, MultiPart, SinglePart, header},
    transport::smtp::{AsyncSmtpTransport, authentication::Credentials},
};
use once_cell::sync::Lazy;
use util::config;

/// Global SMTP client instance, initialized lazily from configuration.
static SMTP_CLIENT: Lazy<AsyncSmtpTransport<Tokio1Executor>> = Lazy::new(|| {
    let host = config::smtp_host();
    let username = config::smtp_username();
    let password = config::smtp_password();

    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
        .expect("Failed to create SMTP transport")
        .port(config::smtp_port())
        .credentials(Credentials::new(username, password))
        .build()
});

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("no recipients to send to")]
    NoRecipients,
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp send failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Service for handling email-related operations.
pub struct EmailService;

impl EmailService {
    /// Applies the environment-level debug override: when set, the whole
    /// recipient list collapses to that single address.
    pub fn resolve_recipients(to: Vec<String>) -> Vec<String> {
        match config::email_debug_override() {
            Some(address) => vec![address],
            None => to,
        }
    }

    /// Sends a multipart (plain + HTML) message to the resolved recipient
    /// list. The HTML body is wrapped in the standard email shell.
    pub async fn send_html_mail(
        subject: &str,
        text_body: &str,
        html_body: &str,
        to: Vec<String>,
    ) -> Result<(), EmailError> {
        let recipients = Self::resolve_recipients(to);
        if recipients.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        let from = format!(
            "{} <{}>",
            config::email_from_name(),
            config::email_from_address()
        );

        let mut builder = Message::builder().from(from.parse()?).subject(subject);
        for recipient in &recipients {
            builder = builder.to(recipient.parse()?);
        }

        let email = builder.multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_PLAIN)
                        .body(text_body.to_string()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_HTML)
                        .body(Self::wrap_in_shell(html_body)),
                ),
        )?;

        SMTP_CLIENT.send(email).await?;
        Ok(())
    }

    /// Fixed HTML shell every outgoing message body is embedded in.
    pub fn wrap_in_shell(body_html: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    </style>
</head>
<body>
    <div class="container">
    {}
    </div>
</body>
</html>"#,
            body_html
        )
    }
}

#[cfg(test)]
mod tests {
    use super::EmailService;
    use serial_test::serial;
    use util::config::AppConfig;

    #[test]
    #[serial]
    fn override_collapses_recipient_list() {
        AppConfig::set_email_debug_override("debug@example.com");
        let resolved = EmailService::resolve_recipients(vec![
            "a@example.com".to_string(),
            "b@example.com".to_string(),
        ]);
        assert_eq!(resolved, vec!["debug@example.com".to_string()]);
        AppConfig::set_email_debug_override("");
    }

    #[test]
    #[serial]
    fn recipients_pass_through_without_override() {
        AppConfig::set_email_debug_override("");
        let to = vec!["a@example.com".to_string(), "b@example.com".to_string()];
        assert_eq!(EmailService::resolve_recipients(to.clone()), to);
    }

    #[test]
    fn shell_embeds_body() {
        let html = EmailService::wrap_in_shell("<p>Hello</p>");
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
