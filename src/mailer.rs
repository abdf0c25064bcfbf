use anyhow::Context;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use log::{debug, error, info, warn};

use crate::config::EmailConfig;

/// Result of a notification attempt.
///
/// Only informational, nothing is ever returned to the search process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Disabled,
    MissingCredentials,
    Failed(String),
}

/// Something able to submit a built message using the given settings
pub trait MailTransport {
    fn deliver(&self, config: &EmailConfig, message: &Message) -> anyhow::Result<()>;
}

/// Submits over SMTP, upgrading the plain connection with STARTTLS before authenticating
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpMailer;

impl MailTransport for SmtpMailer {
    fn deliver(&self, config: &EmailConfig, message: &Message) -> anyhow::Result<()> {
        debug!(
            "Connecting to {}:{} as {}",
            config.smtp_server, config.smtp_port, config.username
        );
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = SmtpTransport::starttls_relay(&config.smtp_server)
            .with_context(|| format!("Failed to set up STARTTLS relay to {}", config.smtp_server))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();
        mailer
            .send(message)
            .with_context(|| format!("Failed to submit via {}", config.smtp_server))?;
        Ok(())
    }
}

/// Sends a plaintext email to all configured recipients.
///
/// Never fails from the caller's point of view, every problem is logged and
/// reported through the returned [`SendOutcome`].
pub fn send_email(
    subject: &str,
    body: &str,
    config: &EmailConfig,
    transport: &impl MailTransport,
) -> SendOutcome {
    if !config.enabled {
        info!("Email notifications disabled");
        return SendOutcome::Disabled;
    }

    if config.username.is_empty() || config.password.is_empty() {
        warn!("Email credentials not configured");
        return SendOutcome::MissingCredentials;
    }

    match build_message(subject, body, config)
        .and_then(|message| transport.deliver(config, &message))
    {
        Ok(()) => {
            info!("[+] Email sent: {subject}");
            SendOutcome::Sent
        }
        Err(e) => {
            error!("[-] Email failed: {e:#}");
            SendOutcome::Failed(format!("{e:#}"))
        }
    }
}

fn build_message(subject: &str, body: &str, config: &EmailConfig) -> anyhow::Result<Message> {
    let from: Mailbox = config
        .username
        .parse()
        .with_context(|| format!("Invalid sender address {:?}", config.username))?;
    let mut builder = Message::builder()
        .from(from)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN);
    for recipient in &config.recipients {
        let to: Mailbox = recipient
            .parse()
            .with_context(|| format!("Invalid recipient address {recipient:?}"))?;
        builder = builder.to(to);
    }
    builder
        .body(body.to_string())
        .context("Failed to build email message")
}
