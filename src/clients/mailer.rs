use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment as MailAttachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::{debug, info};

use crate::{config::Config, models::message::OutboundMessage};

const SMTP_TIMEOUT_SECONDS: u64 = 20;

/// Outbound mail delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), Error>;

    /// Probes the transport without sending anything.
    async fn health_check(&self) -> Result<(), Error> {
        Ok(())
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Option<Mailbox>,
}

impl SmtpMailer {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let host = config.mail_server.as_str();

        let builder = if config.mail_use_ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| anyhow!("Failed to configure SMTP relay: {}", e))?
        } else if config.mail_use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| anyhow!("Failed to configure SMTP STARTTLS relay: {}", e))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };

        let mut builder = builder
            .port(config.mail_port)
            .timeout(Some(Duration::from_secs(SMTP_TIMEOUT_SECONDS)));

        if let (Some(username), Some(password)) = (&config.mail_username, &config.mail_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let sender = config
            .sender()
            .map(|address| {
                address
                    .parse::<Mailbox>()
                    .map_err(|e| anyhow!("Invalid sender address '{}': {}", address, e))
            })
            .transpose()?;

        info!(
            host = %config.mail_server,
            port = config.mail_port,
            tls = config.mail_use_tls,
            ssl = config.mail_use_ssl,
            "SMTP mailer initialized"
        );

        Ok(Self {
            transport: builder.build(),
            sender,
        })
    }

    fn build_message(&self, message: &OutboundMessage) -> Result<Message, Error> {
        let sender = self
            .sender
            .clone()
            .ok_or_else(|| anyhow!("Sender address not configured"))?;

        let recipient = message
            .recipient
            .parse::<Mailbox>()
            .map_err(|e| anyhow!("Invalid recipient address '{}': {}", message.recipient, e))?;

        let builder = Message::builder()
            .from(sender)
            .to(recipient)
            .subject(message.subject.clone());

        let email = match &message.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type)
                    .map_err(|e| anyhow!("Invalid attachment content type: {}", e))?;

                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(message.body.clone()))
                        .singlepart(
                            MailAttachment::new(attachment.filename.clone())
                                .body(attachment.data.clone(), content_type),
                        ),
                )
            }
            None => builder.body(message.body.clone()),
        }
        .map_err(|e| anyhow!("Failed to build email: {}", e))?;

        Ok(email)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), Error> {
        let email = self.build_message(message)?;

        debug!(
            recipient = %message.recipient,
            subject = %message.subject,
            "Sending email via SMTP"
        );

        self.transport.send(email).await?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        let connected = self.transport.test_connection().await?;

        if connected {
            Ok(())
        } else {
            Err(anyhow!("SMTP server did not accept the connection"))
        }
    }
}
