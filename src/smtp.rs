//! SMTP delivery backend built on lettre
//!
//! Messages are sent through a STARTTLS relay authenticated with the
//! credentials from the run configuration. The body is transmitted as HTML;
//! when an attachment is configured the message becomes multipart/mixed with
//! the file bytes read fresh for every send.

use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::debug;

use crate::{
    config::Config,
    mailer::{Mailer, MailerError},
    types::DispatchJob,
};

/// Production [`Mailer`] backed by an asynchronous SMTP transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a STARTTLS transport from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`MailerError`] if the sender address cannot be parsed or
    /// the relay parameters are rejected.
    pub fn from_config(config: &Config) -> Result<Self, MailerError> {
        let from = sender_mailbox(config)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|err| MailerError::Transport(err.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }

    async fn message_for(&self, job: &DispatchJob) -> Result<Message, MailerError> {
        let to: Address = job
            .recipient
            .as_str()
            .parse()
            .map_err(|err: lettre::address::AddressError| MailerError::Address(err.to_string()))?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(None, to))
            .subject(job.message.subject.as_str());

        for cc in &job.message.cc {
            let mailbox: Mailbox = cc
                .parse()
                .map_err(|err: lettre::address::AddressError| MailerError::Address(err.to_string()))?;
            builder = builder.cc(mailbox);
        }

        let body = SinglePart::html(job.message.content.clone());

        let message = match &job.message.attachment {
            Some(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|source| MailerError::Attachment {
                        path: path.clone(),
                        source,
                    })?;
                let filename = path
                    .file_name()
                    .map_or_else(|| "attachment".to_owned(), |name| name.to_string_lossy().into_owned());
                let content_type = ContentType::parse("application/octet-stream")
                    .map_err(|err| MailerError::Message(err.to_string()))?;

                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(body)
                        .singlepart(Attachment::new(filename).body(bytes, content_type)),
                )
            }
            None => builder.singlepart(body),
        }
        .map_err(|err| MailerError::Message(err.to_string()))?;

        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, job: &DispatchJob) -> Result<(), MailerError> {
        let message = self.message_for(job).await?;

        self.transport
            .send(message)
            .await
            .map_err(|err| MailerError::Transport(err.to_string()))?;

        debug!(recipient = %job.recipient, "message handed to relay");
        Ok(())
    }
}

fn sender_mailbox(config: &Config) -> Result<Mailbox, MailerError> {
    let address: Address = config
        .from
        .parse()
        .map_err(|err: lettre::address::AddressError| MailerError::Address(err.to_string()))?;

    Ok(Mailbox::new(config.alias.clone(), address))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::MessageSpec;

    fn test_config() -> Config {
        Config {
            from: "sender@example.com".to_owned(),
            alias: Some("Newsletter".to_owned()),
            smtp_host: "smtp.example.com".to_owned(),
            smtp_port: 587,
            username: "sender".to_owned(),
            password: "hunter2".to_owned(),
            batch_delay_ms: 0,
            batch_size: 0,
            pool_size: 1,
            log_enabled: false,
        }
    }

    fn job_for(recipient: &str, cc: Vec<String>) -> DispatchJob {
        DispatchJob {
            recipient: recipient.parse().unwrap(),
            message: Arc::new(MessageSpec {
                subject: "Hello".to_owned(),
                content: "<p>Hi there</p>".to_owned(),
                cc,
                attachment: None,
            }),
        }
    }

    #[test]
    fn sender_mailbox_carries_alias() {
        let mailbox = sender_mailbox(&test_config()).unwrap();
        assert_eq!(mailbox.to_string(), "Newsletter <sender@example.com>");
    }

    #[tokio::test]
    async fn builds_html_message_with_cc() {
        let mailer = SmtpMailer::from_config(&test_config()).unwrap();
        let job = job_for("user@example.com", vec!["copy@example.com".to_owned()]);

        let message = mailer.message_for(&job).await.unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("To: user@example.com"));
        assert!(rendered.contains("Cc: copy@example.com"));
        assert!(rendered.contains("Subject: Hello"));
    }

    #[tokio::test]
    async fn rejects_addresses_the_transport_cannot_express() {
        let mailer = SmtpMailer::from_config(&test_config()).unwrap();
        // Passes the permissive list validation but not the transport's
        let job = job_for("user name@example.com", Vec::new());

        let err = mailer.message_for(&job).await.unwrap_err();
        assert!(matches!(err, MailerError::Address(_)));
    }

    #[tokio::test]
    async fn missing_attachment_file_is_reported() {
        let mailer = SmtpMailer::from_config(&test_config()).unwrap();
        let job = DispatchJob {
            recipient: "user@example.com".parse().unwrap(),
            message: Arc::new(MessageSpec {
                subject: "Hello".to_owned(),
                content: "<p>Hi</p>".to_owned(),
                cc: Vec::new(),
                attachment: Some("/does/not/exist.pdf".into()),
            }),
        };

        let err = mailer.message_for(&job).await.unwrap_err();
        assert!(matches!(err, MailerError::Attachment { .. }));
    }
}
