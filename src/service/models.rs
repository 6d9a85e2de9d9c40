use std::collections::HashSet;

use lettre::message::Mailbox;
use lettre::Message;
use snafu::ResultExt;

use super::render::Rendered;
use crate::campaign::{Config, Recipient, TemplateKind};
use crate::common::{ComposeSnafu, InvalidAddressSnafu, Result};

/// A personalised message together with its SMTP envelope.
#[derive(Debug, Clone)]
pub struct Letter {
    pub from: String,
    pub reply_to: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub kind: TemplateKind,
    /// RCPT TO addresses: the recipient, then BCC if configured.
    pub recipients: Vec<String>,
}

impl Letter {
    pub fn new(config: &Config, kind: TemplateKind, recipient: &Recipient, rendered: Rendered) -> Self {
        let mut recipients = vec![recipient.email.clone()];
        if let Some(bcc) = config.bcc() {
            recipients.push(bcc.to_string());
        }

        Self {
            from: config.from().to_string(),
            reply_to: config.reply_to().to_string(),
            to: recipient.email.clone(),
            subject: config.subject().to_string(),
            body: rendered.body,
            kind,
            recipients,
        }
    }

    /// Serialises the message. BCC never becomes a header.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mailbox = |key: &str, value: &str| -> Result<Mailbox> {
            value
                .parse::<Mailbox>()
                .context(InvalidAddressSnafu { key, value })
        };

        let message = Message::builder()
            .from(mailbox("From", &self.from)?)
            .reply_to(mailbox("Reply-To", &self.reply_to)?)
            .to(mailbox("To", &self.to)?)
            .subject(self.subject.as_str())
            .header(self.kind.content_type())
            .body(self.body.clone())
            .context(ComposeSnafu {
                message: format!("Failed to compose message for {}", self.to),
            })?;

        Ok(message.formatted())
    }
}

/// Counters for a single pass over the recipient list.
#[derive(Debug, Clone, Default)]
pub struct DispatchResult {
    pub sent: usize,
    pub simulated: usize,
    pub errors: usize,
    pub skipped: usize,
    /// Length of the recipient list, duplicates included.
    pub total: usize,
    seen: HashSet<String>,
}

impl DispatchResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Returns false when the address was already handled in this pass.
    pub(super) fn mark_seen(&mut self, email: &str) -> bool {
        self.seen.insert(email.to_string())
    }
}

impl std::fmt::Display for DispatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} errors, {} skipped emails when trying to send {} messages",
            self.errors, self.skipped, self.total
        )
    }
}
