use snafu::OptionExt;
use uuid::Uuid;

use super::models::{DispatchResult, Letter};
use super::render::render;
use crate::campaign::{Config, Recipient, Template};
use crate::common::{ConfigSnafu, Mode, Result, Transport};

pub struct MassMailer {
    config: Config,
    template: Template,
    transport: Option<Box<dyn Transport>>,
}

impl MassMailer {
    pub fn new(config: Config, template: Template, transport: Box<dyn Transport>) -> Self {
        Self {
            config,
            template,
            transport: Some(transport),
        }
    }

    /// A mailer that can only dry-run. Live sends fail per recipient.
    pub fn without_transport(config: Config, template: Template) -> Self {
        Self {
            config,
            template,
            transport: None,
        }
    }

    /// Sends one personalised message per distinct address, in list order.
    ///
    /// Delivery failures are counted and logged, never propagated; every
    /// recipient is visited exactly once.
    pub fn dispatch(&self, recipients: &[Recipient], mode: Mode) -> DispatchResult {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("dispatch", %run_id, ?mode);
        let _entered = span.enter();

        let mut result = DispatchResult::new(recipients.len());

        for recipient in recipients {
            let email = recipient.email.as_str();

            // Marked before sending, so a failed address is not retried later in the list.
            if !result.mark_seen(email) {
                tracing::warn!(email, "Skip. Duplicate email address");
                result.skipped += 1;
                continue;
            }

            let rendered = render(recipient, &self.config, &self.template);
            let letter = Letter::new(&self.config, self.template.kind, recipient, rendered);

            match mode {
                Mode::DryRun => match letter.to_bytes() {
                    Ok(_) => {
                        tracing::info!(
                            from = letter.from,
                            recipients = ?letter.recipients,
                            body = ?letter.body,
                            "Test. Would send message",
                        );
                        result.simulated += 1;
                    }
                    Err(err) => {
                        tracing::warn!(email, error = %err, "Test. Message could not be composed");
                    }
                },
                Mode::Live => match self.deliver(&letter) {
                    Ok(()) => {
                        tracing::info!(email, "Sent. Message delivered");
                        result.sent += 1;
                    }
                    Err(err) => {
                        tracing::error!(email, error = %err, "Fail. Error when sending email");
                        result.errors += 1;
                    }
                },
            }
        }

        tracing::info!(
            sent = result.sent,
            simulated = result.simulated,
            errors = result.errors,
            skipped = result.skipped,
            total = result.total,
            "Done. {result}",
        );

        result
    }

    fn deliver(&self, letter: &Letter) -> Result<()> {
        let transport = self.transport.as_ref().context(ConfigSnafu {
            message: "No relay configured",
            prefix: "smtp",
        })?;
        let message = letter.to_bytes()?;
        transport.send(&letter.from, &letter.recipients, &message)
    }
}
