use std::time::Duration;

use lettre::address::{Address, Envelope};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport as _};
use snafu::prelude::*;

use super::{Config, TlsMode};
use crate::common::{
    secret_file_or_string, InvalidAddressSnafu, Result, Transport, TransportSnafu,
};

const TRANSPORT_NAME: &str = "SMTP";

/// Delivers through an SMTP relay, one connection per message.
pub struct SmtpRelay {
    host: String,
    transport: SmtpTransport,
}

impl SmtpRelay {
    /// `port` comes from the campaign's `SMTP=host:port` and beats the settings.
    pub fn new(host: &str, port: Option<u16>, config: Config) -> Result<Self> {
        let mut builder = match config.tls {
            TlsMode::None => SmtpTransport::builder_dangerous(host),
            TlsMode::Starttls => SmtpTransport::starttls_relay(host).boxed().context(
                TransportSnafu {
                    message: format!("Failed to set up STARTTLS for {host}"),
                },
            )?,
            TlsMode::Tls => SmtpTransport::relay(host).boxed().context(TransportSnafu {
                message: format!("Failed to set up TLS for {host}"),
            })?,
        };

        if let Some(port) = port.or(config.port) {
            builder = builder.port(port);
        }

        if let (Some(username), Some(password)) = (config.username, config.password) {
            let password = secret_file_or_string(password, "smtp.password")?;
            builder = builder.credentials(Credentials::new(username, password));
        }

        tracing::debug!(
            transport = TRANSPORT_NAME,
            host,
            tls = ?config.tls,
            "Relay configured",
        );

        Ok(Self {
            host: host.to_string(),
            transport: builder
                .timeout(Some(Duration::from_secs(config.timeout_secs)))
                .build(),
        })
    }
}

/// Envelope addresses drop any display name: `Name <a@x>` becomes `a@x`.
fn envelope_address(key: &str, value: &str) -> Result<Address> {
    Ok(value
        .parse::<Mailbox>()
        .context(InvalidAddressSnafu { key, value })?
        .email)
}

fn envelope(from: &str, recipients: &[String]) -> Result<Envelope> {
    let sender = envelope_address("MAIL FROM", from)?;
    let recipients = recipients
        .iter()
        .map(|rcpt| envelope_address("RCPT TO", rcpt))
        .collect::<Result<Vec<Address>>>()?;

    Envelope::new(Some(sender), recipients)
        .boxed()
        .context(TransportSnafu {
            message: "Invalid envelope",
        })
}

impl Transport for SmtpRelay {
    fn send(&self, from: &str, recipients: &[String], message: &[u8]) -> Result<()> {
        let envelope = envelope(from, recipients)?;

        tracing::debug!(
            transport = TRANSPORT_NAME,
            host = self.host,
            recipients = recipients.len(),
            bytes = message.len(),
            "Sending message"
        );

        self.transport
            .send_raw(&envelope, message)
            .boxed()
            .context(TransportSnafu {
                message: format!("Delivery via {} failed", self.host),
            })?;

        Ok(())
    }
}
