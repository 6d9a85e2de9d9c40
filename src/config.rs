use crate::common::{Mode, Result};
use crate::smtp::SmtpRelay;

pub const ENV_PREFIX: &str = "MASS_MAILER";

/// Runtime settings that are not part of a campaign, such as relay
/// credentials and TLS.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub smtp: crate::smtp::Config,
}

impl Config {
    /// Reads `MASS_MAILER_SMTP__PORT` style variables.
    #[cfg(feature = "cli")]
    pub fn populate_from_env() -> Result<Self> {
        Self::from_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    #[cfg(feature = "cli")]
    pub(crate) fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        use crate::common::SettingsSnafu;
        use snafu::ResultExt;

        config::Config::builder()
            .add_source(source)
            .build()
            .and_then(|settings| settings.try_deserialize())
            .boxed()
            .context(SettingsSnafu)
    }

    /// Builds the relay for a campaign's `SMTP` value.
    pub fn relay(&self, relay: (&str, Option<u16>)) -> Result<SmtpRelay> {
        let (host, port) = relay;
        SmtpRelay::new(host, port, self.smtp.clone())
    }

    /// Dry runs never connect, so no relay (or secret) is needed.
    pub fn relay_for_mode(
        &self,
        relay: (&str, Option<u16>),
        mode: Mode,
    ) -> Result<Option<SmtpRelay>> {
        match mode {
            Mode::DryRun => Ok(None),
            Mode::Live => self.relay(relay).map(Some),
        }
    }
}
