use std::collections::BTreeMap;
use std::path::Path;

use lettre::message::Mailbox;
use snafu::prelude::*;

use crate::common::{read_utf8, InvalidAddressSnafu, MissingRequiredKeySnafu, Result};

pub const KEY_SMTP: &str = "SMTP";
pub const KEY_FROM: &str = "FROM";
pub const KEY_SUBJECT: &str = "SUBJECT";
pub const KEY_REPLY_TO: &str = "REPLY-TO";
pub const KEY_BCC: &str = "BCC";
pub const KEY_FIRST_LASTNAME: &str = "FIRST_LASTNAME";

pub const DEFAULT_FIRST_LASTNAME: &str = "Sir or Madam";

const REQUIRED_KEYS: [&str; 3] = [KEY_SMTP, KEY_FROM, KEY_SUBJECT];

/// Campaign settings read from a `KEY=VALUE` file.
///
/// Keys are upper-cased on read. After a successful load `SMTP`, `FROM`,
/// `SUBJECT`, `REPLY-TO` and `FIRST_LASTNAME` are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    values: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::parse(&read_utf8(path)?)?;
        tracing::debug!(
            path = %path.display(),
            keys = config.values.len(),
            "Campaign configuration loaded"
        );
        Ok(config)
    }

    pub fn parse(source: &str) -> Result<Self> {
        let mut values = BTreeMap::new();

        // Only lines with exactly one '=' are assignments. Sections and
        // comments are dropped along with everything else.
        for line in source.lines() {
            let mut parts = line.trim().split('=');
            if let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) {
                values.insert(key.trim().to_uppercase(), value.trim().to_string());
            }
        }

        for key in REQUIRED_KEYS {
            ensure!(values.contains_key(key), MissingRequiredKeySnafu { key });
        }

        if values.get(KEY_BCC).is_some_and(|bcc| bcc.is_empty()) {
            values.remove(KEY_BCC);
        }
        if !values.contains_key(KEY_REPLY_TO) {
            let from = values[KEY_FROM].clone();
            values.insert(KEY_REPLY_TO.to_string(), from);
        }
        values
            .entry(KEY_FIRST_LASTNAME.to_string())
            .or_insert_with(|| DEFAULT_FIRST_LASTNAME.to_string());

        for key in [KEY_FROM, KEY_REPLY_TO, KEY_BCC] {
            if let Some(value) = values.get(key) {
                value
                    .parse::<Mailbox>()
                    .context(InvalidAddressSnafu { key, value })?;
            }
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_uppercase()).map(String::as_str)
    }

    fn required(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn smtp(&self) -> &str {
        self.required(KEY_SMTP)
    }

    /// The relay host and, when `SMTP` is written as `host:port`, its port.
    pub fn smtp_relay(&self) -> (&str, Option<u16>) {
        let smtp = self.smtp();
        match smtp.rsplit_once(':') {
            Some((host, port)) => match port.parse() {
                Ok(port) => (host, Some(port)),
                Err(_) => (smtp, None),
            },
            None => (smtp, None),
        }
    }

    pub fn from(&self) -> &str {
        self.required(KEY_FROM)
    }

    pub fn subject(&self) -> &str {
        self.required(KEY_SUBJECT)
    }

    pub fn reply_to(&self) -> &str {
        self.required(KEY_REPLY_TO)
    }

    pub fn bcc(&self) -> Option<&str> {
        self.get(KEY_BCC)
    }

    /// Display name used for recipients without a first name.
    pub fn default_name(&self) -> &str {
        self.required(KEY_FIRST_LASTNAME)
    }
}
