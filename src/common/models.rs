/// Whether the dispatcher talks to the relay or only reports what it would send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    DryRun,
}

impl Mode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        match dry_run {
            true => Mode::DryRun,
            false => Mode::Live,
        }
    }
}

/// Outbound mail submission.
///
/// `from` and `recipients` form the SMTP envelope; `message` is the fully
/// serialised RFC 5322 message. Recipients missing from the headers (BCC)
/// only ever appear here.
pub trait Transport {
    fn send(&self, from: &str, recipients: &[String], message: &[u8]) -> super::Result<()>;
}
