#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    #[default]
    None,
    Starttls,
    Tls,
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Config {
    pub port: Option<u16>,

    #[serde(default)]
    pub tls: TlsMode,

    pub username: Option<String>,

    /// Prefix with '@' to read the password from a file.
    pub password: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: None,
            tls: TlsMode::None,
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
