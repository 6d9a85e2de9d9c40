use std::path::PathBuf;

use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to read {}: {source}", path.display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("{} is not valid UTF-8: {source}", path.display()))]
    EncodingError {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Required key {key} is missing from the configuration"))]
    MissingRequiredKey { key: String },
    #[snafu(display(
        "{key} is not a valid address ({value}): {source}; quote display names containing commas"
    ))]
    InvalidAddress {
        key: String,
        value: String,
        source: lettre::address::AddressError,
    },
    #[snafu(display(
        "Unsupported template {}, expected a .txt or .html file",
        path.display()
    ))]
    UnsupportedTemplateKind { path: PathBuf },
    #[snafu(display("Malformed recipient on line {line_number}: {line:?}"))]
    MalformedRow { line_number: usize, line: String },
    #[snafu(display("{message}: {source}"))]
    ComposeError {
        message: String,
        source: lettre::error::Error,
    },
    #[snafu(display("{message}: {source}"))]
    TransportError {
        message: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[snafu(display("{prefix}: {message}"))]
    ConfigError { message: String, prefix: String },
    #[snafu(display("Invalid settings in environment: {source}"))]
    SettingsError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
