use std::path::Path;

use snafu::ResultExt;

use super::{ConfigSnafu, EncodingSnafu, ReadSnafu, Result};

/// If the value begins with an '@', read the secret from the following file
/// path, otherwise returns the value.
///
/// prefix is used to provide context in case of an error.
pub(crate) fn secret_file_or_string(value: String, prefix: &str) -> Result<String> {
    Ok(match value.strip_prefix('@') {
        Some(secret_file) => std::fs::read_to_string(secret_file)
            .map_err(|err| {
                ConfigSnafu {
                    message: format!("Failed to read secret from {secret_file}: {err}"),
                    prefix,
                }
                .build()
            })?
            .trim()
            .into(),
        None => value,
    })
}

/// Reads a whole input file, which must be UTF-8 text.
pub fn read_utf8(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).context(ReadSnafu { path })?;
    String::from_utf8(bytes).context(EncodingSnafu { path })
}
