use std::path::Path;

use snafu::ensure;

use super::models::Recipient;
use crate::common::{read_utf8, MalformedRowSnafu, Result};

pub fn load_recipients(path: &Path) -> Result<Vec<Recipient>> {
    let recipients = parse_recipients(&read_utf8(path)?)?;
    tracing::debug!(
        path = %path.display(),
        recipients = recipients.len(),
        "Recipients loaded"
    );
    Ok(recipients)
}

/// Parses `firstname,lastname,email` rows, keeping input order.
///
/// Any malformed row fails the whole list.
pub fn parse_recipients(source: &str) -> Result<Vec<Recipient>> {
    let mut recipients = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        ensure!(
            fields.len() == 3 && fields[2].contains('@'),
            MalformedRowSnafu {
                line_number: index + 1,
                line,
            }
        );

        recipients.push(Recipient::new(
            non_blank(fields[0]),
            non_blank(fields[1]),
            fields[2].trim(),
        ));
    }

    Ok(recipients)
}

fn non_blank(field: &str) -> Option<&str> {
    Some(field.trim()).filter(|f| !f.is_empty())
}
