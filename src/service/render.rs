use crate::campaign::{Config, Recipient, Template, PLACEHOLDER};

/// A template personalised for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub display_name: String,
    pub body: String,
}

/// The recipient's full name, or the configured fallback when no first
/// name was supplied.
pub fn display_name(recipient: &Recipient, config: &Config) -> String {
    match &recipient.first_name {
        Some(first) => format!(
            "{} {}",
            first,
            recipient.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string(),
        None => config.default_name().to_string(),
    }
}

/// Substitutes every placeholder with the display name. The name is
/// inserted verbatim, HTML templates included.
pub fn render(recipient: &Recipient, config: &Config, template: &Template) -> Rendered {
    let display_name = display_name(recipient, config);
    let body = template.body.replace(PLACEHOLDER, &display_name);
    Rendered { display_name, body }
}
