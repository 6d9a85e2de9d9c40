use std::path::Path;

use lettre::message::header::ContentType;

use crate::common::{Result, UnsupportedTemplateKindSnafu};

pub const PLACEHOLDER: &str = "{{FIRST_LASTNAME}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Plain,
    Html,
}

impl TemplateKind {
    /// `.txt` selects plain text, `.html` selects HTML.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("txt") => Ok(TemplateKind::Plain),
            Some(ext) if ext.eq_ignore_ascii_case("html") => Ok(TemplateKind::Html),
            _ => UnsupportedTemplateKindSnafu { path }.fail(),
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            TemplateKind::Plain => ContentType::TEXT_PLAIN,
            TemplateKind::Html => ContentType::TEXT_HTML,
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TemplateKind::Plain => "plain",
            TemplateKind::Html => "html",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub body: String,
    pub kind: TemplateKind,
}

/// A single row of the recipient list. Blank name fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

impl Recipient {
    pub fn new(first_name: Option<&str>, last_name: Option<&str>, email: &str) -> Self {
        Self {
            first_name: first_name.map(String::from),
            last_name: last_name.map(String::from),
            email: email.to_string(),
        }
    }
}
