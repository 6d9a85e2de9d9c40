use std::path::Path;

use super::models::{Template, TemplateKind, PLACEHOLDER};
use crate::common::{read_utf8, Result};

impl Template {
    /// Loads a template, taking its kind from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let kind = TemplateKind::from_path(path)?;
        let template = Self::new(read_utf8(path)?, kind);

        tracing::debug!(
            path = %path.display(),
            kind = %template.kind,
            placeholders = template.placeholder_count(),
            "Template loaded"
        );
        Ok(template)
    }

    pub fn new(body: String, kind: TemplateKind) -> Self {
        Self { body, kind }
    }

    pub fn placeholder_count(&self) -> usize {
        self.body.matches(PLACEHOLDER).count()
    }
}
