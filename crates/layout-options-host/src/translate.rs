//! Translation collaborator.

use std::collections::HashMap;

use crate::html::escape;

/// Translates interface strings.
pub trait Translator {
    /// Translate a source string.
    fn translate(&self, source: &str) -> String;

    /// Translate and substitute `@name` placeholders with escaped values.
    fn format(&self, source: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.translate(source);
        for (placeholder, value) in args {
            text = text.replace(placeholder, &escape(value));
        }
        text
    }
}

/// Returns every string untranslated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate(&self, source: &str) -> String {
        source.to_string()
    }
}

/// Looks strings up in an in-memory catalog, falling back to the source.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    entries: HashMap<String, String>,
}

impl CatalogTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, source: impl Into<String>, translation: impl Into<String>) -> Self {
        self.entries.insert(source.into(), translation.into());
        self
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, source: &str) -> String {
        self.entries
            .get(source)
            .cloned()
            .unwrap_or_else(|| source.to_string())
    }
}
