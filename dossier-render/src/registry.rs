//! Format registry
//!
//! Formats are registered and looked up by name.

use crate::error::RenderError;
use crate::format::Format;
use crate::ir::styled::StyledNode;
use std::collections::HashMap;

pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, RenderError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| RenderError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// All registered format names, sorted
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Find the format that writes files with `extension`
    pub fn for_extension(&self, extension: &str) -> Option<&dyn Format> {
        let mut names = self.list_formats();
        names.retain(|name| {
            self.formats[name]
                .file_extensions()
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(extension))
        });
        names.first().map(|name| self.formats[name].as_ref())
    }

    pub fn serialize(&self, node: &StyledNode, format: &str) -> Result<String, RenderError> {
        self.get(format)?.serialize(node)
    }

    /// Registry with the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::html::HtmlFormat::default());
        registry.register(crate::formats::html::FragmentFormat);
        registry.register(crate::formats::tree::TreeFormat);
        registry.register(crate::formats::treeviz::TreevizFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
