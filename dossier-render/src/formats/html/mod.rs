//! HTML output
//!
//! Two flavours share one serializer:
//!
//! | Format     | Output                                                    |
//! |------------|-----------------------------------------------------------|
//! | `html`     | Standalone page: doctype, `<head>` with embedded CSS, body |
//! | `fragment` | Just the tree's markup, for embedding in another page     |
//!
//! The tree is copied into an `RcDom` and written with html5ever's serializer,
//! so text and attribute values are always escaped. Raw HTML from the report
//! arrives here as plain text and is escaped like any other text.

mod serializer;

pub use serializer::{serialize_fragment, serialize_page};

use crate::error::RenderError;
use crate::format::Format;
use crate::ir::styled::StyledNode;
use dossier_config::RenderingConfig;

/// Standalone HTML page with the report stylesheet embedded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlFormat {
    pub title: String,
    pub lang: String,
}

impl HtmlFormat {
    pub fn from_config(config: &RenderingConfig) -> Self {
        HtmlFormat {
            title: config.title.clone(),
            lang: config.lang.clone(),
        }
    }
}

impl Default for HtmlFormat {
    fn default() -> Self {
        HtmlFormat {
            title: "研究报告".to_string(),
            lang: "zh".to_string(),
        }
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Standalone HTML page with embedded styles"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn serialize(&self, node: &StyledNode) -> Result<String, RenderError> {
        serialize_page(node, &self.title, &self.lang)
    }
}

/// Bare HTML markup of the tree
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentFormat;

impl Format for FragmentFormat {
    fn name(&self) -> &str {
        "fragment"
    }

    fn description(&self) -> &str {
        "HTML fragment without page wrapper"
    }

    fn serialize(&self, node: &StyledNode) -> Result<String, RenderError> {
        serialize_fragment(node)
    }
}
