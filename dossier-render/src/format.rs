//! Output format trait
//!
//! Every output format turns a finished [`StyledNode`] tree into a string. Formats
//! never see the parsed Markdown: by the time a tree reaches them, every render
//! rule and view has already been applied.

use crate::error::RenderError;
use crate::ir::styled::StyledNode;

/// Trait for output formats
///
/// # Examples
///
/// ```ignore
/// struct Shout;
///
/// impl Format for Shout {
///     fn name(&self) -> &str {
///         "shout"
///     }
///
///     fn serialize(&self, node: &StyledNode) -> Result<String, RenderError> {
///         Ok(node.text_content().to_uppercase())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name used to select this format (e.g. "html", "tree")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// File extensions written by this format, without the dot
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn serialize(&self, node: &StyledNode) -> Result<String, RenderError>;
}
