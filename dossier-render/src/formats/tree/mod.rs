//! JSON dump of the presentation tree
//!
//! Elements serialize as `{"kind": "element", "tag", "class", "attrs", "children"}`
//! and text as `{"kind": "text", "text"}`. Empty fields are left out.

use crate::error::RenderError;
use crate::format::Format;
use crate::ir::styled::StyledNode;

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeFormat;

impl Format for TreeFormat {
    fn name(&self) -> &str {
        "tree"
    }

    fn description(&self) -> &str {
        "Presentation tree as pretty-printed JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn serialize(&self, node: &StyledNode) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(node)?)
    }
}
