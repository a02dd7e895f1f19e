//! Indented outline of a tree, one node per line
//!
//! ```text
//! div.report-prose
//!   h1.report-h1
//!     "Market outlook"
//!   a.report-link [href=https://a.example target=_blank rel=noopener noreferrer]
//!     "source"
//! ```
//!
//! Elements print as `tag.class` followed by their attributes; text prints quoted
//! and truncated. [`document_outline`] does the same for the parsed document, so
//! both trees can be compared side by side.

use crate::error::RenderError;
use crate::format::Format;
use crate::ir::nodes::DocumentNode;
use crate::ir::styled::StyledNode;

const MAX_TEXT: usize = 60;

#[derive(Debug, Clone, Copy, Default)]
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Indented outline of the presentation tree"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn serialize(&self, node: &StyledNode) -> Result<String, RenderError> {
        Ok(styled_outline(node))
    }
}

/// Outline of the presentation tree.
pub fn styled_outline(node: &StyledNode) -> String {
    let mut out = String::new();
    let mut stack = vec![(node, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        push_indent(&mut out, depth);
        match node {
            StyledNode::Text { text } => out.push_str(&quote(text)),
            StyledNode::Element(element) => {
                out.push_str(element.tag);
                if let Some(class) = element.class {
                    out.push('.');
                    out.push_str(class);
                }
                if !element.attrs.is_empty() {
                    let attrs: Vec<String> = element
                        .attrs
                        .iter()
                        .map(|(name, value)| format!("{name}={value}"))
                        .collect();
                    out.push_str(&format!(" [{}]", attrs.join(" ")));
                }
                stack.extend(element.children.iter().rev().map(|child| (child, depth + 1)));
            }
        }
        out.push('\n');
    }
    out
}

/// Outline of the parsed document, using node labels.
pub fn document_outline(node: &DocumentNode) -> String {
    let mut out = String::new();
    let mut stack = vec![(node, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        push_indent(&mut out, depth);
        out.push_str(node.label());
        match node {
            DocumentNode::Heading { level, .. } => out.push_str(&format!(" h{level}")),
            DocumentNode::List {
                start: Some(start), ..
            } => out.push_str(&format!(" start={start}")),
            DocumentNode::Link { url, .. } | DocumentNode::Image { url, .. } => {
                out.push_str(&format!(" <{url}>"))
            }
            DocumentNode::CodeBlock { info: Some(info), .. } => {
                out.push_str(&format!(" {info}"))
            }
            DocumentNode::Text { text } => {
                out.push(' ');
                out.push_str(&quote(text));
            }
            DocumentNode::InlineCode { literal } | DocumentNode::Html { literal } => {
                out.push(' ');
                out.push_str(&quote(literal));
            }
            _ => {}
        }
        out.push('\n');
        stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
    }
    out
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn quote(text: &str) -> String {
    let text = text.replace('\n', "\\n");
    if text.chars().count() > MAX_TEXT {
        let truncated: String = text.chars().take(MAX_TEXT).collect();
        format!("\"{truncated}...\"")
    } else {
        format!("\"{text}\"")
    }
}
