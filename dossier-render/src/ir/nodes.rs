//! Typed document tree produced by the Markdown parser.
//!
//! The tree is a closed set of variants so every consumer (the render-rule table,
//! the heading-anchored detector, the outline dump) is checked for exhaustiveness
//! by the compiler. Children are always kept in source order.

use serde::Serialize;

/// Column alignment of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// One element of a parsed report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentNode {
    Document {
        children: Vec<DocumentNode>,
    },
    Heading {
        level: u8,
        children: Vec<DocumentNode>,
    },
    Paragraph {
        children: Vec<DocumentNode>,
    },
    List {
        ordered: bool,
        start: Option<usize>,
        children: Vec<DocumentNode>,
    },
    ListItem {
        children: Vec<DocumentNode>,
    },
    BlockQuote {
        children: Vec<DocumentNode>,
    },
    Table {
        children: Vec<DocumentNode>,
    },
    TableHead {
        children: Vec<DocumentNode>,
    },
    TableBody {
        children: Vec<DocumentNode>,
    },
    TableRow {
        children: Vec<DocumentNode>,
    },
    TableCell {
        header: bool,
        alignment: Alignment,
        children: Vec<DocumentNode>,
    },
    Emphasis {
        children: Vec<DocumentNode>,
    },
    Strong {
        children: Vec<DocumentNode>,
    },
    Strikethrough {
        children: Vec<DocumentNode>,
    },
    Link {
        url: String,
        title: Option<String>,
        children: Vec<DocumentNode>,
    },
    Image {
        url: String,
        title: Option<String>,
        children: Vec<DocumentNode>,
    },
    InlineCode {
        literal: String,
    },
    CodeBlock {
        info: Option<String>,
        literal: String,
    },
    Text {
        text: String,
    },
    SoftBreak,
    LineBreak,
    ThematicBreak,
    Html {
        literal: String,
    },
}

impl DocumentNode {
    pub fn text(text: impl Into<String>) -> Self {
        DocumentNode::Text { text: text.into() }
    }

    /// Child nodes, empty for leaves.
    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Document { children }
            | DocumentNode::Heading { children, .. }
            | DocumentNode::Paragraph { children }
            | DocumentNode::List { children, .. }
            | DocumentNode::ListItem { children }
            | DocumentNode::BlockQuote { children }
            | DocumentNode::Table { children }
            | DocumentNode::TableHead { children }
            | DocumentNode::TableBody { children }
            | DocumentNode::TableRow { children }
            | DocumentNode::TableCell { children, .. }
            | DocumentNode::Emphasis { children }
            | DocumentNode::Strong { children }
            | DocumentNode::Strikethrough { children }
            | DocumentNode::Link { children, .. }
            | DocumentNode::Image { children, .. } => children,
            DocumentNode::InlineCode { .. }
            | DocumentNode::CodeBlock { .. }
            | DocumentNode::Text { .. }
            | DocumentNode::SoftBreak
            | DocumentNode::LineBreak
            | DocumentNode::ThematicBreak
            | DocumentNode::Html { .. } => &[],
        }
    }

    /// Short label naming the variant, used by outline dumps and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentNode::Document { .. } => "document",
            DocumentNode::Heading { .. } => "heading",
            DocumentNode::Paragraph { .. } => "paragraph",
            DocumentNode::List { ordered: true, .. } => "ordered-list",
            DocumentNode::List { ordered: false, .. } => "unordered-list",
            DocumentNode::ListItem { .. } => "list-item",
            DocumentNode::BlockQuote { .. } => "blockquote",
            DocumentNode::Table { .. } => "table",
            DocumentNode::TableHead { .. } => "table-head",
            DocumentNode::TableBody { .. } => "table-body",
            DocumentNode::TableRow { .. } => "table-row",
            DocumentNode::TableCell { .. } => "table-cell",
            DocumentNode::Emphasis { .. } => "emphasis",
            DocumentNode::Strong { .. } => "strong",
            DocumentNode::Strikethrough { .. } => "strikethrough",
            DocumentNode::Link { .. } => "link",
            DocumentNode::Image { .. } => "image",
            DocumentNode::InlineCode { .. } => "inline-code",
            DocumentNode::CodeBlock { .. } => "code-block",
            DocumentNode::Text { .. } => "text",
            DocumentNode::SoftBreak => "soft-break",
            DocumentNode::LineBreak => "line-break",
            DocumentNode::ThematicBreak => "thematic-break",
            DocumentNode::Html { .. } => "html",
        }
    }

    /// Concatenated text content of this node and its descendants.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in self.descendants() {
            match node {
                DocumentNode::Text { text } => out.push_str(text),
                DocumentNode::InlineCode { literal } | DocumentNode::CodeBlock { literal, .. } => {
                    out.push_str(literal)
                }
                DocumentNode::SoftBreak | DocumentNode::LineBreak => out.push(' '),
                _ => {}
            }
        }
        out
    }

    /// Pre-order traversal of this node and everything below it.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// All headings in document order, with their level.
    pub fn headings(&self) -> impl Iterator<Item = (u8, &DocumentNode)> + '_ {
        self.descendants().filter_map(|node| match node {
            DocumentNode::Heading { level, .. } => Some((*level, node)),
            _ => None,
        })
    }
}

/// Iterator returned by [`DocumentNode::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a DocumentNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a DocumentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentNode {
        DocumentNode::Document {
            children: vec![
                DocumentNode::Heading {
                    level: 2,
                    children: vec![
                        DocumentNode::text("9. "),
                        DocumentNode::Strong {
                            children: vec![DocumentNode::text("References")],
                        },
                    ],
                },
                DocumentNode::Paragraph {
                    children: vec![
                        DocumentNode::text("a"),
                        DocumentNode::SoftBreak,
                        DocumentNode::InlineCode {
                            literal: "b".into(),
                        },
                    ],
                },
            ],
        }
    }

    #[test]
    fn descendants_are_pre_order() {
        let doc = sample();
        let labels: Vec<_> = doc.descendants().map(DocumentNode::label).collect();
        assert_eq!(
            labels,
            vec![
                "document",
                "heading",
                "text",
                "strong",
                "text",
                "paragraph",
                "text",
                "soft-break",
                "inline-code"
            ]
        );
    }

    #[test]
    fn plain_text_flattens_inlines() {
        let doc = sample();
        let (level, heading) = doc.headings().next().unwrap();
        assert_eq!(level, 2);
        assert_eq!(heading.plain_text(), "9. References");
        assert_eq!(doc.children()[1].plain_text(), "a b");
    }
}
