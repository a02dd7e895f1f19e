//! Markdown parsing (report text → document tree)
//!
//! Pipeline: Markdown string → Comrak AST → [`DocumentNode`] tree.
//!
//! Comrak never rejects input, so neither does this module: malformed Markdown
//! yields whatever tree Comrak recovers. Comrak node kinds without a
//! `DocumentNode` counterpart are unwrapped, their children spliced into the
//! parent so no text is lost.

use crate::ir::nodes::{Alignment, DocumentNode};
use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{parse_document, Arena, ComrakOptions};

/// Beyond this depth the remaining subtree is flattened into a single text node.
pub const MAX_PARSE_DEPTH: usize = 256;

/// Parse a Markdown report into its document tree.
pub fn parse_markdown(source: &str) -> DocumentNode {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    DocumentNode::Document {
        children: convert_children(root, 1),
    }
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options
}

fn convert_children<'a>(node: &'a AstNode<'a>, depth: usize) -> Vec<DocumentNode> {
    let mut out = Vec::new();
    for child in node.children() {
        convert_node(child, depth, &mut out);
    }
    out
}

/// Convert one Comrak node, pushing zero or more document nodes onto `out`.
fn convert_node<'a>(node: &'a AstNode<'a>, depth: usize, out: &mut Vec<DocumentNode>) {
    if depth > MAX_PARSE_DEPTH {
        out.push(DocumentNode::text(flatten_text(node)));
        return;
    }

    let value = node.data.borrow().value.clone();
    let next = depth + 1;

    let converted = match value {
        NodeValue::Heading(heading) => DocumentNode::Heading {
            level: heading.level.clamp(1, 6),
            children: convert_children(node, next),
        },

        NodeValue::Paragraph => DocumentNode::Paragraph {
            children: convert_children(node, next),
        },

        NodeValue::List(list) => {
            let ordered = matches!(list.list_type, ListType::Ordered);
            DocumentNode::List {
                ordered,
                start: ordered.then_some(list.start),
                children: convert_children(node, next),
            }
        }

        NodeValue::Item(_) | NodeValue::TaskItem(_) => DocumentNode::ListItem {
            children: convert_children(node, next),
        },

        NodeValue::BlockQuote => DocumentNode::BlockQuote {
            children: convert_children(node, next),
        },

        NodeValue::Table(table) => convert_table(node, &table.alignments, next),

        NodeValue::Emph => DocumentNode::Emphasis {
            children: convert_children(node, next),
        },

        NodeValue::Strong => DocumentNode::Strong {
            children: convert_children(node, next),
        },

        NodeValue::Strikethrough => DocumentNode::Strikethrough {
            children: convert_children(node, next),
        },

        NodeValue::Link(link) => DocumentNode::Link {
            url: link.url,
            title: non_empty(link.title),
            children: convert_children(node, next),
        },

        NodeValue::Image(link) => DocumentNode::Image {
            url: link.url,
            title: non_empty(link.title),
            children: convert_children(node, next),
        },

        NodeValue::Code(code) => DocumentNode::InlineCode {
            literal: code.literal,
        },

        NodeValue::CodeBlock(code_block) => DocumentNode::CodeBlock {
            info: non_empty(code_block.info),
            literal: code_block.literal,
        },

        NodeValue::Text(text) => DocumentNode::Text { text },

        NodeValue::SoftBreak => DocumentNode::SoftBreak,

        NodeValue::LineBreak => DocumentNode::LineBreak,

        NodeValue::ThematicBreak => DocumentNode::ThematicBreak,

        NodeValue::HtmlBlock(html) => DocumentNode::Html {
            literal: html.literal,
        },

        NodeValue::HtmlInline(literal) => DocumentNode::Html { literal },

        _ => {
            // Unmapped container (front matter, footnotes, ...): keep its content.
            out.extend(convert_children(node, next));
            return;
        }
    };

    out.push(converted);
}

/// Group table rows into head and body sections and resolve cell alignment.
fn convert_table<'a>(
    node: &'a AstNode<'a>,
    alignments: &[TableAlignment],
    depth: usize,
) -> DocumentNode {
    let mut head = Vec::new();
    let mut body = Vec::new();

    for row in node.children() {
        let header = match row.data.borrow().value {
            NodeValue::TableRow(header) => header,
            _ => continue,
        };

        let cells = row
            .children()
            .enumerate()
            .map(|(column, cell)| DocumentNode::TableCell {
                header,
                alignment: alignments
                    .get(column)
                    .map(convert_alignment)
                    .unwrap_or_default(),
                children: convert_children(cell, depth + 2),
            })
            .collect();

        let row = DocumentNode::TableRow { children: cells };
        if header {
            head.push(row);
        } else {
            body.push(row);
        }
    }

    let mut children = Vec::new();
    if !head.is_empty() {
        children.push(DocumentNode::TableHead { children: head });
    }
    if !body.is_empty() {
        children.push(DocumentNode::TableBody { children: body });
    }
    DocumentNode::Table { children }
}

fn convert_alignment(alignment: &TableAlignment) -> Alignment {
    match alignment {
        TableAlignment::None => Alignment::None,
        TableAlignment::Left => Alignment::Left,
        TableAlignment::Center => Alignment::Center,
        TableAlignment::Right => Alignment::Right,
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Collect the literal text under `node` without recursion.
fn flatten_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for descendant in node.descendants() {
        match &descendant.data.borrow().value {
            NodeValue::Text(literal) => text.push_str(literal),
            NodeValue::Code(code) => text.push_str(&code.literal),
            NodeValue::CodeBlock(block) => text.push_str(&block.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
            _ => {}
        }
    }
    text
}
