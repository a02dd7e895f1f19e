//! Block render-rule table
//!
//! Maps every [`DocumentNode`] variant to its presentation. The mapping is a
//! single exhaustive `match`: adding a node kind without deciding how it looks
//! is a compile error. Variants without a custom look still produce an element
//! (the plain HTML tag), so nothing is ever dropped.
//!
//! | Variant            | Output                                            |
//! |--------------------|---------------------------------------------------|
//! | Document           | `div.report-prose`                                |
//! | Heading 1 / 2 / 3  | `h1.report-h1` / `h2.report-h2` / `h3.report-h3`  |
//! | Heading 4..6       | `h4`..`h6`                                        |
//! | Paragraph          | `p.report-p` (justified)                          |
//! | List               | `ul.report-ul` / `ol.report-ol[start]`            |
//! | ListItem           | `li.report-li`                                    |
//! | BlockQuote         | `blockquote.report-quote`                         |
//! | Table              | `div.report-table-wrap > table.report-table`      |
//! | TableHead/Body/Row | `thead.report-thead` / `tbody` / `tr.report-tr`   |
//! | TableCell          | `th.report-th` / `td.report-td`                   |
//! | Strong / Emphasis  | `strong.report-strong` / `em.report-em`           |
//! | Link               | `a.report-link[target=_blank]`                    |
//! | CodeBlock          | `pre.report-pre > code`                           |
//! | InlineCode         | `code`                                            |
//!
//! Rendering is a pure function of the tree.

use crate::error::RenderError;
use crate::formats::markdown::{parse_markdown, MAX_PARSE_DEPTH};
use crate::ir::nodes::{Alignment, DocumentNode};
use crate::ir::styled::{Element, StyledNode};
use url::Url;

/// Covers every tree the parser can produce: its nesting bound, the flattened
/// text below it, and the extra levels a table adds around cell content.
pub const DEFAULT_MAX_DEPTH: usize = MAX_PARSE_DEPTH + 8;

/// Walks a document tree and applies the render rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    max_depth: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Renderer {
    pub fn new(max_depth: usize) -> Self {
        Renderer { max_depth }
    }

    pub fn from_config(config: &dossier_config::RenderingConfig) -> Self {
        Renderer::new(config.max_depth)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse `source` and render the resulting tree.
    pub fn render_text(&self, source: &str) -> Result<StyledNode, RenderError> {
        self.render_tree(&parse_markdown(source))
    }

    pub fn render_tree(&self, node: &DocumentNode) -> Result<StyledNode, RenderError> {
        self.render_node(node, 0)
    }

    fn render_children(
        &self,
        children: &[DocumentNode],
        depth: usize,
    ) -> Result<Vec<StyledNode>, RenderError> {
        children
            .iter()
            .map(|child| self.render_node(child, depth + 1))
            .collect()
    }

    fn render_node(&self, node: &DocumentNode, depth: usize) -> Result<StyledNode, RenderError> {
        if depth > self.max_depth {
            return Err(RenderError::NestingTooDeep {
                limit: self.max_depth,
            });
        }

        let element = match node {
            DocumentNode::Document { children } => Element::new("div")
                .class("report-prose")
                .children(self.render_children(children, depth)?),

            DocumentNode::Heading { level, children } => {
                heading(*level).children(self.render_children(children, depth)?)
            }

            DocumentNode::Paragraph { children } => Element::new("p")
                .class("report-p")
                .children(self.render_children(children, depth)?),

            DocumentNode::List {
                ordered: true,
                start,
                children,
            } => {
                let mut list = Element::new("ol").class("report-ol");
                if let Some(start) = start.filter(|start| *start != 1) {
                    list = list.attr("start", start.to_string());
                }
                list.children(self.render_children(children, depth)?)
            }

            DocumentNode::List {
                ordered: false,
                children,
                ..
            } => Element::new("ul")
                .class("report-ul")
                .children(self.render_children(children, depth)?),

            DocumentNode::ListItem { children } => Element::new("li")
                .class("report-li")
                .children(self.render_children(children, depth)?),

            DocumentNode::BlockQuote { children } => Element::new("blockquote")
                .class("report-quote")
                .children(self.render_children(children, depth)?),

            DocumentNode::Table { children } => Element::new("div")
                .class("report-table-wrap")
                .child(
                    Element::new("table")
                        .class("report-table")
                        .children(self.render_children(children, depth)?),
                ),

            DocumentNode::TableHead { children } => Element::new("thead")
                .class("report-thead")
                .children(self.render_children(children, depth)?),

            DocumentNode::TableBody { children } => {
                Element::new("tbody").children(self.render_children(children, depth)?)
            }

            DocumentNode::TableRow { children } => Element::new("tr")
                .class("report-tr")
                .children(self.render_children(children, depth)?),

            DocumentNode::TableCell {
                header,
                alignment,
                children,
            } => {
                let mut cell = if *header {
                    Element::new("th").class("report-th")
                } else {
                    Element::new("td").class("report-td")
                };
                if let Some(align) = text_align(*alignment) {
                    cell = cell.attr("style", format!("text-align: {align}"));
                }
                cell.children(self.render_children(children, depth)?)
            }

            DocumentNode::Emphasis { children } => Element::new("em")
                .class("report-em")
                .children(self.render_children(children, depth)?),

            DocumentNode::Strong { children } => Element::new("strong")
                .class("report-strong")
                .children(self.render_children(children, depth)?),

            DocumentNode::Strikethrough { children } => {
                Element::new("del").children(self.render_children(children, depth)?)
            }

            DocumentNode::Link {
                url,
                title,
                children,
            } => {
                let mut link = Element::new("a").class("report-link");
                if let Some(href) = safe_href(url) {
                    link = link.attr("href", href);
                }
                if let Some(title) = title {
                    link = link.attr("title", title.as_str());
                }
                new_context(link).children(self.render_children(children, depth)?)
            }

            DocumentNode::Image {
                url,
                title,
                children,
            } => {
                let alt: String = children.iter().map(DocumentNode::plain_text).collect();
                let mut image = Element::new("img");
                if let Some(src) = safe_href(url) {
                    image = image.attr("src", src);
                }
                image = image.attr("alt", alt);
                if let Some(title) = title {
                    image = image.attr("title", title.as_str());
                }
                image
            }

            DocumentNode::InlineCode { literal } => Element::new("code").text(literal.as_str()),

            DocumentNode::CodeBlock { info, literal } => {
                let mut code = Element::new("code");
                if let Some(language) = info.as_deref().and_then(|info| info.split_whitespace().next())
                {
                    code = code.attr("data-language", language);
                }
                Element::new("pre")
                    .class("report-pre")
                    .child(code.text(literal.as_str()))
            }

            DocumentNode::Text { text } => return Ok(StyledNode::text(text.as_str())),

            DocumentNode::SoftBreak => return Ok(StyledNode::text("\n")),

            DocumentNode::LineBreak => Element::new("br"),

            DocumentNode::ThematicBreak => Element::new("hr"),

            // Raw HTML is shown, never interpreted.
            DocumentNode::Html { literal } => return Ok(StyledNode::text(literal.as_str())),
        };

        Ok(element.into())
    }
}

/// Render a Markdown report with the default rules.
pub fn render_document(source: &str) -> Result<StyledNode, RenderError> {
    Renderer::default().render_text(source)
}

fn heading(level: u8) -> Element {
    match level {
        1 => Element::new("h1").class("report-h1"),
        2 => Element::new("h2").class("report-h2"),
        3 => Element::new("h3").class("report-h3"),
        4 => Element::new("h4"),
        5 => Element::new("h5"),
        _ => Element::new("h6"),
    }
}

fn text_align(alignment: Alignment) -> Option<&'static str> {
    match alignment {
        Alignment::None => None,
        Alignment::Left => Some("left"),
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
    }
}

/// Links always open in a new browsing context.
pub(crate) fn new_context(anchor: Element) -> Element {
    anchor
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
}

/// Keep relative targets and web/mail schemes; anything else loses its target.
pub(crate) fn safe_href(url: &str) -> Option<&str> {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https" | "mailto").then_some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Some(url),
        Err(_) => None,
    }
}
