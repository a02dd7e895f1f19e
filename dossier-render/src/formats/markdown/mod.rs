//! Markdown input
//!
//! Reports arrive as CommonMark with the GFM table, strikethrough and autolink
//! extensions. Parsing is delegated to the comrak crate; this module only adapts
//! comrak's arena AST to the crate's own [`DocumentNode`](crate::ir::nodes::DocumentNode)
//! tree.
//!
//! Data Model:
//!
//!     | Markdown        | DocumentNode                       |
//!     | Heading (ATX/setext) | Heading, level kept           |
//!     | Table           | Table > TableHead / TableBody > TableRow > TableCell |
//!     | Task list item  | ListItem (checkbox dropped)        |
//!     | Footnotes, front matter | unwrapped, content kept    |
//!
//! Parsing is total: every input yields a tree.

mod parser;

pub use parser::{parse_markdown, MAX_PARSE_DEPTH};
