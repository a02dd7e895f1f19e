//! Input and output formats
//!
//! Markdown is the only input. The output formats all consume the
//! presentation tree and are registered in the
//! [`FormatRegistry`](crate::registry::FormatRegistry).

pub mod html;
pub mod markdown;
pub mod tree;
pub mod treeviz;

pub use html::{FragmentFormat, HtmlFormat};
pub use tree::TreeFormat;
pub use treeviz::TreevizFormat;
