//! Intermediate representations shared by the pipeline.
//!
//! Two trees flow through the crate:
//!
//! - [`nodes::DocumentNode`]: the parsed report, a closed set of block and inline
//!   variants in source order. Produced by the Markdown parser, consumed by the
//!   render rules and the heading-anchored detector.
//! - [`styled::StyledNode`]: the presentation tree. Produced by the render rules
//!   and the views, consumed by the output formats.
//!
//! Keeping the two apart means the render rules are the only place that knows how
//! a node kind looks, and output formats never see Markdown concepts.

pub mod nodes;
pub mod styled;
