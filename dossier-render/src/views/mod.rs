//! Views for the lists that travel next to the report text.
//!
//! Neither list goes through the Markdown parser: conclusions and references are
//! rendered straight from the response arrays, in array order.

pub mod conclusions;
pub mod references;

pub use conclusions::render_conclusions;
pub use references::{
    format_credibility, render_references, report_reference_defects, ReferenceViewOptions,
};
