//! Rendering pipeline for AI-generated research reports
//!
//!     A research report arrives as a response with three parts: a Markdown
//!     document, a list of conclusions and a list of references. This crate turns
//!     that response into a presentation tree and decides whether the separately
//!     supplied reference list should be shown at all.
//!
//! Pipeline
//!
//!     Markdown ──parse──▶ DocumentNode ──render rules──▶ StyledNode ──format──▶ String
//!
//!     - formats/markdown: comrak AST adapted to the closed DocumentNode tree
//!     - render/rules.rs: one exhaustive match from node kind to presentation
//!     - render/boundary.rs: isolates render failures behind a placeholder
//!     - views: conclusions and reference list, rendered straight from the arrays
//!     - detect.rs: finds an embedded references section in the report text
//!     - viewer.rs: the report viewer state machine tying it all together
//!     - formats/{html,tree,treeviz}: output formats over the presentation tree
//!
//!     This is a pure lib: it powers dossier-cli but never prints, reads env
//!     vars or touches the filesystem. Everything observable goes through an
//!     [`EventSink`].
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── model.rs                # Response and request data
//!     ├── observe.rs              # Viewer events and sinks
//!     ├── detect.rs               # Reference-section detector and gating flag
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── ir
//!     ├── render
//!     ├── views
//!     ├── viewer.rs
//!     ├── formats
//!     │   ├── <format>
//!     │   │   └── mod.rs
//!     ├── lib.rs
//!
//! Reference reconciliation
//!
//!     A report frequently carries its own "References" section, and the response
//!     also carries a structured reference list. Showing both duplicates every
//!     source. The detector scans the text for any of a fixed set of markers
//!     (localized heading strings) and the gating flag holds the answer for the
//!     current text. Until the first evaluation for a text completes the list stays
//!     hidden: it is better to briefly omit it than to briefly duplicate it.

pub mod detect;
pub mod error;
pub mod format;
pub mod formats;
pub mod ir;
pub mod model;
pub mod observe;
pub mod registry;
pub mod render;
pub mod viewer;
pub mod views;

pub use detect::{detect, Detection, GatingFlag, MarkerRule, MarkerSet, ReferenceDetector};
pub use error::{RenderError, RequestError};
pub use format::Format;
pub use formats::markdown::parse_markdown;
pub use ir::nodes::DocumentNode;
pub use ir::styled::{Element, StyledNode};
pub use model::{Reference, ResearchRequest, ResearchResponse};
pub use observe::{EventSink, MemorySink, NullSink, TracingSink, ViewerEvent};
pub use registry::FormatRegistry;
pub use render::{render_document, RenderBoundary, Renderer};
pub use viewer::{RenderPass, ReportViewer, ViewState};
