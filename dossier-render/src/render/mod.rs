//! Document rendering: the render-rule table and the boundary that supervises it.

pub mod boundary;
pub mod rules;

pub use boundary::{FailureLabels, RenderBoundary};
pub use rules::{render_document, Renderer};
