//! Structured diagnostics for the viewer.
//!
//! The pure pipeline functions never log. Stateful components (the viewer, the
//! render boundary, the reference view) report what happened to an injected
//! [`EventSink`]. The default sink forwards to `tracing`; tests use
//! [`MemorySink`] to assert on the exact event sequence.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    SubmissionStarted,
    ReportReceived {
        chars: usize,
        conclusions: usize,
        references: usize,
    },
    ReportCleared,
    SubmissionFailed {
        message: String,
    },
    DetectionEvaluated {
        needs_separate_section: bool,
        marker: Option<String>,
    },
    RenderFailed {
        reason: String,
    },
    BoundaryReset,
    ReferenceSkipped {
        index: usize,
        reason: &'static str,
    },
    CredibilityOutOfRange {
        index: usize,
        value: f64,
    },
}

/// Receiver of viewer diagnostics.
pub trait EventSink {
    fn record(&self, event: &ViewerEvent);
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn record(&self, event: &ViewerEvent) {
        (**self).record(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for Rc<S> {
    fn record(&self, event: &ViewerEvent) {
        (**self).record(event)
    }
}

/// Forwards events to `tracing` with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &ViewerEvent) {
        match event {
            ViewerEvent::SubmissionStarted => tracing::debug!("submission started"),
            ViewerEvent::ReportReceived {
                chars,
                conclusions,
                references,
            } => tracing::info!(chars, conclusions, references, "report received"),
            ViewerEvent::ReportCleared => tracing::debug!("report cleared"),
            ViewerEvent::SubmissionFailed { message } => {
                tracing::warn!(%message, "submission failed")
            }
            ViewerEvent::DetectionEvaluated {
                needs_separate_section,
                marker,
            } => tracing::debug!(
                needs_separate_section,
                marker = marker.as_deref().unwrap_or("-"),
                "reference section detection"
            ),
            ViewerEvent::RenderFailed { reason } => {
                tracing::error!(%reason, "document render failed")
            }
            ViewerEvent::BoundaryReset => tracing::debug!("render boundary reset"),
            ViewerEvent::ReferenceSkipped { index, reason } => {
                tracing::warn!(index, reason, "reference skipped")
            }
            ViewerEvent::CredibilityOutOfRange { index, value } => {
                tracing::warn!(index, value, "credibility outside [0, 10]")
            }
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &ViewerEvent) {}
}

/// Keeps events in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RefCell<Vec<ViewerEvent>>,
}

impl MemorySink {
    pub fn events(&self) -> Vec<ViewerEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: &ViewerEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
