//! Failure isolation around a single render invocation.
//!
//! A [`RenderBoundary`] supervises one region of the page. When the wrapped
//! render returns an error or panics, the boundary records the failure, latches
//! its local failure flag and substitutes a fallback: an apology with a retry
//! control, or the last output that rendered successfully. While latched, the
//! wrapped render is not attempted again until [`RenderBoundary::reset`] is
//! called (the reader pressing "retry").

use crate::error::RenderError;
use crate::ir::styled::{Element, StyledNode};
use crate::observe::{EventSink, ViewerEvent};
use dossier_config::{FallbackPolicy, LabelsConfig};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Strings shown by the failure placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureLabels {
    pub title: String,
    pub body: String,
    pub retry: String,
}

impl FailureLabels {
    pub fn from_labels(labels: &LabelsConfig) -> Self {
        FailureLabels {
            title: labels.failure_title.clone(),
            body: labels.failure_body.clone(),
            retry: labels.retry.clone(),
        }
    }
}

impl Default for FailureLabels {
    fn default() -> Self {
        FailureLabels {
            title: "Something went wrong".to_string(),
            body: "The report could not be displayed. Please try again.".to_string(),
            retry: "Retry".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderBoundary {
    policy: FallbackPolicy,
    labels: FailureLabels,
    failed: bool,
    last_good: Option<StyledNode>,
}

impl RenderBoundary {
    pub fn new(policy: FallbackPolicy, labels: FailureLabels) -> Self {
        RenderBoundary {
            policy,
            labels,
            failed: false,
            last_good: None,
        }
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Clear the local failure flag so the next [`run`](Self::run) retries.
    pub fn reset(&mut self, sink: &dyn EventSink) {
        if self.failed {
            self.failed = false;
            sink.record(&ViewerEvent::BoundaryReset);
        }
    }

    /// Run `render` under supervision and return what the region should show.
    pub fn run<F>(&mut self, sink: &dyn EventSink, render: F) -> StyledNode
    where
        F: FnOnce() -> Result<StyledNode, RenderError>,
    {
        if self.failed {
            return self.fallback();
        }

        let outcome = match catch_unwind(AssertUnwindSafe(render)) {
            Ok(Ok(node)) => Ok(node),
            Ok(Err(err)) => Err(err.to_string()),
            Err(payload) => Err(panic_message(payload.as_ref())),
        };

        match outcome {
            Ok(node) => {
                self.last_good = Some(node.clone());
                node
            }
            Err(reason) => {
                self.failed = true;
                sink.record(&ViewerEvent::RenderFailed { reason });
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> StyledNode {
        match (self.policy, &self.last_good) {
            (FallbackPolicy::LastGood, Some(node)) => node.clone(),
            _ => self.placeholder(),
        }
    }

    fn placeholder(&self) -> StyledNode {
        Element::new("div")
            .class("report-failure")
            .attr("role", "alert")
            .child(
                Element::new("h2")
                    .class("report-failure-title")
                    .text(self.labels.title.as_str()),
            )
            .child(
                Element::new("p")
                    .class("report-failure-body")
                    .text(self.labels.body.as_str()),
            )
            .child(
                Element::new("button")
                    .class("report-retry")
                    .attr("type", "button")
                    .attr("data-action", "retry")
                    .text(self.labels.retry.as_str()),
            )
            .into()
    }
}

impl Default for RenderBoundary {
    fn default() -> Self {
        RenderBoundary::new(FallbackPolicy::Placeholder, FailureLabels::default())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "render panicked".to_string()
    }
}
