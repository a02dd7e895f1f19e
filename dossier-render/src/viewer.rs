//! Report viewer: the orchestrator owning report, error and gating state.
//!
//! State machine:
//!
//!     AwaitingReport ──receive──▶ DisplayingReport
//!     DisplayingReport ──back──▶ AwaitingReport      (clears the error too)
//!     DisplayingReport ──receive──▶ DisplayingReport (report replaced wholesale)
//!
//! Both states carry an optional error overlay and a loading flag. A failed
//! submission only sets the overlay; it never changes the primary state.
//!
//! Rendering happens in passes. A pass composes the page from the current state
//! and then runs the detection effect, which re-evaluates the gating flag if the
//! report text changed. When that flips the flag a second pass is needed;
//! [`ReportViewer::render`] performs at most that one extra pass.

use crate::detect::{GatingFlag, ReferenceDetector};
use crate::ir::styled::{Element, StyledNode};
use crate::model::ResearchResponse;
use crate::observe::{EventSink, TracingSink, ViewerEvent};
use crate::render::{FailureLabels, RenderBoundary, Renderer};
use crate::views::{
    render_conclusions, render_references, report_reference_defects, ReferenceViewOptions,
};
use dossier_config::{DossierConfig, LabelsConfig};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    AwaitingReport,
    DisplayingReport(Box<ResearchResponse>),
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPass {
    pub page: StyledNode,
    /// The detection effect changed the gating flag; the page is out of date.
    pub rerender: bool,
}

pub struct ReportViewer<S = TracingSink> {
    state: ViewState,
    error: Option<String>,
    loading: bool,
    gate: GatingFlag,
    detector: ReferenceDetector,
    renderer: Renderer,
    boundary: RenderBoundary,
    references: ReferenceViewOptions,
    labels: LabelsConfig,
    sink: S,
}

impl ReportViewer<TracingSink> {
    pub fn from_config(config: &DossierConfig) -> Self {
        ReportViewer::new(config, TracingSink)
    }
}

impl<S: EventSink> ReportViewer<S> {
    pub fn new(config: &DossierConfig, sink: S) -> Self {
        ReportViewer {
            state: ViewState::AwaitingReport,
            error: None,
            loading: false,
            gate: GatingFlag::default(),
            detector: ReferenceDetector::from_config(&config.detection),
            renderer: Renderer::from_config(&config.rendering),
            boundary: RenderBoundary::new(
                config.boundary.fallback,
                FailureLabels::from_labels(&config.labels),
            ),
            references: ReferenceViewOptions::from_config(config),
            labels: config.labels.clone(),
            sink,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn report(&self) -> Option<&ResearchResponse> {
        match &self.state {
            ViewState::DisplayingReport(response) => Some(response),
            ViewState::AwaitingReport => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn gate(&self) -> &GatingFlag {
        &self.gate
    }

    pub fn boundary(&self) -> &RenderBoundary {
        &self.boundary
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// A request went out: show progress and drop any stale error.
    pub fn begin_submission(&mut self) {
        self.loading = true;
        self.error = None;
        self.sink.record(&ViewerEvent::SubmissionStarted);
    }

    /// A response arrived: display it, replacing any previous report.
    pub fn receive(&mut self, response: ResearchResponse) {
        self.sink.record(&ViewerEvent::ReportReceived {
            chars: response.full_report().map_or(0, |text| text.chars().count()),
            conclusions: response.conclusion_list().len(),
            references: response.reference_list().len(),
        });
        report_reference_defects(response.reference_list(), &self.references, &self.sink);

        // A different text must be proven safe before its list shows.
        if let Some(text) = response.full_report() {
            if self.gate.is_stale(text) {
                self.gate.reset();
            }
        }

        self.state = ViewState::DisplayingReport(Box::new(response));
        self.error = None;
        self.loading = false;
    }

    /// The request failed upstream. The primary state is left alone.
    pub fn fail_submission(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.sink.record(&ViewerEvent::SubmissionFailed {
            message: message.clone(),
        });
        self.error = Some(message);
        self.loading = false;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Leave the report view. Clears the error in the same step.
    pub fn back(&mut self) {
        if let ViewState::DisplayingReport(_) = self.state {
            self.state = ViewState::AwaitingReport;
            self.error = None;
            self.gate.reset();
            self.sink.record(&ViewerEvent::ReportCleared);
        }
    }

    /// The reader pressed "retry" on the render failure placeholder.
    pub fn retry(&mut self) {
        self.boundary.reset(&self.sink);
    }

    /// Render until the page is consistent with the gating flag.
    pub fn render(&mut self) -> StyledNode {
        let pass = self.render_pass();
        if pass.rerender {
            self.render_pass().page
        } else {
            pass.page
        }
    }

    /// Compose the page with the current state, then run the detection effect.
    pub fn render_pass(&mut self) -> RenderPass {
        let page = self.compose();
        let rerender = self.run_detection();
        RenderPass { page, rerender }
    }

    fn run_detection(&mut self) -> bool {
        let text = match &self.state {
            ViewState::DisplayingReport(response) => response.full_report(),
            ViewState::AwaitingReport => None,
        };
        let before = self.gate.show_references();
        if let Some(detection) = self.gate.observe(text, &self.detector) {
            self.sink.record(&ViewerEvent::DetectionEvaluated {
                needs_separate_section: detection.needs_separate_section(),
                marker: detection.marker,
            });
        }
        self.gate.show_references() != before
    }

    fn compose(&mut self) -> StyledNode {
        let mut page = Element::new("div").class("report-page");

        if let Some(message) = &self.error {
            page = page.child(error_alert(&self.labels, message));
        }

        let response = match &self.state {
            ViewState::AwaitingReport => {
                return page.child(prompt(&self.labels, self.loading)).into();
            }
            ViewState::DisplayingReport(response) => response,
        };

        page = page.child(
            Element::new("button")
                .class("report-back")
                .attr("type", "button")
                .attr("data-action", "back")
                .text(format!("‹ {}", self.labels.back)),
        );

        let body = match response.full_report() {
            Some(text) => {
                let renderer = self.renderer;
                self.boundary
                    .run(&self.sink, || renderer.render_text(text))
            }
            None => Element::new("div")
                .class("report-generating")
                .child(Element::new("p").text(self.labels.generating.as_str()))
                .into(),
        };
        page = page.child(Element::new("article").class("report-article").child(body));

        let sections: Vec<StyledNode> = [
            render_conclusions(
                response.conclusion_list(),
                &self.labels.conclusions_heading,
            ),
            render_references(
                response.reference_list(),
                self.gate.show_references(),
                &self.references,
            ),
        ]
        .into_iter()
        .flatten()
        .collect();

        if !sections.is_empty() {
            page = page.child(Element::new("div").class("report-appendix").children(sections));
        }

        page.into()
    }
}

fn error_alert(labels: &LabelsConfig, message: &str) -> Element {
    Element::new("div")
        .class("report-alert")
        .attr("role", "alert")
        .child(
            Element::new("strong")
                .class("report-alert-title")
                .text(labels.error_title.as_str()),
        )
        .child(
            Element::new("p")
                .class("report-alert-message")
                .text(message),
        )
        .child(
            Element::new("button")
                .class("report-dismiss")
                .attr("type", "button")
                .attr("data-action", "dismiss-error")
                .attr("aria-label", labels.dismiss.as_str())
                .text("×"),
        )
}

fn prompt(labels: &LabelsConfig, loading: bool) -> Element {
    let mut section = Element::new("section")
        .class("report-prompt")
        .child(
            Element::new("h2")
                .class("report-prompt-title")
                .text(labels.prompt_title.as_str()),
        )
        .child(
            Element::new("p")
                .class("report-prompt-subtitle")
                .text(labels.prompt_subtitle.as_str()),
        );
    if loading {
        section = section.attr("aria-busy", "true").child(
            Element::new("p")
                .class("report-loading")
                .text(labels.loading.as_str()),
        );
    }
    section
}
