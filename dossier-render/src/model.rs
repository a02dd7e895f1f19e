//! Wire types exchanged with the report-generation backend
//!
//! The backend answers a [`ResearchRequest`] with a [`ResearchResponse`]. Only the
//! fields the viewer consumes are modelled; anything else in the payload
//! (`executive_summary`, `metadata`, ...) is ignored on deserialization.

use crate::error::RequestError;
use serde::{Deserialize, Serialize};

pub const MAX_TOPIC_LENGTH: usize = 200;
pub const MAX_FOCUS_AREAS: usize = 5;
pub const MAX_FOCUS_AREA_LENGTH: usize = 50;

/// A full backend response: the report body plus the side lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_analysis: Option<DetailedAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
}

/// The report itself. An absent or blank `full_report` means "not yet available".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_report: Option<String>,
}

impl ResearchResponse {
    /// Build a response carrying only a report body.
    pub fn with_report(full_report: impl Into<String>) -> Self {
        Self {
            detailed_analysis: Some(DetailedAnalysis {
                full_report: Some(full_report.into()),
            }),
            ..Self::default()
        }
    }

    pub fn conclusions(mut self, conclusions: Vec<String>) -> Self {
        self.conclusions = Some(conclusions);
        self
    }

    pub fn references(mut self, references: Vec<Reference>) -> Self {
        self.references = Some(references);
        self
    }

    /// The report body, or `None` while it is absent or blank.
    pub fn full_report(&self) -> Option<&str> {
        self.detailed_analysis
            .as_ref()
            .and_then(|analysis| analysis.full_report.as_deref())
            .filter(|text| !text.trim().is_empty())
    }

    pub fn conclusion_list(&self) -> &[String] {
        self.conclusions.as_deref().unwrap_or_default()
    }

    pub fn reference_list(&self) -> &[Reference] {
        self.references.as_deref().unwrap_or_default()
    }
}

/// A structured citation supplied next to the report text.
///
/// `title` and `url` default to empty strings so a single malformed record
/// does not reject the whole response; the reference view decides what to do
/// with such records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Expected within `[0, 10]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credibility: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Reference {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_credibility(mut self, credibility: f64) -> Self {
        self.credibility = Some(credibility);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Why this record cannot be rendered as a link, if it cannot.
    pub fn defect(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            Some("missing title")
        } else if self.url.trim().is_empty() {
            Some("missing url")
        } else {
            None
        }
    }

    /// The type tag, treating an empty tag as absent.
    pub fn kind_tag(&self) -> Option<&str> {
        self.kind.as_deref().filter(|kind| !kind.trim().is_empty())
    }
}

/// The body POSTed to the generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub topic: String,
    #[serde(default = "default_depth")]
    pub depth: u8,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

fn default_depth() -> u8 {
    3
}

fn default_language() -> String {
    "zh".to_string()
}

impl ResearchRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            depth: default_depth(),
            language: default_language(),
            focus_areas: Vec::new(),
        }
    }

    /// Check the request against the limits the request form enforces.
    pub fn validate(&self) -> Result<(), RequestError> {
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(RequestError::EmptyTopic);
        }
        let len = topic.chars().count();
        if len > MAX_TOPIC_LENGTH {
            return Err(RequestError::TopicTooLong {
                len,
                max: MAX_TOPIC_LENGTH,
            });
        }
        if !(1..=5).contains(&self.depth) {
            return Err(RequestError::DepthOutOfRange(self.depth));
        }
        if self.focus_areas.len() > MAX_FOCUS_AREAS {
            return Err(RequestError::TooManyFocusAreas {
                max: MAX_FOCUS_AREAS,
            });
        }
        for (i, area) in self.focus_areas.iter().enumerate() {
            let trimmed = area.trim();
            if trimmed.is_empty() || trimmed.chars().count() > MAX_FOCUS_AREA_LENGTH {
                return Err(RequestError::InvalidFocusArea(area.clone()));
            }
            if self.focus_areas[..i].iter().any(|prev| prev.trim() == trimmed) {
                return Err(RequestError::DuplicateFocusArea(trimmed.to_string()));
            }
        }
        Ok(())
    }
}
