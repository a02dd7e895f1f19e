//! Separately supplied reference list.
//!
//! Shown only when the gating flag allows it, i.e. when the report text does not
//! already carry its own references section. Entries keep their input order and
//! the ordinal shown is always `index + 1` of the input array.

use crate::ir::styled::{Element, StyledNode};
use crate::model::Reference;
use crate::observe::{EventSink, ViewerEvent};
use crate::render::rules::{new_context, safe_href};
use dossier_config::{DossierConfig, MalformedPolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceViewOptions {
    pub heading: String,
    pub credibility_label: String,
    pub malformed: MalformedPolicy,
    pub placeholder_title: String,
}

impl ReferenceViewOptions {
    pub fn from_config(config: &DossierConfig) -> Self {
        ReferenceViewOptions {
            heading: config.labels.references_heading.clone(),
            credibility_label: config.labels.credibility.clone(),
            malformed: config.references.malformed,
            placeholder_title: config.references.placeholder_title.clone(),
        }
    }
}

impl Default for ReferenceViewOptions {
    fn default() -> Self {
        ReferenceViewOptions {
            heading: "References".to_string(),
            credibility_label: "Credibility Score".to_string(),
            malformed: MalformedPolicy::Skip,
            placeholder_title: "Untitled source".to_string(),
        }
    }
}

/// Credibility with exactly one decimal place, ties rounded away from zero.
pub fn format_credibility(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

/// Record the defects of a reference list: scores outside 0-10 and entries the
/// `skip` policy will drop. Call once per received report.
pub fn report_reference_defects(
    references: &[Reference],
    options: &ReferenceViewOptions,
    sink: &dyn EventSink,
) {
    for (index, reference) in references.iter().enumerate() {
        if let Some(value) = reference.credibility {
            if !(0.0..=10.0).contains(&value) {
                sink.record(&ViewerEvent::CredibilityOutOfRange { index, value });
            }
        }
        if let (Some(reason), MalformedPolicy::Skip) = (reference.defect(), options.malformed) {
            sink.record(&ViewerEvent::ReferenceSkipped { index, reason });
        }
    }
}

/// Render the reference list, or `None` when suppressed or nothing is left to show.
pub fn render_references(
    references: &[Reference],
    show: bool,
    options: &ReferenceViewOptions,
) -> Option<StyledNode> {
    if !show || references.is_empty() {
        return None;
    }

    let mut entries: Vec<StyledNode> = Vec::with_capacity(references.len());
    for (index, reference) in references.iter().enumerate() {
        let entry = match (reference.defect(), options.malformed) {
            (None, _) => linked_entry(index, reference, options),
            (Some(_), MalformedPolicy::Skip) => continue,
            (Some(_), MalformedPolicy::Placeholder) => unlinked_entry(index, reference, options),
        };
        entries.push(Element::new("div").class("report-ref-card").child(entry).into());
    }

    if entries.is_empty() {
        return None;
    }

    Some(
        Element::new("section")
            .class("report-references")
            .child(
                Element::new("h2")
                    .class("report-section-title")
                    .text(options.heading.as_str()),
            )
            .child(Element::new("div").class("report-ref-list").children(entries))
            .into(),
    )
}

fn linked_entry(index: usize, reference: &Reference, options: &ReferenceViewOptions) -> Element {
    let mut anchor = Element::new("a").class("report-ref");
    if let Some(href) = safe_href(reference.url.trim()) {
        anchor = anchor.attr("href", href);
    }
    new_context(anchor).children(entry_content(
        index,
        &reference.title,
        reference,
        options,
    ))
}

fn unlinked_entry(index: usize, reference: &Reference, options: &ReferenceViewOptions) -> Element {
    let title = if reference.title.trim().is_empty() {
        options.placeholder_title.as_str()
    } else {
        reference.title.as_str()
    };
    Element::new("div")
        .class("report-ref-unlinked")
        .children(entry_content(index, title, reference, options))
}

fn entry_content(
    index: usize,
    title: &str,
    reference: &Reference,
    options: &ReferenceViewOptions,
) -> Vec<StyledNode> {
    let mut head = Element::new("div")
        .class("report-ref-head")
        .child(Element::new("h3").class("report-ref-title").text(title));
    if let Some(value) = reference.credibility {
        head = head.child(Element::new("span").class("report-credibility").text(format!(
            "({}: {})",
            options.credibility_label,
            format_credibility(value)
        )));
    }

    let mut meta = Element::new("div").class("report-ref-meta");
    if !reference.url.trim().is_empty() {
        meta = meta.child(
            Element::new("span")
                .class("report-ref-url")
                .text(reference.url.trim()),
        );
    }
    if let Some(kind) = reference.kind_tag() {
        meta = meta.child(Element::new("span").class("report-badge").text(kind));
    }

    vec![
        Element::new("span")
            .class("report-ordinal")
            .text((index + 1).to_string())
            .into(),
        Element::new("div")
            .class("report-ref-body")
            .child(head)
            .child(meta)
            .into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::MemorySink;

    fn refs() -> Vec<Reference> {
        vec![
            Reference::new("A", "http://a"),
            Reference::new("B", "http://b")
                .with_credibility(9.5)
                .with_kind("行业分析文章"),
        ]
    }

    #[test]
    fn suppressed_flag_renders_nothing() {
        let options = ReferenceViewOptions::default();
        assert_eq!(render_references(&refs(), false, &options), None);
    }

    #[test]
    fn empty_list_renders_nothing() {
        let options = ReferenceViewOptions::default();
        assert_eq!(render_references(&[], true, &options), None);
    }

    #[test]
    fn entries_link_to_new_context() {
        let options = ReferenceViewOptions::default();
        let section = render_references(&refs(), true, &options).unwrap();
        let anchors = section.find_by_class("report-ref");
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].get_attr("href"), Some("http://a"));
        assert_eq!(anchors[1].get_attr("target"), Some("_blank"));
        assert_eq!(anchors[1].get_attr("rel"), Some("noopener noreferrer"));
    }

    #[test]
    fn credibility_and_badge_only_when_present() {
        let options = ReferenceViewOptions::default();
        let section = render_references(&refs(), true, &options).unwrap();
        let credibility = section.find_by_class("report-credibility");
        assert_eq!(credibility.len(), 1);
        assert_eq!(credibility[0].text_content(), "(Credibility Score: 9.5)");
        let badges = section.find_by_class("report-badge");
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].text_content(), "行业分析文章");
    }

    #[test]
    fn credibility_formatting() {
        assert_eq!(format_credibility(8.0), "8.0");
        assert_eq!(format_credibility(9.53), "9.5");
        assert_eq!(format_credibility(9.56), "9.6");
        assert_eq!(format_credibility(0.0), "0.0");
        assert_eq!(format_credibility(10.0), "10.0");
        assert_eq!(format_credibility(9.25), "9.3");
        assert_eq!(format_credibility(8.25), "8.3");
        assert_eq!(format_credibility(0.25), "0.3");
        assert_eq!(format_credibility(8.75), "8.8");
    }

    #[test]
    fn zero_credibility_is_still_shown() {
        let options = ReferenceViewOptions::default();
        let refs = vec![Reference::new("Z", "http://z").with_credibility(0.0)];
        let section = render_references(&refs, true, &options).unwrap();
        assert_eq!(
            section.find_by_class("report-credibility")[0].text_content(),
            "(Credibility Score: 0.0)"
        );
    }

    #[test]
    fn malformed_entries_are_skipped_and_ordinals_kept() {
        let sink = MemorySink::default();
        let options = ReferenceViewOptions::default();
        let refs = vec![
            Reference::new("A", "http://a"),
            Reference::new("", "http://nobody"),
            Reference::new("C", "http://c"),
        ];
        let section = render_references(&refs, true, &options).unwrap();
        let ordinals: Vec<_> = section
            .find_by_class("report-ordinal")
            .iter()
            .map(|el| el.text_content())
            .collect();
        assert_eq!(ordinals, vec!["1", "3"]);
        assert!(sink.events().is_empty());

        report_reference_defects(&refs, &options, &sink);
        assert_eq!(
            sink.events(),
            vec![ViewerEvent::ReferenceSkipped {
                index: 1,
                reason: "missing title"
            }]
        );
    }

    #[test]
    fn placeholder_policy_reports_no_skips() {
        let sink = MemorySink::default();
        let options = ReferenceViewOptions {
            malformed: MalformedPolicy::Placeholder,
            ..ReferenceViewOptions::default()
        };
        let refs = vec![Reference::new("", "http://x").with_credibility(-1.0)];
        report_reference_defects(&refs, &options, &sink);
        assert_eq!(
            sink.events(),
            vec![ViewerEvent::CredibilityOutOfRange {
                index: 0,
                value: -1.0
            }]
        );
    }

    #[test]
    fn all_malformed_omits_section() {
        let options = ReferenceViewOptions::default();
        let refs = vec![Reference::new("A", " ")];
        assert_eq!(render_references(&refs, true, &options), None);
    }

    #[test]
    fn placeholder_policy_renders_unlinked() {
        let options = ReferenceViewOptions {
            malformed: MalformedPolicy::Placeholder,
            ..ReferenceViewOptions::default()
        };
        let refs = vec![Reference::new("", "http://x"), Reference::new("Y", "")];
        let section = render_references(&refs, true, &options).unwrap();
        assert!(section.find_by_class("report-ref").is_empty());
        let titles: Vec<_> = section
            .find_by_class("report-ref-title")
            .iter()
            .map(|el| el.text_content())
            .collect();
        assert_eq!(titles, vec!["Untitled source", "Y"]);
    }

    #[test]
    fn out_of_range_credibility_is_reported_but_rendered() {
        let sink = MemorySink::default();
        let options = ReferenceViewOptions::default();
        let refs = vec![Reference::new("A", "http://a").with_credibility(12.0)];
        let section = render_references(&refs, true, &options).unwrap();
        assert_eq!(
            section.find_by_class("report-credibility")[0].text_content(),
            "(Credibility Score: 12.0)"
        );
        report_reference_defects(&refs, &options, &sink);
        assert_eq!(
            sink.events(),
            vec![ViewerEvent::CredibilityOutOfRange {
                index: 0,
                value: 12.0
            }]
        );
    }
}
