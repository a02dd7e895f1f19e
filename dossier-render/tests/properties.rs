//! Property tests: determinism and order preservation.

use dossier_render::detect::detect;
use dossier_render::model::Reference;
use dossier_render::render::render_document;
use dossier_render::views::{format_credibility, render_conclusions, render_references, ReferenceViewOptions};
use proptest::prelude::*;

fn markdownish() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Z0-9 ]{0,20}".prop_map(|s| s),
            Just("# ".to_string()),
            Just("## ".to_string()),
            Just("- ".to_string()),
            Just("1. ".to_string()),
            Just("> ".to_string()),
            Just("*".to_string()),
            Just("`".to_string()),
            Just("|".to_string()),
            Just("\n".to_string()),
            Just("\n\n".to_string()),
            Just("参考文献".to_string()),
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn render_is_deterministic(text in markdownish()) {
        let first = render_document(&text).ok();
        let second = render_document(&text).ok();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn detect_is_deterministic(text in markdownish()) {
        prop_assert_eq!(detect(&text), detect(&text));
    }

    #[test]
    fn appending_a_marker_always_suppresses(text in markdownish()) {
        let with_marker = format!("{text}\n## references\n");
        prop_assert!(!detect(&with_marker));
    }

    #[test]
    fn reference_ordinals_follow_input_order(titles in prop::collection::vec("[a-z]{1,8}", 1..12)) {
        let refs: Vec<Reference> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| Reference::new(title.as_str(), format!("https://example.org/{i}")))
            .collect();
        let section = render_references(&refs, true, &ReferenceViewOptions::default()).unwrap();

        let shown: Vec<String> = section
            .find_by_class("report-ref-title")
            .iter()
            .map(|el| el.text_content())
            .collect();
        prop_assert_eq!(&shown, &titles);

        let ordinals: Vec<String> = section
            .find_by_class("report-ordinal")
            .iter()
            .map(|el| el.text_content())
            .collect();
        let expected: Vec<String> = (1..=titles.len()).map(|n| n.to_string()).collect();
        prop_assert_eq!(ordinals, expected);
    }

    #[test]
    fn conclusions_render_one_card_each(items in prop::collection::vec(".{0,12}", 0..10)) {
        match render_conclusions(&items, "Findings") {
            None => prop_assert!(items.is_empty()),
            Some(section) => prop_assert_eq!(section.find_by_class("report-card").len(), items.len()),
        }
    }

    #[test]
    fn credibility_has_one_decimal(value in 0.0f64..=10.0) {
        let shown = format_credibility(value);
        let decimals = shown.split('.').nth(1).map(str::len);
        prop_assert_eq!(decimals, Some(1));
    }

    #[test]
    fn credibility_ties_round_up(quarters in 0u32..=40) {
        let value = f64::from(quarters) * 0.25;
        let tenths = (quarters * 25 + 5) / 10;
        prop_assert_eq!(format_credibility(value), format!("{}.{}", tenths / 10, tenths % 10));
    }
}
