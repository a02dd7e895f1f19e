//! Numbered conclusions shown below the report.

use crate::ir::styled::{Element, StyledNode};

/// Render `conclusions` as numbered cards in array order.
///
/// Returns `None` for an empty list: the section is omitted, not shown empty.
pub fn render_conclusions(conclusions: &[String], heading: &str) -> Option<StyledNode> {
    if conclusions.is_empty() {
        return None;
    }

    let cards = conclusions.iter().enumerate().map(|(index, conclusion)| {
        let card = Element::new("div")
            .class("report-card")
            .child(
                Element::new("span")
                    .class("report-ordinal")
                    .text((index + 1).to_string()),
            )
            .child(
                Element::new("p")
                    .class("report-conclusion")
                    .text(conclusion.as_str()),
            );
        StyledNode::from(card)
    });

    Some(
        Element::new("section")
            .class("report-conclusions")
            .child(
                Element::new("h2")
                    .class("report-section-title")
                    .text(heading),
            )
            .child(Element::new("div").class("report-cards").children(cards))
            .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_omits_section() {
        assert_eq!(render_conclusions(&[], "主要结论"), None);
    }

    #[test]
    fn items_are_numbered_in_order() {
        let conclusions = vec![
            "Market grows".to_string(),
            "Costs fall".to_string(),
            "Market grows".to_string(),
        ];
        let section = render_conclusions(&conclusions, "Key findings").unwrap();

        let ordinals: Vec<_> = section
            .find_by_class("report-ordinal")
            .iter()
            .map(|el| el.text_content())
            .collect();
        assert_eq!(ordinals, vec!["1", "2", "3"]);

        // No dedup: the repeated conclusion is kept.
        let texts: Vec<_> = section
            .find_by_class("report-conclusion")
            .iter()
            .map(|el| el.text_content())
            .collect();
        assert_eq!(texts, conclusions);
        assert!(section.text_content().starts_with("Key findings"));
    }
}
