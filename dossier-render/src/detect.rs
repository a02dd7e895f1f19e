//! Reference-section detection
//!
//! Reports generated by the backend sometimes carry their own references chapter
//! ("## 9. 参考文献", "# References", ...). When they do, the separately supplied
//! reference list would be a duplicate, so the viewer suppresses it.
//!
//! The decision is made from the raw report text. The vocabulary is data: a
//! [`MarkerSet`] is a list of [`MarkerRule`]s (language × term × heading levels),
//! normally loaded from configuration. Two strictness modes exist:
//!
//! - [`Strictness::Substring`]: lower-case the text and look for any expanded
//!   marker (`"## references"`, `"# 9. 参考文献"`, bare `"参考资料"`, ...) anywhere.
//!   Cheap, and knowingly over-eager: a sentence mentioning "参考资料" counts.
//! - [`Strictness::Heading`]: parse the text and only accept heading nodes whose
//!   text, minus one of the configured numbering prefixes, equals a term.
//!
//! The result is memoized by [`GatingFlag`], which starts out suppressed and only
//! re-evaluates when the report text changes.

use crate::formats::markdown::parse_markdown;
use dossier_config::{DetectionConfig, MarkerRuleConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Reverse;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub use dossier_config::Strictness;

/// One vocabulary entry: `term` in `language`, recognised as a heading at
/// `heading_levels`, optionally numbered, optionally anywhere in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRule {
    pub language: String,
    pub term: String,
    pub heading_levels: Vec<u8>,
    pub numbered: bool,
    pub bare: bool,
}

impl MarkerRule {
    pub fn heading(language: &str, term: &str, levels: &[u8]) -> Self {
        MarkerRule {
            language: language.to_string(),
            term: term.to_lowercase(),
            heading_levels: levels.to_vec(),
            numbered: false,
            bare: false,
        }
    }

    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    pub fn bare(mut self) -> Self {
        self.bare = true;
        self
    }

    fn from_config(config: &MarkerRuleConfig) -> Self {
        MarkerRule {
            language: config.language.clone(),
            term: config.term.to_lowercase(),
            heading_levels: config.heading_levels.clone(),
            numbered: config.numbered,
            bare: config.bare,
        }
    }
}

/// The full marker vocabulary plus its literal expansion.
#[derive(Debug, Clone)]
pub struct MarkerSet {
    rules: Vec<MarkerRule>,
    numbering_prefixes: Vec<String>,
    markers: Vec<String>,
    numbering: Option<Regex>,
}

impl MarkerSet {
    pub fn new(rules: Vec<MarkerRule>, numbering_prefixes: Vec<String>) -> Self {
        let markers = expand(&rules, &numbering_prefixes);
        let numbering = numbering_pattern(&numbering_prefixes);
        MarkerSet {
            rules,
            numbering_prefixes,
            markers,
            numbering,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        MarkerSet::new(
            config.markers.iter().map(MarkerRule::from_config).collect(),
            config.numbering_prefixes.clone(),
        )
    }

    pub fn rules(&self) -> &[MarkerRule] {
        &self.rules
    }

    pub fn numbering_prefixes(&self) -> &[String] {
        &self.numbering_prefixes
    }

    /// Literal lower-case markers used by substring matching, in rule order.
    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Remove a leading numbering prefix from a lower-cased heading title.
    /// Returns the rest and whether a prefix was present.
    pub fn strip_numbering<'a>(&self, title: &'a str) -> (&'a str, bool) {
        let title = title.trim();
        match self.numbering.as_ref().and_then(|re| re.find(title)) {
            Some(found) => (title[found.end()..].trim_start(), true),
            None => (title, false),
        }
    }
}

// The compiled numbering pattern is derived from the prefixes.
impl PartialEq for MarkerSet {
    fn eq(&self, other: &Self) -> bool {
        self.rules == other.rules && self.numbering_prefixes == other.numbering_prefixes
    }
}

impl Eq for MarkerSet {}

impl Default for MarkerSet {
    /// English "references" and the Chinese 参考文献 / 参考资料 / 引用资料 at
    /// heading levels 1-3, numbered with "9. ".
    fn default() -> Self {
        MarkerSet::new(
            vec![
                MarkerRule::heading("en", "references", &[1, 2, 3]).numbered(),
                MarkerRule::heading("zh", "参考文献", &[1, 2, 3]).numbered(),
                MarkerRule::heading("zh", "参考资料", &[1, 2, 3]).numbered().bare(),
                MarkerRule::heading("zh", "引用资料", &[1, 2, 3]).numbered().bare(),
            ],
            vec!["9. ".to_string()],
        )
    }
}

/// Anchored alternation of the configured prefixes, longest first, with the
/// trailing whitespace made optional.
fn numbering_pattern(prefixes: &[String]) -> Option<Regex> {
    let mut alternatives: Vec<String> = prefixes
        .iter()
        .map(|prefix| prefix.trim().to_lowercase())
        .filter(|prefix| !prefix.is_empty())
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    alternatives.sort_by_key(|prefix| Reverse(prefix.len()));
    let pattern = alternatives
        .iter()
        .map(|prefix| regex::escape(prefix))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"^(?:{pattern})\s*")).ok()
}

fn expand(rules: &[MarkerRule], prefixes: &[String]) -> Vec<String> {
    let mut markers = Vec::new();
    for rule in rules {
        for level in &rule.heading_levels {
            let hashes = "#".repeat(usize::from(*level));
            markers.push(format!("{hashes} {}", rule.term));
            if rule.numbered {
                for prefix in prefixes {
                    markers.push(format!("{hashes} {}{}", prefix.to_lowercase(), rule.term));
                }
            }
        }
        if rule.bare {
            markers.push(rule.term.clone());
        }
    }
    markers
}

/// Outcome of one detector evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// The marker (substring mode) or heading text (heading mode) that matched.
    pub marker: Option<String>,
}

impl Detection {
    pub fn embedded_section_found(&self) -> bool {
        self.marker.is_some()
    }

    /// Whether the separately supplied reference list should be shown.
    pub fn needs_separate_section(&self) -> bool {
        self.marker.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceDetector {
    markers: MarkerSet,
    strictness: Strictness,
}

impl ReferenceDetector {
    pub fn new(markers: MarkerSet, strictness: Strictness) -> Self {
        ReferenceDetector {
            markers,
            strictness,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        ReferenceDetector::new(MarkerSet::from_config(config), config.strictness)
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn evaluate(&self, text: &str) -> Detection {
        let marker = match self.strictness {
            Strictness::Substring => self.find_substring(text),
            Strictness::Heading => self.find_heading(text),
        };
        Detection { marker }
    }

    pub fn needs_separate_section(&self, text: &str) -> bool {
        self.evaluate(text).needs_separate_section()
    }

    /// The longest marker contained in the text, so `"## references"` wins
    /// over the `"# references"` it contains. Ties go to rule order.
    fn find_substring(&self, text: &str) -> Option<String> {
        let lowered = text.to_lowercase();
        self.markers
            .markers()
            .iter()
            .filter(|marker| lowered.contains(marker.as_str()))
            .min_by_key(|marker| Reverse(marker.len()))
            .cloned()
    }

    fn find_heading(&self, text: &str) -> Option<String> {
        let doc = parse_markdown(text);
        let found = doc.headings().find_map(|(level, heading)| {
            let raw = heading.plain_text().trim().to_lowercase();
            let (title, was_numbered) = self.markers.strip_numbering(&raw);

            self.markers
                .rules()
                .iter()
                .any(|rule| {
                    rule.heading_levels.contains(&level)
                        && rule.term == title
                        && (!was_numbered || rule.numbered)
                })
                .then(|| raw.clone())
        });
        found
    }
}

/// Decide with the default marker set and substring matching whether the
/// separate reference list should be shown for `text`.
pub fn detect(text: &str) -> bool {
    static DEFAULT: Lazy<ReferenceDetector> = Lazy::new(ReferenceDetector::default);
    DEFAULT.needs_separate_section(text)
}

/// Memoized gating flag for the separate reference list.
///
/// Starts suppressed: until the current text has been checked, a duplicate list
/// is never shown. Empty text is never evaluated and leaves the value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatingFlag {
    show_references: bool,
    evaluated: Option<u64>,
}

impl GatingFlag {
    pub fn show_references(&self) -> bool {
        self.show_references
    }

    /// Whether `text` differs from the text the current value was computed for.
    pub fn is_stale(&self, text: &str) -> bool {
        !text.trim().is_empty() && self.evaluated != Some(digest(text))
    }

    /// Re-evaluate for `text` if it changed. Returns the detection when one ran.
    pub fn observe(&mut self, text: Option<&str>, detector: &ReferenceDetector) -> Option<Detection> {
        let text = text.filter(|text| !text.trim().is_empty())?;
        let key = digest(text);
        if self.evaluated == Some(key) {
            return None;
        }
        let detection = detector.evaluate(text);
        self.show_references = detection.needs_separate_section();
        self.evaluated = Some(key);
        Some(detection)
    }

    /// Back to the suppressed default.
    pub fn reset(&mut self) {
        *self = GatingFlag::default();
    }
}

fn digest(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}
