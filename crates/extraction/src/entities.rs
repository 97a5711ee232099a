//! Rule-based named-entity tagging.
//!
//! Tags labeled spans in free text using compiled regex patterns and
//! capitalization heuristics. The label vocabulary is open: the resolver
//! only acts on `Percent`, `Org` and `Date`, and ignores everything else.
//!
//! Output is ordered by span position in the source text. Overlapping
//! candidates are resolved in favor of the earlier span, then the longer
//! one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Category label attached to a tagged span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    /// A percentage span, e.g. `20%`.
    Percent,
    /// An organization-like name.
    Org,
    /// A calendar-date-like span.
    Date,
    /// A monetary amount.
    Money,
    /// A person introduced by name.
    Person,
}

/// A labeled span of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// The matched span, verbatim.
    pub text: String,
    /// Category label.
    pub label: EntityLabel,
    /// Byte offset of the span in the source text.
    pub start: usize,
}

/// Named-entity tagger over free text.
///
/// Implementations never fail: empty or non-linguistic input degrades to an
/// empty vector.
pub trait EntityTagger: Send + Sync {
    /// Tag `text`, returning labeled spans in left-to-right scan order.
    fn tag(&self, text: &str) -> Vec<Entity>;
}

static PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?%").unwrap());

static MONEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[$€£₹]\s?\d[\d,]*(?:\.\d{1,2})?|\b\d[\d,]*(?:\.\d{1,2})?\s*(?:dollars?|euros?|pounds?|rupees?)\b")
        .unwrap()
});

const MONTHS: &str = r"Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?";

/// Month-first dates: "March 5, 2024", "Mar. 5th", year optional.
static MONTH_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{MONTHS})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?\b(?:,?\s*\d{{4}})?"
    ))
    .unwrap()
});

/// Day-first dates: "5 March 2024", year optional.
static DAY_FIRST_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{MONTHS})\b\.?(?:,?\s*\d{{4}})?"
    ))
    .unwrap()
});

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap());

static SLASH_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").unwrap());

/// Name introductions: "my name is Priya Sharma", "I am John".
static PERSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:my\s+name\s+is|i\s+am|this\s+is)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)")
        .unwrap()
});

/// Runs of capitalized words, the raw material for org detection.
static CAP_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Z][A-Za-z0-9&'-]*(?:\s+[A-Z][A-Za-z0-9&'-]*)*").unwrap()
});

/// Corporate suffixes that mark a capitalized run as an organization.
const ORG_SUFFIXES: &[&str] = &[
    "Corp", "Corp.", "Corporation", "Inc", "Inc.", "Ltd", "Ltd.", "LLC", "Co", "Co.", "Company",
    "Group", "Holdings", "Bank", "Store", "Stores", "Shop", "Mart", "Outlet", "Supermarket",
];

/// Capitalized-by-position words dropped from the front of a run.
const LEADING_STOP_WORDS: &[&str] = &[
    "The", "A", "An", "This", "That", "These", "Those", "Get", "Buy", "Save", "Use", "Grab",
    "Hurry", "Visit", "Check", "Order", "Claim", "Redeem", "Enjoy", "Take", "Our", "Your", "New",
    "Free", "Limited", "Only", "Now",
];

const MONTH_WORDS: &[&str] = &[
    "Jan", "January", "Feb", "February", "Mar", "March", "Apr", "April", "May", "Jun", "June",
    "Jul", "July", "Aug", "August", "Sep", "Sept", "September", "Oct", "October", "Nov",
    "November", "Dec", "December",
];

const WEEKDAY_WORDS: &[&str] = &[
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

/// Pattern-and-heuristic entity tagger.
///
/// Percent, money, date and person spans come from compiled patterns;
/// organizations from capitalized-run heuristics (corporate suffix, or a
/// multi-word run that is not date vocabulary).
#[derive(Debug, Default)]
pub struct RuleTagger;

impl RuleTagger {
    pub fn new() -> Self {
        Self
    }

    fn tag_pattern(text: &str, pattern: &Regex, label: EntityLabel, out: &mut Vec<Entity>) {
        for m in pattern.find_iter(text) {
            out.push(Entity {
                text: m.as_str().to_string(),
                label,
                start: m.start(),
            });
        }
    }

    fn tag_persons(text: &str, out: &mut Vec<Entity>) {
        for caps in PERSON.captures_iter(text) {
            if let Some(name) = caps.get(1) {
                out.push(Entity {
                    text: name.as_str().to_string(),
                    label: EntityLabel::Person,
                    start: name.start(),
                });
            }
        }
    }

    fn tag_orgs(text: &str, out: &mut Vec<Entity>) {
        for m in CAP_RUN.find_iter(text) {
            let mut tokens = tokens_with_offsets(m.as_str());

            // Date vocabulary means the run is a date span, not a name.
            if tokens
                .iter()
                .any(|(_, t)| MONTH_WORDS.contains(t) || WEEKDAY_WORDS.contains(t))
            {
                continue;
            }

            while let Some((_, first)) = tokens.first() {
                if LEADING_STOP_WORDS.contains(first) {
                    tokens.remove(0);
                } else {
                    break;
                }
            }
            let Some(&(first_off, _)) = tokens.first() else {
                continue;
            };
            let start = m.start() + first_off;

            let qualifies = match tokens.as_slice() {
                [] => false,
                // A lone capitalized word at sentence start is capitalized
                // by position; it only counts mid-sentence.
                [(_, tok)] => tok.len() > 1 && !is_sentence_start(text, start),
                _ => true,
            } || tokens
                .last()
                .is_some_and(|(_, last)| ORG_SUFFIXES.contains(last));
            if !qualifies {
                continue;
            }

            let (last_off, last_tok) = tokens[tokens.len() - 1];
            let span = &m.as_str()[first_off..last_off + last_tok.len()];
            out.push(Entity {
                text: span.to_string(),
                label: EntityLabel::Org,
                start,
            });
        }
    }
}

impl EntityTagger for RuleTagger {
    fn tag(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();
        Self::tag_pattern(text, &PERCENT, EntityLabel::Percent, &mut entities);
        Self::tag_pattern(text, &MONEY, EntityLabel::Money, &mut entities);
        Self::tag_pattern(text, &MONTH_DATE, EntityLabel::Date, &mut entities);
        Self::tag_pattern(text, &DAY_FIRST_DATE, EntityLabel::Date, &mut entities);
        Self::tag_pattern(text, &ISO_DATE, EntityLabel::Date, &mut entities);
        Self::tag_pattern(text, &SLASH_DATE, EntityLabel::Date, &mut entities);
        Self::tag_persons(text, &mut entities);
        Self::tag_orgs(text, &mut entities);

        // Scan order: earlier span first, longer span on equal start.
        entities.sort_by_key(|e| (e.start, std::cmp::Reverse(e.text.len())));
        remove_overlaps(&mut entities);
        entities
    }
}

/// Drop spans overlapping an already-kept earlier span.
fn remove_overlaps(entities: &mut Vec<Entity>) {
    let mut end = 0usize;
    let mut first = true;
    entities.retain(|e| {
        if first || e.start >= end {
            first = false;
            end = e.start + e.text.len();
            true
        } else {
            false
        }
    });
}

fn tokens_with_offsets(run: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut idx = 0;
    for tok in run.split_whitespace() {
        let pos = run[idx..].find(tok).unwrap_or(0) + idx;
        out.push((pos, tok));
        idx = pos + tok.len();
    }
    out
}

fn is_sentence_start(text: &str, pos: usize) -> bool {
    text[..pos]
        .trim_end()
        .chars()
        .last()
        .map_or(true, |c| matches!(c, '.' | '!' | '?'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels_of(text: &str) -> Vec<(String, EntityLabel)> {
        RuleTagger::new()
            .tag(text)
            .into_iter()
            .map(|e| (e.text, e.label))
            .collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(RuleTagger::new().tag("").is_empty());
        assert!(RuleTagger::new().tag("!!! ??? 123").is_empty());
    }

    #[test]
    fn tags_percent_spans() {
        let tags = labels_of("Get 20% off, or even 50% today");
        assert_eq!(
            tags.iter()
                .filter(|(_, l)| *l == EntityLabel::Percent)
                .map(|(t, _)| t.as_str())
                .collect::<Vec<_>>(),
            vec!["20%", "50%"]
        );
    }

    #[test]
    fn tags_org_with_corporate_suffix() {
        let tags = labels_of("shop at Acme Corp now");
        assert!(tags.contains(&("Acme Corp".to_string(), EntityLabel::Org)));
    }

    #[test]
    fn tags_multiword_org_without_suffix() {
        let tags = labels_of("available only at Big Bazaar outlets");
        assert!(tags.contains(&("Big Bazaar".to_string(), EntityLabel::Org)));
    }

    #[test]
    fn sentence_start_word_is_not_an_org() {
        assert!(labels_of("Save money today.").is_empty());
        assert!(labels_of("Hurry! Offer ends soon.")
            .iter()
            .all(|(_, l)| *l != EntityLabel::Org));
    }

    #[test]
    fn leading_stop_word_is_dropped_from_run() {
        let tags = labels_of("Visit Acme Corp for deals");
        assert!(tags.contains(&("Acme Corp".to_string(), EntityLabel::Org)));
    }

    #[test]
    fn month_runs_are_dates_not_orgs() {
        let tags = labels_of("valid until March 5, 2024");
        assert_eq!(tags, vec![("March 5, 2024".to_string(), EntityLabel::Date)]);
    }

    #[test]
    fn tags_numeric_dates() {
        let tags = labels_of("expires 2024-03-05 or 3/5/24");
        assert_eq!(
            tags,
            vec![
                ("2024-03-05".to_string(), EntityLabel::Date),
                ("3/5/24".to_string(), EntityLabel::Date),
            ]
        );
    }

    #[test]
    fn tags_money_and_person() {
        let tags = labels_of("my name is Priya Sharma and I paid $49.99");
        assert!(tags.contains(&("Priya Sharma".to_string(), EntityLabel::Person)));
        assert!(tags.contains(&("$49.99".to_string(), EntityLabel::Money)));
    }

    #[test]
    fn output_is_in_scan_order() {
        let entities = RuleTagger::new().tag("50% off at Acme Corp until March 5, 2024");
        let starts: Vec<usize> = entities.iter().map(|e| e.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
        assert_eq!(entities[0].label, EntityLabel::Percent);
    }

    #[test]
    fn day_first_date_is_one_span() {
        let entities = RuleTagger::new().tag("ends 5 March 2024");
        let dates: Vec<&str> = entities
            .iter()
            .filter(|e| e.label == EntityLabel::Date)
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(dates, vec!["5 March 2024"]);
    }

    #[test]
    fn overlapping_candidates_yield_one_span() {
        // The introduced name is both a person candidate and a capitalized
        // run; only one entity survives for the span.
        let entities = RuleTagger::new().tag("my name is Priya Sharma");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].label, EntityLabel::Person);
        assert_eq!(entities[0].text, "Priya Sharma");
    }
}
