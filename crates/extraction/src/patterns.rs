//! Stateless pattern extractors: URL detection and calendar date scanning.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

/// First `http://` or `https://` URL in `text`, verbatim.
///
/// A bare scheme prefix with nothing after it does not match, and a URL
/// never spans whitespace.
pub fn find_link(text: &str) -> Option<&str> {
    LINK.find(text).map(|m| m.as_str())
}

const MONTHS: &str = r"Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?";

static ISO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

/// "March 5, 2024", "Mar. 5th 2024" — the year is required; a month-day
/// span without a year names no calendar date.
static MONTH_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s*(\d{{4}})\b"
    ))
    .unwrap()
});

/// "5 March 2024", "5th of March 2024".
static DAY_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?(?:\s+of)?\s+({MONTHS})\b\.?,?\s*(\d{{4}})\b"
    ))
    .unwrap()
});

/// Month-first slash dates, two-digit years mapping to 20xx.
static SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})\b").unwrap());

/// Whole-text scanner for calendar-date substrings.
///
/// Recognizes ISO, month-name and slash-numeric forms, parses them with
/// `chrono`, and yields the results in order of appearance. Substrings that
/// look like dates but name no real day ("February 30, 2024") are skipped.
#[derive(Debug, Default)]
pub struct DateFinder;

impl DateFinder {
    pub fn new() -> Self {
        Self
    }

    /// All calendar dates found in `text`, in order of appearance.
    pub fn find_dates(&self, text: &str) -> Vec<NaiveDate> {
        let mut found: Vec<(usize, usize, NaiveDate)> = Vec::new();

        for caps in ISO.captures_iter(text) {
            let m = caps.get(0).unwrap();
            if let Some(date) = ymd(&caps[1], &caps[2], &caps[3]) {
                found.push((m.start(), m.end(), date));
            }
        }
        for caps in MONTH_FIRST.captures_iter(text) {
            let m = caps.get(0).unwrap();
            if let Some(date) = month_name_ymd(&caps[3], &caps[1], &caps[2]) {
                found.push((m.start(), m.end(), date));
            }
        }
        for caps in DAY_FIRST.captures_iter(text) {
            let m = caps.get(0).unwrap();
            if let Some(date) = month_name_ymd(&caps[3], &caps[2], &caps[1]) {
                found.push((m.start(), m.end(), date));
            }
        }
        for caps in SLASH.captures_iter(text) {
            let m = caps.get(0).unwrap();
            let year = expand_year(&caps[3]);
            if let Some(date) = ymd(&year, &caps[1], &caps[2]) {
                found.push((m.start(), m.end(), date));
            }
        }

        found.sort_by_key(|&(start, end, _)| (start, std::cmp::Reverse(end)));

        let mut dates = Vec::with_capacity(found.len());
        let mut last_end = 0usize;
        let mut first = true;
        for (start, end, date) in found {
            if first || start >= last_end {
                first = false;
                last_end = end;
                dates.push(date);
            }
        }
        dates
    }
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn month_name_ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let month = month_number(month)?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    match prefix.as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

fn expand_year(digits: &str) -> String {
    if digits.len() == 2 {
        format!("20{digits}")
    } else {
        digits.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn link_first_occurrence_wins() {
        let text = "see https://a.example/one and https://b.example/two";
        assert_eq!(find_link(text), Some("https://a.example/one"));
    }

    #[test]
    fn link_requires_something_after_the_scheme() {
        assert_eq!(find_link("the prefix http:// is not a link"), None);
        assert_eq!(find_link("no links here"), None);
    }

    #[test]
    fn link_never_spans_whitespace() {
        assert_eq!(
            find_link("go to http://acme.example/deal now"),
            Some("http://acme.example/deal")
        );
    }

    #[test]
    fn finds_iso_dates() {
        let finder = DateFinder::new();
        assert_eq!(
            finder.find_dates("expires 2024-03-05"),
            vec![date(2024, 3, 5)]
        );
    }

    #[test]
    fn finds_month_name_dates() {
        let finder = DateFinder::new();
        assert_eq!(
            finder.find_dates("before March 5, 2024!"),
            vec![date(2024, 3, 5)]
        );
        assert_eq!(
            finder.find_dates("before March 5th 2024"),
            vec![date(2024, 3, 5)]
        );
        assert_eq!(
            finder.find_dates("valid until 5th of March 2024"),
            vec![date(2024, 3, 5)]
        );
    }

    #[test]
    fn finds_slash_dates_month_first() {
        let finder = DateFinder::new();
        assert_eq!(finder.find_dates("by 3/5/2024"), vec![date(2024, 3, 5)]);
        assert_eq!(finder.find_dates("by 3/5/24"), vec![date(2024, 3, 5)]);
    }

    #[test]
    fn skips_impossible_calendar_dates() {
        let finder = DateFinder::new();
        assert!(finder.find_dates("February 30, 2024").is_empty());
        assert!(finder.find_dates("13/13/2024").is_empty());
    }

    #[test]
    fn month_day_without_year_is_not_a_date() {
        let finder = DateFinder::new();
        assert!(finder.find_dates("ends March 5").is_empty());
    }

    #[test]
    fn dates_come_back_in_order_of_appearance() {
        let finder = DateFinder::new();
        assert_eq!(
            finder.find_dates("from March 5, 2024 until 2024-04-01"),
            vec![date(2024, 3, 5), date(2024, 4, 1)]
        );
    }

    #[test]
    fn no_dates_yields_empty() {
        assert!(DateFinder::new().find_dates("Save money today.").is_empty());
        assert!(DateFinder::new().find_dates("").is_empty());
    }
}
