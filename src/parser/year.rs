use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use super::regions::{find_paragraph, find_section, flat_text, ClassMatch};
use super::SourceDocument;

const FIRST_KNOWN_SECTION: &str = "first-known-content-section";
const YEAR_PARAGRAPH: &[&str] = &["ety-sl", "pb-3"];

// ASCII digits only, so every match parses.
static EXACT_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]{3,4})\b").unwrap());
static CENTURY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([0-9]{1,2})(?:st|nd|rd|th)\s+century\b").unwrap());

/// First-use year and whether it was read literally (`true`) or derived from
/// a century phrase (`false`). `year == -1` means nothing was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearResult {
    pub year: i32,
    pub is_accurate: bool,
}

impl YearResult {
    pub const NOT_FOUND: YearResult = YearResult {
        year: -1,
        is_accurate: false,
    };

    fn exact(year: i32) -> Self {
        YearResult {
            year,
            is_accurate: true,
        }
    }

    fn derived(year: i32) -> Self {
        YearResult {
            year,
            is_accurate: false,
        }
    }
}

/// How a year was read out of the first-known-use text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearMatch {
    Exact(i32),
    Century { century: i32, year: i32 },
}

impl YearMatch {
    pub fn result(self) -> YearResult {
        match self {
            YearMatch::Exact(y) => YearResult::exact(y),
            YearMatch::Century { year, .. } => YearResult::derived(year),
        }
    }
}

/// Locate the first-known-use paragraph and parse a year from it.
pub fn extract_year(doc: &SourceDocument, word: &str) -> YearResult {
    let paragraph = find_section(doc.html(), ClassMatch::TokenContains(FIRST_KNOWN_SECTION))
        .and_then(|section| find_paragraph(section, ClassMatch::HasAll(YEAR_PARAGRAPH)));

    let Some(paragraph) = paragraph else {
        warn!("No year found for {}", word);
        return YearResult::NOT_FOUND;
    };

    match parse_year_text(&flat_text(paragraph)) {
        Some(m @ YearMatch::Century { century, year }) => {
            info!("Found century for {}: {} century -> {}", word, ordinal(century), year);
            m.result()
        }
        Some(m) => m.result(),
        None => {
            warn!("No year found for {}", word);
            YearResult::NOT_FOUND
        }
    }
}

/// A standalone 3-4 digit number wins over any century phrase; the century
/// form maps to the first year of that century.
pub fn parse_year_text(text: &str) -> Option<YearMatch> {
    if let Some(caps) = EXACT_YEAR_RE.captures(text) {
        return caps[1].parse::<i32>().ok().map(YearMatch::Exact);
    }

    let caps = CENTURY_RE.captures(text)?;
    let century = caps[1].parse::<i32>().ok()?;
    Some(YearMatch::Century {
        century,
        year: (century - 1) * 100,
    })
}

fn ordinal(n: i32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn page(first_known: &str) -> SourceDocument {
        SourceDocument::parse(&format!(
            r#"<html><body><div class="first-known-content-section">
            <p class="ety-sl pb-3">{}</p></div></body></html>"#,
            first_known
        ))
    }

    #[test]
    fn literal_year_is_accurate() {
        let r = extract_year(&page("circa 1590"), "sonnet");
        assert_eq!(r, YearResult { year: 1590, is_accurate: true });
    }

    #[test]
    fn century_is_derived() {
        let r = extract_year(&page("13th century, in the meaning defined above"), "word");
        assert_eq!(r, YearResult { year: 1200, is_accurate: false });
    }

    #[test]
    fn literal_year_beats_century() {
        let r = extract_year(&page("1590, 13th century"), "word");
        assert_eq!(r, YearResult { year: 1590, is_accurate: true });
        let r = extract_year(&page("13th century, 1590"), "word");
        assert_eq!(r, YearResult { year: 1590, is_accurate: true });
    }

    #[test]
    fn first_literal_year_wins() {
        assert_eq!(parse_year_text("1611 and 1742"), Some(YearMatch::Exact(1611)));
    }

    #[test]
    fn three_digit_year() {
        assert_eq!(parse_year_text("before 950"), Some(YearMatch::Exact(950)));
    }

    #[test]
    fn digit_runs_must_stand_alone() {
        assert_eq!(parse_year_text("ref 12345"), None);
        assert_eq!(parse_year_text("ab1590"), None);
        assert_eq!(parse_year_text("12"), None);
    }

    #[test]
    fn non_ascii_digits_are_not_years() {
        let arabic = "\u{661}\u{665}\u{669}\u{660}";
        assert_eq!(parse_year_text(&format!("{} or 1611", arabic)), Some(YearMatch::Exact(1611)));
        assert_eq!(
            parse_year_text(&format!("{}, 13th century", arabic)),
            Some(YearMatch::Century { century: 13, year: 1200 })
        );
        assert_eq!(parse_year_text(arabic), None);
    }

    #[test]
    fn literal_year_after_non_ascii_digits_beats_century() {
        let r = extract_year(&page("\u{661}\u{665}\u{669}\u{660}, 13th century, 1590"), "w");
        assert_eq!(r, YearResult { year: 1590, is_accurate: true });
    }

    #[test]
    fn century_is_case_insensitive() {
        assert_eq!(
            parse_year_text("21ST Century"),
            Some(YearMatch::Century { century: 21, year: 2000 })
        );
        assert_eq!(
            parse_year_text("1st  century"),
            Some(YearMatch::Century { century: 1, year: 0 })
        );
    }

    #[test]
    fn missing_section_or_paragraph() {
        let no_section = SourceDocument::parse("<html><body><p class=\"ety-sl pb-3\">1590</p></body></html>");
        assert_eq!(extract_year(&no_section, "w"), YearResult::NOT_FOUND);

        let half_classes = SourceDocument::parse(
            r#"<div class="first-known-content-section"><p class="ety-sl">1590</p></div>"#,
        );
        assert_eq!(extract_year(&half_classes, "w"), YearResult::NOT_FOUND);
    }

    #[test]
    fn unparseable_text() {
        let r = extract_year(&page("in the sense of a poem"), "w");
        assert_eq!(r, YearResult::NOT_FOUND);
        assert_eq!(r.year, -1);
    }

    #[test]
    fn nested_markup_is_flattened() {
        let r = extract_year(&page("<span>circa</span> <a href=\"/t\">1<b>5</b>90</a>"), "w");
        assert_eq!(r.year, 1590);
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(22), "22nd");
    }

    #[test]
    fn fixture_page() {
        let html = std::fs::read_to_string("tests/fixtures/sonnet.html").unwrap();
        let r = extract_year(&SourceDocument::parse(&html), "sonnet");
        assert_eq!(r, YearResult { year: 1557, is_accurate: true });
    }
}
