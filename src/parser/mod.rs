pub mod etymology;
pub mod regions;
pub mod year;

use scraper::Html;

use etymology::{extract_etymology, EraLabel, Etymology};
use year::{extract_year, YearResult};

/// A fetched dictionary page, parsed once and read by both extractors.
pub struct SourceDocument {
    html: Html,
}

impl SourceDocument {
    pub fn parse(markup: &str) -> Self {
        SourceDocument {
            html: Html::parse_document(markup),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}

/// The three derived fields for one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordData {
    pub year: i32,
    pub etymology: Etymology,
    pub is_accurate: bool,
}

impl WordData {
    /// Result for a word whose page could not be fetched.
    pub fn unresolved() -> Self {
        WordData {
            year: YearResult::NOT_FOUND.year,
            etymology: Etymology::Era(EraLabel::Unknown),
            is_accurate: false,
        }
    }
}

/// Two-step extraction: year first, then etymology (which may fall back to
/// classifying that year).
pub fn extract_word(doc: &SourceDocument, word: &str) -> WordData {
    let year = extract_year(doc, word);
    let etymology = extract_etymology(doc, year.year);
    WordData {
        year: year.year,
        etymology,
        is_accurate: year.is_accurate,
    }
}

/// Parse raw page markup and extract. The parsed tree is dropped before return.
pub fn process_html(markup: &str, word: &str) -> WordData {
    let doc = SourceDocument::parse(markup);
    extract_word(&doc, word)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn sonnet_page() {
        let d = process_html(&fixture("sonnet"), "sonnet");
        assert_eq!(d.year, 1557);
        assert!(d.is_accurate);
        assert_eq!(
            d.etymology.as_str(),
            "Middle French, from Old Occitan sonet little song"
        );
    }

    #[test]
    fn century_page_with_empty_etymology() {
        let d = process_html(&fixture("century_empty_etym"), "hound");
        assert_eq!(
            d,
            WordData {
                year: 1300,
                etymology: Etymology::Era(EraLabel::Unknown),
                is_accurate: false,
            }
        );
    }

    #[test]
    fn bare_page_is_unresolved() {
        let d = process_html(&fixture("no_sections"), "zzz");
        assert_eq!(d, WordData::unresolved());
    }

    #[test]
    fn modern_word_without_etymology() {
        let d = process_html(&fixture("modern_no_etym"), "selfie");
        assert_eq!(d.year, 2002);
        assert!(d.is_accurate);
        assert_eq!(d.etymology, Etymology::Era(EraLabel::ModernEnglish));
    }

    #[test]
    fn extraction_is_idempotent() {
        let doc = SourceDocument::parse(&fixture("sonnet"));
        assert_eq!(extract_word(&doc, "sonnet"), extract_word(&doc, "sonnet"));
    }
}
