use std::fmt;

use tracing::debug;

use super::regions::{find_paragraph, find_section, normalized_text, ClassMatch};
use super::SourceDocument;

const ETYMOLOGY_SECTION: &str = "etymology-content-section";
const ETYMOLOGY_PARAGRAPH: &str = "et";

/// Era label used when a page carries no etymology text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraLabel {
    ModernEnglish,
    EarlyModernEnglish,
    Unknown,
}

impl EraLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EraLabel::ModernEnglish => "modern english",
            EraLabel::EarlyModernEnglish => "early modern english",
            EraLabel::Unknown => "unknown",
        }
    }
}

/// Either literal etymology text from the page or a year-based era label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Etymology {
    Text(String),
    Era(EraLabel),
}

impl Etymology {
    pub fn as_str(&self) -> &str {
        match self {
            Etymology::Text(t) => t,
            Etymology::Era(label) => label.as_str(),
        }
    }
}

impl fmt::Display for Etymology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Year-based era for a word. 1450 itself is `Unknown`; -1 is `Unknown`.
pub fn classify(year: i32) -> EraLabel {
    if year >= 1800 {
        EraLabel::ModernEnglish
    } else if year > 1450 {
        EraLabel::EarlyModernEnglish
    } else {
        EraLabel::Unknown
    }
}

/// Etymology paragraph text, falling back to `classify(year)` when the
/// section, the paragraph, or its text is missing.
pub fn extract_etymology(doc: &SourceDocument, year: i32) -> Etymology {
    match etymology_text(doc) {
        Some(text) => Etymology::Text(text),
        None => {
            let label = classify(year);
            debug!("No etymology text, classified {} as {}", year, label.as_str());
            Etymology::Era(label)
        }
    }
}

fn etymology_text(doc: &SourceDocument) -> Option<String> {
    let section = find_section(doc.html(), ClassMatch::TokenContains(ETYMOLOGY_SECTION))?;
    let paragraph = find_paragraph(section, ClassMatch::Token(ETYMOLOGY_PARAGRAPH))?;
    Some(normalized_text(paragraph)).filter(|t| !t.is_empty())
}

// ── Tests ──
