use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").unwrap());
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Predicate over the whitespace-split tokens of an element's `class` attribute.
#[derive(Debug, Clone, Copy)]
pub enum ClassMatch<'a> {
    /// Some token contains the needle as a substring.
    TokenContains(&'a str),
    /// Every listed token is present, compared exactly.
    HasAll(&'a [&'a str]),
    /// Some token equals the needle.
    Token(&'a str),
}

impl ClassMatch<'_> {
    pub fn matches(&self, el: &ElementRef) -> bool {
        let mut classes = el.value().classes();
        match *self {
            ClassMatch::TokenContains(needle) => classes.any(|c| c.contains(needle)),
            ClassMatch::Token(needle) => classes.any(|c| c == needle),
            ClassMatch::HasAll(required) => {
                let tokens: Vec<&str> = classes.collect();
                !required.is_empty() && required.iter().all(|r| tokens.contains(r))
            }
        }
    }
}

/// First block-level container (`div`) in document order matching `pred`.
pub fn find_section<'a>(doc: &'a Html, pred: ClassMatch) -> Option<ElementRef<'a>> {
    doc.select(&DIV).find(|el| pred.matches(el))
}

/// First paragraph (`p`) below `region` matching `pred`.
pub fn find_paragraph<'a>(region: ElementRef<'a>, pred: ClassMatch) -> Option<ElementRef<'a>> {
    region.select(&PARAGRAPH).find(|el| pred.matches(el))
}

/// All descendant text concatenated as-is, markup stripped.
pub fn flat_text(el: ElementRef) -> String {
    el.text().collect()
}

/// Descendant text with tag boundaries and whitespace runs collapsed to a
/// single space, trimmed at both ends.
pub fn normalized_text(el: ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", body))
    }

    #[test]
    fn section_matches_token_substring() {
        let d = doc(r#"<div class="mw first-known-content-section-wrap">x</div>"#);
        assert!(find_section(&d, ClassMatch::TokenContains("first-known-content-section")).is_some());
    }

    #[test]
    fn section_ignores_other_tags() {
        let d = doc(r#"<section class="first-known-content-section">x</section>"#);
        assert!(find_section(&d, ClassMatch::TokenContains("first-known-content-section")).is_none());
    }

    #[test]
    fn has_all_needs_every_token() {
        let d = doc(
            r#"<div class="s"><p class="ety-sl">a</p><p class="pb-3 ety-sl extra">b</p></div>"#,
        );
        let region = find_section(&d, ClassMatch::Token("s")).unwrap();
        let p = find_paragraph(region, ClassMatch::HasAll(&["ety-sl", "pb-3"])).unwrap();
        assert_eq!(flat_text(p), "b");
    }

    #[test]
    fn token_match_is_exact() {
        let d = doc(r#"<div class="s"><p class="etym">a</p><p class="et">b</p></div>"#);
        let region = find_section(&d, ClassMatch::Token("s")).unwrap();
        let p = find_paragraph(region, ClassMatch::Token("et")).unwrap();
        assert_eq!(flat_text(p), "b");
    }

    #[test]
    fn paragraph_lookup_stays_inside_region() {
        let d = doc(r#"<p class="et">outside</p><div class="s"></div>"#);
        let region = find_section(&d, ClassMatch::Token("s")).unwrap();
        assert!(find_paragraph(region, ClassMatch::Token("et")).is_none());
    }

    #[test]
    fn normalized_text_collapses_boundaries() {
        let d = doc("<div class=\"s\"><p class=\"et\">  Middle <em>English</em>,\n\tfrom  Old French </p></div>");
        let region = find_section(&d, ClassMatch::Token("s")).unwrap();
        let p = find_paragraph(region, ClassMatch::Token("et")).unwrap();
        // tag boundaries become a space, same as whitespace runs
        assert_eq!(normalized_text(p), "Middle English , from Old French");
    }

    #[test]
    fn empty_requirement_list_never_matches() {
        let d = doc(r#"<div class="s"><p class="et">a</p></div>"#);
        let region = find_section(&d, ClassMatch::Token("s")).unwrap();
        assert!(find_paragraph(region, ClassMatch::HasAll(&[])).is_none());
    }
}
