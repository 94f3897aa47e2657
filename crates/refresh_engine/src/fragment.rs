use refresh_core::LookupPolicy;
use scraper::{ElementRef, Html};

/// A parsed refresh response, full document or bare fragment.
pub struct ResponseDocument {
    html: Html,
}

impl ResponseDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_fragment(body),
        }
    }

    /// First element with `id` in document order, under the given policy.
    pub fn find(&self, id: &str, policy: LookupPolicy) -> Option<ElementRef<'_>> {
        self.html
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find_map(|top| {
                // `descendants` yields the top-level element first.
                let mut candidates = top.descendants().filter_map(ElementRef::wrap);
                match policy {
                    LookupPolicy::Inclusive => candidates.find(|el| el.value().id() == Some(id)),
                    LookupPolicy::DescendantsOnly => candidates
                        .skip(1)
                        .find(|el| el.value().id() == Some(id)),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use refresh_core::LookupPolicy;

    use super::ResponseDocument;

    #[test]
    fn inclusive_matches_top_level_element() {
        let doc = ResponseDocument::parse(r#"<div id="balances"><p>42</p></div>"#);
        let found = doc.find("balances", LookupPolicy::Inclusive).unwrap();
        assert_eq!(found.inner_html(), "<p>42</p>");
        assert!(doc.find("balances", LookupPolicy::DescendantsOnly).is_none());
    }

    #[test]
    fn both_policies_match_nested_elements() {
        let doc = ResponseDocument::parse(
            r#"<main><section id="a">X</section><section id="b">Y</section></main>"#,
        );
        for policy in [LookupPolicy::Inclusive, LookupPolicy::DescendantsOnly] {
            assert_eq!(doc.find("a", policy).unwrap().inner_html(), "X");
            assert_eq!(doc.find("b", policy).unwrap().inner_html(), "Y");
            assert!(doc.find("c", policy).is_none());
        }
    }

    #[test]
    fn first_match_in_document_order_wins() {
        let doc = ResponseDocument::parse(
            r#"<div><span id="dup">first</span></div><span id="dup">second</span>"#,
        );
        assert_eq!(
            doc.find("dup", LookupPolicy::Inclusive).unwrap().inner_html(),
            "first"
        );
    }

    #[test]
    fn full_documents_are_searched_through_the_body() {
        let doc = ResponseDocument::parse(
            "<!DOCTYPE html><html><head><title>t</title></head>\
             <body><div id=\"wrap\"><div id=\"live\">now</div></div></body></html>",
        );
        assert_eq!(
            doc.find("live", LookupPolicy::DescendantsOnly)
                .unwrap()
                .inner_html(),
            "now"
        );
    }
}
