//! scraper-backed [`MarkupNode`] implementation

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{MarkupNode, ParsingError, ParsingResult};

/// Selectors compiled once per parser and looked up by their source text
#[derive(Debug, Default)]
pub struct SelectorSet {
    compiled: HashMap<String, Selector>,
}

impl SelectorSet {
    /// Compile every selector, failing on the first invalid one
    pub fn compile<'s, I>(selectors: I) -> ParsingResult<Self>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut compiled = HashMap::new();
        for source in selectors {
            if compiled.contains_key(source) {
                continue;
            }
            let selector = Selector::parse(source)
                .map_err(|e| ParsingError::invalid_selector(source, e.to_string()))?;
            compiled.insert(source.to_string(), selector);
        }

        debug!("Compiled {} CSS selectors", compiled.len());
        Ok(Self { compiled })
    }

    pub fn get(&self, source: &str) -> ParsingResult<&Selector> {
        self.compiled
            .get(source)
            .ok_or_else(|| ParsingError::invalid_selector(source, "selector was not compiled for this parser"))
    }
}

/// Element of a parsed document paired with the parser's selector set
#[derive(Clone, Copy)]
pub struct HtmlNode<'a> {
    element: ElementRef<'a>,
    selectors: &'a SelectorSet,
}

impl<'a> HtmlNode<'a> {
    /// Root element of `document`
    pub fn root(document: &'a Html, selectors: &'a SelectorSet) -> Self {
        Self {
            element: document.root_element(),
            selectors,
        }
    }
}

impl MarkupNode for HtmlNode<'_> {
    fn select_all(&self, selector: &str) -> ParsingResult<Vec<Self>> {
        let compiled = self.selectors.get(selector)?;
        Ok(self
            .element
            .select(compiled)
            .map(|element| Self {
                element,
                selectors: self.selectors,
            })
            .collect())
    }

    fn text(&self) -> String {
        self.element.text().collect()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.element.value().attr(name).map(str::to_string)
    }

    fn same_node(&self, other: &Self) -> bool {
        self.element.id() == other.element.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selector_is_reported() {
        let err = SelectorSet::compile(["div..broken"]).unwrap_err();
        assert!(matches!(err, ParsingError::InvalidSelector { .. }));
    }

    #[test]
    fn test_unknown_selector_lookup_fails() {
        let set = SelectorSet::compile([".known"]).unwrap();
        assert!(set.get(".unknown").is_err());
    }

    #[test]
    fn test_select_text_and_attr() {
        let set = SelectorSet::compile(["p", "a"]).unwrap();
        let document = Html::parse_document(
            r#"<div><p>Hello <b>big</b></p><p> world</p><a href="/next">more</a><a href="/other">x</a></div>"#,
        );
        let root = HtmlNode::root(&document, &set);

        assert_eq!(root.select_text("p").unwrap(), "Hello big world");
        assert_eq!(root.select_first_attr("a", "href").unwrap().as_deref(), Some("/next"));
        assert_eq!(root.select_first_attr("a", "title").unwrap(), None);
    }
}
