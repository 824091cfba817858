//! Product list parser for tire catalog pages
//!
//! One call handles one page: product cards inside the main content block
//! become records, and the "load more" link becomes the next page reference.
//! Individual cards that cannot be used are returned as [`EntryOutcome::Skip`]
//! so a single bad listing never fails the page.

use scraper::Html;
use tracing::{debug, trace};

use super::{CatalogSelectors, HtmlNode, MarkupNode, ParseContext, ParsingResult, SelectorSet};
use crate::domain::name_filter::NameFilter;
use crate::domain::normalizer::extract_year;
use crate::domain::pricing::{parse_price_text, PriceMarkup};
use crate::domain::product::{ProductRecord, STUDDED_SUFFIX};
use crate::domain::studded::StuddedIndex;

/// Why a product card produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Title contains a blacklisted substring
    FilteredName { title: String },
    /// Price node missing or not a number
    UnparseablePrice { name: String, price_text: String },
}

/// Per-card extraction result
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Record(ProductRecord),
    Skip(SkipReason),
}

/// Everything extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageExtraction {
    /// Card outcomes in document order
    pub entries: Vec<EntryOutcome>,
    /// Raw `href` of the "load more" link, not yet resolved
    pub next_page: Option<String>,
}

impl PageExtraction {
    pub fn records(&self) -> impl Iterator<Item = &ProductRecord> {
        self.entries.iter().filter_map(|entry| match entry {
            EntryOutcome::Record(record) => Some(record),
            EntryOutcome::Skip(_) => None,
        })
    }

    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, EntryOutcome::Skip(_)))
            .count()
    }

    pub fn into_records(self) -> Vec<ProductRecord> {
        self.entries
            .into_iter()
            .filter_map(|entry| match entry {
                EntryOutcome::Record(record) => Some(record),
                EntryOutcome::Skip(_) => None,
            })
            .collect()
    }
}

/// Filtered display names from one page of the studded catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamePage {
    pub names: Vec<String>,
    pub next_page: Option<String>,
}

/// Parser for extracting tire records from catalog listing pages
pub struct ProductListParser {
    selectors: CatalogSelectors,
    compiled: SelectorSet,
    name_filter: NameFilter,
    markup: PriceMarkup,
}

impl ProductListParser {
    /// Create a parser with the default catalog selectors
    pub fn new(name_filter: NameFilter, markup: PriceMarkup) -> ParsingResult<Self> {
        Self::with_selectors(CatalogSelectors::default(), name_filter, markup)
    }

    /// Create a parser with custom selectors; every selector is compiled up front
    pub fn with_selectors(
        selectors: CatalogSelectors,
        name_filter: NameFilter,
        markup: PriceMarkup,
    ) -> ParsingResult<Self> {
        let compiled = SelectorSet::compile(selectors.all().into_iter().map(|(_, source)| source))?;

        Ok(Self {
            selectors,
            compiled,
            name_filter,
            markup,
        })
    }

    pub fn markup(&self) -> PriceMarkup {
        self.markup
    }

    pub fn selectors(&self) -> &CatalogSelectors {
        &self.selectors
    }

    /// Parse a page body into product records
    pub fn parse_products(
        &self,
        html: &str,
        studded: &StuddedIndex,
        context: &ParseContext,
    ) -> ParsingResult<PageExtraction> {
        let document = Html::parse_document(html);
        let root = HtmlNode::root(&document, &self.compiled);
        self.extract_products(&root, studded, context)
    }

    /// Parse a page body into display names only (studded catalog)
    pub fn parse_names(&self, html: &str, context: &ParseContext) -> ParsingResult<NamePage> {
        let document = Html::parse_document(html);
        let root = HtmlNode::root(&document, &self.compiled);
        self.extract_names(&root, context)
    }

    pub fn extract_products<N: MarkupNode>(
        &self,
        root: &N,
        studded: &StuddedIndex,
        context: &ParseContext,
    ) -> ParsingResult<PageExtraction> {
        let Some(items) = self.product_items(root)? else {
            debug!(
                "[{}] page {}: no content block, treating as last page",
                context.label, context.page_number
            );
            return Ok(PageExtraction::default());
        };

        let mut entries = Vec::with_capacity(items.len());
        for item in &items {
            let outcome = self.extract_entry(item, studded)?;
            if let EntryOutcome::Skip(reason) = &outcome {
                trace!("[{}] page {}: skipped {:?}", context.label, context.page_number, reason);
            }
            entries.push(outcome);
        }

        let extraction = PageExtraction {
            entries,
            next_page: self.next_page(root)?,
        };

        debug!(
            "[{}] page {}: {} records, {} skipped, next page: {}",
            context.label,
            context.page_number,
            extraction.records().count(),
            extraction.skipped(),
            extraction.next_page.as_deref().unwrap_or("none")
        );

        Ok(extraction)
    }

    pub fn extract_names<N: MarkupNode>(&self, root: &N, context: &ParseContext) -> ParsingResult<NamePage> {
        let Some(items) = self.product_items(root)? else {
            return Ok(NamePage::default());
        };

        let mut names = Vec::with_capacity(items.len());
        for item in &items {
            let title = item.select_text(&self.selectors.title)?;
            if let Some(name) = self.name_filter.check_title(&title).display_name() {
                if !name.is_empty() {
                    names.push(name);
                }
            }
        }

        debug!(
            "[{}] page {}: {} studded names",
            context.label,
            context.page_number,
            names.len()
        );

        Ok(NamePage {
            names,
            next_page: self.next_page(root)?,
        })
    }

    /// Product cards inside the content blocks, or `None` when the page has no block
    ///
    /// Cards reachable from more than one block (nested blocks) are kept once.
    fn product_items<N: MarkupNode>(&self, root: &N) -> ParsingResult<Option<Vec<N>>> {
        let blocks = root.select_all(&self.selectors.content_block)?;
        if blocks.is_empty() {
            return Ok(None);
        }

        let mut items: Vec<N> = Vec::new();
        for block in &blocks {
            for item in block.select_all(&self.selectors.product_item)? {
                if !items.iter().any(|seen| seen.same_node(&item)) {
                    items.push(item);
                }
            }
        }
        Ok(Some(items))
    }

    fn next_page<N: MarkupNode>(&self, root: &N) -> ParsingResult<Option<String>> {
        Ok(root
            .select_first_attr(&self.selectors.load_more, "href")?
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty()))
    }

    fn extract_entry<N: MarkupNode>(&self, item: &N, studded: &StuddedIndex) -> ParsingResult<EntryOutcome> {
        let title = item.select_text(&self.selectors.title)?;

        let Some(display_name) = self.name_filter.check_title(&title).display_name() else {
            return Ok(EntryOutcome::Skip(SkipReason::FilteredName { title }));
        };

        // Year comes from the unfiltered title so a blacklisted token can't hide it
        let year = extract_year(&title);

        let name = if studded.contains_name(&display_name) {
            format!("{display_name}{STUDDED_SUFFIX}")
        } else {
            display_name
        };

        let price_text = item.select_text(&self.selectors.price)?;
        let Some(raw_price) = parse_price_text(&price_text) else {
            return Ok(EntryOutcome::Skip(SkipReason::UnparseablePrice { name, price_text }));
        };

        Ok(EntryOutcome::Record(ProductRecord::new(
            name,
            year,
            self.markup.apply(raw_price),
        )))
    }
}
