//! Domain module - tire catalog entities and the pure text/price rules
//!
//! Everything in here is synchronous and free of I/O so it can be exercised
//! directly by unit tests and by the crawl pipeline alike.

pub mod category;
pub mod name_filter;
pub mod normalizer;
pub mod pricing;
pub mod product;
pub mod studded;

// Re-export commonly used items for convenience
pub use category::Category;
pub use name_filter::{NameFilter, NameVerdict};
pub use normalizer::{extract_year, normalize_name};
pub use pricing::{round_float, PriceMarkup};
pub use product::ProductRecord;
pub use studded::StuddedIndex;
