use serde::{Deserialize, Serialize};

/// Quantity written for every exported tire row
pub const DEFAULT_QUANTITY: u32 = 8;

/// Marker appended to the display name of tires found in the studded catalog
pub const STUDDED_SUFFIX: &str = " -STUD";

/// Product row extracted from a catalog listing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Display name after blacklist filtering (and studded marker, if any)
    pub name: String,
    pub quantity: u32,
    /// Manufacturing year from a `DOTyyyy` date code
    pub year: Option<u16>,
    /// Country of origin; the listings do not expose it
    pub country: String,
    /// Final price in euro, markup and surcharge applied
    pub price: f64,
}

impl ProductRecord {
    /// Create a record with the fixed quantity and an empty country
    pub fn new(name: impl Into<String>, year: Option<u16>, price: f64) -> Self {
        Self {
            name: name.into(),
            quantity: DEFAULT_QUANTITY,
            year,
            country: String::new(),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = ProductRecord::new("Nokian Hakkapeliitta 10 205/55R16", Some(2023), 129.0);

        assert_eq!(record.quantity, 8);
        assert!(record.country.is_empty());
        assert_eq!(record.year, Some(2023));
        assert_eq!(record.name, "Nokian Hakkapeliitta 10 205/55R16");
    }
}
