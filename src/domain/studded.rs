use std::collections::HashSet;

use super::normalizer::normalize_name;

/// Normalized names of every tire listed in the studded catalog section
///
/// Built once before the category crawls start, then shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StuddedIndex {
    names: HashSet<String>,
}

impl StuddedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `display_name` and add it; returns false if it was already known
    pub fn insert_name(&mut self, display_name: &str) -> bool {
        self.names.insert(normalize_name(display_name))
    }

    /// Look up a display name after normalizing it the same way as on insert
    pub fn contains_name(&self, display_name: &str) -> bool {
        self.names.contains(&normalize_name(display_name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for StuddedIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut index = Self::new();
        for name in iter {
            index.insert_name(name.as_ref());
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_date_code_case_and_spacing() {
        let index: StuddedIndex = ["Nokian Hakkapeliitta 10 205/55R16 DOT2022"].into_iter().collect();

        assert!(index.contains_name("NOKIAN  Hakkapeliitta 10 205/55R16 DOT2024"));
        assert!(index.contains_name("nokian hakkapeliitta 10 205/55r16"));
        assert!(!index.contains_name("Nokian Hakkapeliitta R5 205/55R16"));
    }

    #[test]
    fn test_duplicate_insert_keeps_one_entry() {
        let mut index = StuddedIndex::new();

        assert!(index.insert_name("Gislaved Nord*Frost 200 DOT2021"));
        assert!(!index.insert_name("Gislaved  Nord*Frost 200 DOT2023"));
        assert_eq!(index.len(), 1);
    }
}
