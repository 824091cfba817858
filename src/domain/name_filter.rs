//! Blacklist filtering for product titles
//!
//! Two word lists drive it: exact tokens that are silently dropped from a
//! title, and substrings that mark the whole listing as noise. Comparison is
//! case-sensitive in both cases.

/// Result of checking one product title
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameVerdict {
    /// Title survived; holds the remaining tokens in their original order
    Keep(Vec<String>),
    /// A blacklisted substring remains, the listing must be skipped
    Discard,
}

impl NameVerdict {
    pub fn is_discard(&self) -> bool {
        matches!(self, Self::Discard)
    }

    /// Surviving tokens joined with single spaces, `None` on discard
    pub fn display_name(&self) -> Option<String> {
        match self {
            Self::Keep(tokens) => Some(tokens.join(" ")),
            Self::Discard => None,
        }
    }
}

/// Token and substring blacklist applied to every scraped title
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    bad_words: Vec<String>,
    delete_item_words: Vec<String>,
}

impl NameFilter {
    pub fn new(bad_words: Vec<String>, delete_item_words: Vec<String>) -> Self {
        Self {
            bad_words,
            delete_item_words,
        }
    }

    pub fn bad_words(&self) -> &[String] {
        &self.bad_words
    }

    pub fn delete_item_words(&self) -> &[String] {
        &self.delete_item_words
    }

    /// Drop blacklisted tokens, then discard when a forbidden substring remains
    pub fn check_item_name<S: AsRef<str>>(&self, tokens: &[S]) -> NameVerdict {
        let filtered: Vec<String> = tokens
            .iter()
            .map(AsRef::as_ref)
            .filter(|token| !self.bad_words.iter().any(|bad| bad == token))
            .map(str::to_string)
            .collect();

        let joined = filtered.join(" ");
        if self
            .delete_item_words
            .iter()
            .any(|word| joined.contains(word.as_str()))
        {
            return NameVerdict::Discard;
        }

        NameVerdict::Keep(filtered)
    }

    /// Convenience wrapper splitting a raw title on whitespace first
    pub fn check_title(&self, title: &str) -> NameVerdict {
        let tokens: Vec<&str> = title.split_whitespace().collect();
        self.check_item_name(&tokens)
    }
}
