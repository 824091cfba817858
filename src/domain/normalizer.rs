//! Date-code handling for tire titles
//!
//! Titles embed the manufacturing year as `DOT` followed by four digits
//! (e.g. `DOT2023`). The same pattern is stripped when building the studded
//! cross-reference key, so two listings of one model with different date codes
//! collide on purpose.

use once_cell::sync::Lazy;
use regex::Regex;

static DATE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"DOT(\d{4})").expect("date code pattern is valid"));

/// Cross-reference key: date codes removed, whitespace collapsed, lower-cased
pub fn normalize_name(name: &str) -> String {
    let without_codes = DATE_CODE.replace_all(name, "");
    without_codes
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Year from the first date code in `title`
///
/// `DOT0000` carries no usable year and is reported as absent.
pub fn extract_year(title: &str) -> Option<u16> {
    DATE_CODE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<u16>().ok())
        .filter(|year| *year != 0)
}
