//! Price text cleanup and markup rules

/// Flat amount added after the percentage markup, in euro
pub const SURCHARGE_EUR: f64 = 20.0;

/// Markup percent used when none is given
pub const DEFAULT_MARKUP_PERCENT: f64 = 9.0;

/// Round `val` to `precision` decimals: scale, add 0.5, truncate toward zero, rescale
///
/// This is round-half-up for positive values. Negative inputs are not
/// mirrored, so `-0.005` becomes `0.0` rather than `-0.01`.
pub fn round_float(val: f64, precision: u32) -> f64 {
    let ratio = 10_f64.powi(precision as i32);
    ((val * ratio + 0.5) as i64) as f64 / ratio
}

/// Parse a scraped currency string such as `"1 234,50\u{a0}€"`
///
/// Commas become decimal points, non-breaking spaces and every other
/// character that is not a digit or a period are removed. Returns `None`
/// when what is left is not a number.
pub fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .replace(',', ".")
        .replace('\u{a0}', "")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    cleaned.parse::<f64>().ok()
}

/// Percentage markup applied to every raw catalog price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceMarkup {
    percent: f64,
}

impl PriceMarkup {
    pub fn new(percent: f64) -> Self {
        Self { percent }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// `raw * (1 + percent/100) + 20`, rounded to cents
    pub fn apply(&self, raw_price: f64) -> f64 {
        let final_price = raw_price * (1.0 + self.percent / 100.0) + SURCHARGE_EUR;
        round_float(final_price, 2)
    }
}

impl Default for PriceMarkup {
    fn default() -> Self {
        Self::new(DEFAULT_MARKUP_PERCENT)
    }
}
