//! Rupiah parsing and formatting.

use once_cell::sync::Lazy;
use regex::Regex;

/// Token shown for a missing amount.
pub const ZERO_RUPIAH: &str = "Rp0";

static CURRENCY_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Rp|[.,]").expect("valid regex"));

/// Parse a raw `UKT` cell such as `"Rp2.500.000"` into a whole rupiah amount.
///
/// The literal `Rp` marker and every `.`/`,` separator are removed before the
/// integer parse. Anything that still fails to parse, including negative
/// amounts, is reported as missing.
pub fn parse_tuition(raw: &str) -> Option<u64> {
    let cleaned = CURRENCY_NOISE.replace_all(raw, "");
    cleaned.trim().parse::<u64>().ok()
}

/// Format an amount as `Rp1.000.000`.
///
/// Missing and NaN amounts render as [`ZERO_RUPIAH`]. The fractional part is
/// truncated.
pub fn format_rupiah(amount: Option<f64>) -> String {
    match amount {
        Some(value) if value.is_finite() => {
            let whole = value.trunc();
            let digits = group_thousands(whole.abs() as u64);
            if whole < 0.0 {
                format!("Rp-{}", digits)
            } else {
                format!("Rp{}", digits)
            }
        }
        _ => ZERO_RUPIAH.to_string(),
    }
}

/// Shorthand for formatting a parsed tuition value.
pub fn format_tuition(tuition: Option<u64>) -> String {
    format_rupiah(tuition.map(|value| value as f64))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
