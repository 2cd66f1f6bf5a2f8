//! # Formatting Module
//!
//! Display formatting for prices and currency amounts.
//!
//! These functions feed table cells and PDF fields directly, so they follow
//! the same degradation rule as the calculators: a non-finite number renders
//! as a zero string with correct padding - `NaN`/`Infinity` must never leak
//! into displayed text.

// =============================================================================
// Fixed-Point Formatting
// =============================================================================

/// Formats a per-unit price to the given number of decimal places.
///
/// Non-finite input renders as zero at the requested precision
/// (`decimal_places = 3` → `"0.000"`).
///
/// ```rust
/// use offerkit_core::format::format_unit_price;
///
/// assert_eq!(format_unit_price(0.125, 3), "0.125");
/// assert_eq!(format_unit_price(f64::NAN, 3), "0.000");
/// ```
pub fn format_unit_price(price: f64, decimal_places: u32) -> String {
    let price = if price.is_finite() { price } else { 0.0 };
    format!("{:.*}", decimal_places as usize, price)
}

/// Formats a line or offer total to 2 decimal places.
///
/// Non-finite input renders as `"0.00"`.
pub fn format_total_price(price: f64) -> String {
    format_unit_price(price, 2)
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// Formats an amount with currency symbol and thousands grouping.
///
/// EUR renders German-style (`1.234,56 €`); everything else renders
/// US-style (`$1,234.56`).
///
/// Known quirk: because only EUR is special-cased, offers in any other
/// currency (RMB, HKD, ...) display with a dollar sign. Kept as-is until the
/// product side decides how those currencies should render.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    // "{:.2}" always yields digits, a dot, and two decimals
    let (whole, decimals) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    if currency == "EUR" {
        format!("{sign}{},{decimals} €", group_thousands(whole, '.'))
    } else {
        format!("{sign}${}.{decimals}", group_thousands(whole, ','))
    }
}

/// Inserts a thousands separator into a plain digit string.
fn group_thousands(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        let remaining = digits.len() - i;
        if i > 0 && remaining % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

// =============================================================================
// Unit Tests
// =============================================================================
