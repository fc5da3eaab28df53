//! Brazilian-real parsing and display helpers. Rounding happens here and nowhere else.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use super::amortization::AmortizationError;

/// Parse a user-typed currency amount such as `R$ 500.000` or `1.250,75`.
///
/// Everything except digits and the decimal comma is discarded, so `.` is read as a thousands
/// separator.
pub fn parse_currency(raw: &str) -> Result<f64, AmortizationError> {
    let non_numeric = || AmortizationError::NonNumericPropertyValue {
        raw: raw.to_string(),
    };

    let kept: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == ',')
        .collect();

    if !kept.chars().any(|ch| ch.is_ascii_digit()) || kept.matches(',').count() > 1 {
        return Err(non_numeric());
    }

    kept.replace(',', ".")
        .parse::<f64>()
        .map_err(|_| non_numeric())
}

/// `R$ 1.234,56`
pub fn format_brl(value: f64) -> String {
    match split_cents(value) {
        Some((sign, whole, cents)) => format!("{sign}R$ {},{cents}", group_thousands(&whole)),
        None => format!("R$ {value}"),
    }
}

/// Like [`format_brl`] but omits the cents when they are zero: `R$ 500.000`.
pub fn format_brl_whole(value: f64) -> String {
    match split_cents(value) {
        Some((sign, whole, cents)) if cents == "00" => {
            format!("{sign}R$ {}", group_thousands(&whole))
        }
        Some((sign, whole, cents)) => format!("{sign}R$ {},{cents}", group_thousands(&whole)),
        None => format!("R$ {value}"),
    }
}

/// Sign, integer digits and two cent digits of `value` rounded half away from zero.
///
/// Goes through the shortest decimal text of the float, so large values keep every digit.
/// `None` for values a `Decimal` cannot hold (NaN, infinities, beyond 28 digits).
fn split_cents(value: f64) -> Option<(&'static str, String, String)> {
    let rounded = Decimal::from_str(&value.to_string())
        .ok()?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = rounded.abs().to_string();
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    let cents = format!("{fraction:0<2}");
    Some((sign, whole.to_string(), cents))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
