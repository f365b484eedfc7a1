//! Fixed-currency (BRL) helpers: amount hygiene, rounding and pt-BR rendering.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::RecordDate;

pub const CURRENCY_CODE: &str = "BRL";
pub const CURRENCY_SYMBOL: &str = "R$";
const MINOR_UNITS: usize = 2;
const DECIMAL_SEPARATOR: char = ',';
const GROUPING_SEPARATOR: char = '.';

/// Amounts that are negative, NaN or infinite contribute nothing to a sum.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Rounds to centavos, the precision every displayed total is compared at.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats a number with pt-BR separators: `1234.5` → `1.234,50`.
pub fn format_number(value: f64) -> String {
    let body = format!("{:.*}", MINOR_UNITS, value.abs());
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body.as_str(), ""));
    let grouped = group_digits(int_part);
    let sign = if value < 0.0 && round_cents(value) != 0.0 {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}{DECIMAL_SEPARATOR}{frac_part}")
    }
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, GROUPING_SEPARATOR);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// `R$ 1.234,56`; negatives render as `-R$ 10,00`.
pub fn format_currency(value: f64) -> String {
    let amount = if value.is_finite() { value } else { 0.0 };
    let body = format_number(amount);
    match body.strip_prefix('-') {
        Some(rest) => format!("-{CURRENCY_SYMBOL} {rest}"),
        None => format!("{CURRENCY_SYMBOL} {body}"),
    }
}

/// Lenient parser for user-typed money (`R$ 1.234,56`, `12,5`). Anything
/// unparseable yields `0.0`.
pub fn parse_currency(input: &str) -> f64 {
    let cleaned: String = input
        .replace(CURRENCY_SYMBOL, "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != GROUPING_SEPARATOR)
        .map(|c| if c == DECIMAL_SEPARATOR { '.' } else { c })
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yy HH:MM`.
pub fn format_datetime(value: NaiveDateTime) -> String {
    value.format("%d/%m/%y %H:%M").to_string()
}

/// Renders a stored timestamp for listings, falling back to the raw text.
pub fn format_record_date(date: &RecordDate) -> String {
    match date.to_date() {
        Some(parsed) => format_date(parsed),
        None => date.as_str().to_string(),
    }
}
