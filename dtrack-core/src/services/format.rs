//! Display formatting helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a USD amount with no decimals and thousands separators
///
/// `1234.5` -> `$1,235`, `-30` -> `-$30`. Halves round away from zero.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Format a percentage change with an explicit sign and one decimal
///
/// `12.5` -> `+12.5%`, `-50` -> `-50.0%`, infinite growth -> `+Infinity%`.
pub fn format_percentage(change: f64) -> String {
    if change.is_nan() {
        return "+0.0%".to_string();
    }
    if change.is_infinite() {
        return if change > 0.0 { "+Infinity%" } else { "-Infinity%" }.to_string();
    }

    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{}{:.1}%", sign, change)
}

/// Shorten long identifiers: first 7 chars, "...", last 4 chars
pub fn truncate_principal(principal: &str) -> String {
    let chars: Vec<char> = principal.chars().collect();
    if chars.len() <= 11 {
        return principal.to_string();
    }

    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
