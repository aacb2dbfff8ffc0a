//! BRL formatting helpers.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::Money;

/// Format an amount the way the console displays it: `R$ 1.234,50`.
pub fn format_brl(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac_part}")
}

/// Amount as written in the CSV export: shortest decimal form with a comma
/// separator (`50`, `50,5`, `1234,75`).
pub fn csv_amount(amount: Money) -> String {
    amount.normalize().to_string().replace('.', ",")
}

/// Divide with a zero-count guard. Never panics, never yields NaN.
pub fn average(total: Money, count: usize) -> Money {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count as u64)
    }
}
