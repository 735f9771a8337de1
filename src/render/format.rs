use crate::domain::CostEstimate;

/// Formats a number with thousands separators and at most three fraction
/// digits, e.g. `12500` as `12,500`.
#[must_use]
pub fn amount(value: f64) -> String {
    if !value.is_finite() {
        return quantity(value);
    }

    let rounded = format!("{:.3}", value.abs());
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && (whole != "0" || !fraction.is_empty()) {
        "-"
    } else {
        ""
    };

    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}

/// Formats a plain quantity such as a floor size or a seat count.
#[must_use]
pub fn quantity(value: f64) -> String {
    value.to_string()
}

/// Formats a cost range in shekels, e.g. `₪500 - ₪1,200`.
#[must_use]
pub fn cost_range(cost: &CostEstimate) -> String {
    format!("₪{} - ₪{}", amount(cost.min), amount(cost.max))
}

/// Formats a duration, e.g. `14 ימים`.
#[must_use]
pub fn days(value: f64) -> String {
    format!("{} ימים", quantity(value))
}
