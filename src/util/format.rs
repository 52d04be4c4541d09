//! Number formatting for reports.

/// Format a cost in USD with two decimals.
#[must_use]
pub fn format_cost(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${value:.2}")
    }
}

/// Format a small cost in USD with four decimals (daily lines, per-unit prices).
#[must_use]
pub fn format_cost_precise(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.4}", value.abs())
    } else {
        format!("${value:.4}")
    }
}

/// Format a per-million-token rate, e.g. `$5.00/1M`.
#[must_use]
pub fn format_rate(per_million: f64) -> String {
    format!("{}/1M", format_cost(per_million))
}

/// Format a token count compactly (`12.5K`, `1.5M`).
#[must_use]
pub fn format_tokens(value: i64) -> String {
    fn format_compact(value: i64, divisor: i64, suffix: &str) -> String {
        let sign = if value < 0 { "-" } else { "" };
        let abs = value.unsigned_abs();
        let divisor = divisor.unsigned_abs();
        let major = abs / divisor;
        let minor = (abs % divisor) / (divisor / 10);
        format!("{sign}{major}.{minor}{suffix}")
    }

    if value.unsigned_abs() >= 1_000_000 {
        format_compact(value, 1_000_000, "M")
    } else if value.unsigned_abs() >= 1_000 {
        format_compact(value, 1_000, "K")
    } else {
        value.to_string()
    }
}
