//! Human-readable rendering of deposit values.

/// Format a deposit for display: `"12%"` for percentages, `"$123.45"` for
/// fixed amounts.
pub fn format_deposit(amount: f64, is_percentage: bool) -> String {
    if is_percentage {
        format!("{amount}%")
    } else {
        format!("${amount:.2}")
    }
}
