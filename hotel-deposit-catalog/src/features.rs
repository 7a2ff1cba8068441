//! In-memory filters and aggregates over already-loaded deposit rows.
//!
//! Everything here is pure: callers pass slices of rows read from the store
//! (or any other [`DepositRecord`]) and get new vectors or summaries back.

use std::cmp::Ordering;

use serde::Serialize;

use crate::types::BrandSummary;

/// A row carrying a deposit, fixed or percentage.
pub trait DepositRecord {
    /// The deposit amount, `None` when absent or unparseable.
    fn deposit_amount(&self) -> Option<f64>;

    fn is_percentage(&self) -> bool;
}

/// Parse a deposit amount held as text. Blank or non-numeric text is `None`.
pub fn parse_amount(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|a| !a.is_nan())
}

fn in_range(amount: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.is_none_or(|m| amount >= m) && max.is_none_or(|m| amount <= m)
}

/// Keep fixed-amount rows whose amount lies in `[min, max]`.
///
/// With both bounds open the input is returned unfiltered, percentage rows
/// included.
pub fn filter_by_deposit_amount<T: DepositRecord + Clone>(
    rows: &[T],
    min: Option<f64>,
    max: Option<f64>,
) -> Vec<T> {
    if min.is_none() && max.is_none() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|r| !r.is_percentage())
        .filter(|r| r.deposit_amount().is_some_and(|a| in_range(a, min, max)))
        .cloned()
        .collect()
}

/// Keep percentage rows whose percentage lies in `[min, max]`.
///
/// With both bounds open the input is returned unfiltered.
pub fn filter_by_deposit_percentage<T: DepositRecord + Clone>(
    rows: &[T],
    min: Option<f64>,
    max: Option<f64>,
) -> Vec<T> {
    if min.is_none() && max.is_none() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|r| r.is_percentage())
        .filter(|r| r.deposit_amount().is_some_and(|a| in_range(a, min, max)))
        .cloned()
        .collect()
}

/// Brands ordered by hotel count, largest first, truncated to `limit`.
/// Ties keep their input order.
pub fn top_brands_by_hotel_count(brands: &[BrandSummary], limit: usize) -> Vec<BrandSummary> {
    let mut sorted = brands.to_vec();
    sorted.sort_by(|a, b| b.hotel_count.cmp(&a.hotel_count));
    sorted.truncate(limit);
    sorted
}

/// Mean of the fixed deposits, or 0 when there are none.
pub fn average_deposit<T: DepositRecord>(rows: &[T]) -> f64 {
    let amounts = fixed_amounts(rows);
    if amounts.is_empty() {
        return 0.0;
    }
    amounts.iter().sum::<f64>() / amounts.len() as f64
}

/// Rows sorted by deposit amount. A missing amount sorts as 0.
pub fn sort_by_deposit_amount<T: DepositRecord + Clone>(rows: &[T], ascending: bool) -> Vec<T> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let a = a.deposit_amount().unwrap_or(0.0);
        let b = b.deposit_amount().unwrap_or(0.0);
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        if ascending { ord } else { ord.reverse() }
    });
    sorted
}

/// Summary of a set of deposit rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositStats {
    pub total: usize,
    pub fixed_count: usize,
    pub percentage_count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Counts by kind plus min/max/mean of the fixed deposits. All zero for an
/// empty input.
pub fn deposit_stats<T: DepositRecord>(rows: &[T]) -> DepositStats {
    let with_amount = |pct: bool| {
        rows.iter()
            .filter(|r| r.is_percentage() == pct && r.deposit_amount().is_some())
            .count()
    };
    let amounts = fixed_amounts(rows);

    let (min, max, avg) = if amounts.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        (
            amounts.iter().copied().fold(f64::INFINITY, f64::min),
            amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            amounts.iter().sum::<f64>() / amounts.len() as f64,
        )
    };

    DepositStats {
        total: rows.len(),
        fixed_count: with_amount(false),
        percentage_count: with_amount(true),
        min,
        max,
        avg,
    }
}

fn fixed_amounts<T: DepositRecord>(rows: &[T]) -> Vec<f64> {
    rows.iter()
        .filter(|r| !r.is_percentage())
        .filter_map(|r| r.deposit_amount())
        .collect()
}
