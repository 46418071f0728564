// src/engine/reconcile.rs
use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::types::{ChartSet, Metric, ReconciledRecord};

/// Join the three series of one fund into date-aligned records.
///
/// - Dates are the **union** over all series, ascending.
/// - A series without a point on a date leaves that field `None`.
/// - **Gate**: if any series is missing or empty the fund yields nothing;
///   a partial join would read as "metric not published" for every date.
pub fn reconcile(fund: &str, charts: &ChartSet) -> Vec<ReconciledRecord> {
    if let Some(m) = charts.first_empty() {
        logd!("{fund}: no {} series; suppressing all records", m.column());
        return Vec::new();
    }

    let dates: BTreeSet<NaiveDate> = Metric::ALL
        .iter()
        .filter_map(|m| charts.get(*m))
        .flat_map(|s| s.keys().copied())
        .collect();

    let value = |m: Metric, date: &NaiveDate| charts.get(m).and_then(|s| s.get(date)).copied();

    dates
        .into_iter()
        .map(|date| ReconciledRecord {
            fund: s!(fund),
            date,
            book_value: value(Metric::BookValue, &date),
            dividend_yield: value(Metric::DividendYield, &date),
            payout: value(Metric::Payout, &date),
        })
        .collect()
}
