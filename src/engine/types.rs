// src/engine/types.rs
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::LengthMismatch;

/// One chart's points. Keys are first-of-month dates, so iteration is
/// chronological.
pub type SeriesMap = BTreeMap<NaiveDate, f64>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    BookValue,
    DividendYield,
    Payout,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::BookValue, Metric::DividendYield, Metric::Payout];

    /// Output column name.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::BookValue => "book_value",
            Metric::DividendYield => "dividend_yield",
            Metric::Payout => "payout",
        }
    }
}

/// The three decoded charts of one fund. `None` = chart not found.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSet {
    pub book_value: Option<SeriesMap>,
    pub dividend_yield: Option<SeriesMap>,
    pub payout: Option<SeriesMap>,
}

impl ChartSet {
    pub fn get(&self, metric: Metric) -> Option<&SeriesMap> {
        match metric {
            Metric::BookValue => self.book_value.as_ref(),
            Metric::DividendYield => self.dividend_yield.as_ref(),
            Metric::Payout => self.payout.as_ref(),
        }
    }

    pub fn set(&mut self, metric: Metric, series: SeriesMap) {
        let slot = match metric {
            Metric::BookValue => &mut self.book_value,
            Metric::DividendYield => &mut self.dividend_yield,
            Metric::Payout => &mut self.payout,
        };
        *slot = Some(series);
    }

    /// First metric whose series is missing or has no points.
    pub fn first_empty(&self) -> Option<Metric> {
        Metric::ALL
            .into_iter()
            .find(|m| self.get(*m).is_none_or(|s| s.is_empty()))
    }
}

/// One date of one fund, all three metrics aligned.
/// A metric the fund has no point for on that date is `None`, never zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReconciledRecord {
    pub fund: String,
    pub date: NaiveDate,
    pub book_value: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout: Option<f64>,
}

impl ReconciledRecord {
    pub const HEADERS: [&'static str; 5] = ["fund", "date", "book_value", "dividend_yield", "payout"];

    pub fn headers() -> Vec<String> {
        Self::HEADERS.iter().map(|h| s!(*h)).collect()
    }

    /// Flat row in `HEADERS` order; absent values are empty cells.
    pub fn to_row(&self) -> Vec<String> {
        let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        vec![
            self.fund.clone(),
            self.date.format("%Y-%m-%d").to_string(),
            cell(self.book_value),
            cell(self.dividend_yield),
            cell(self.payout),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FundStatus {
    Complete,
    /// Zero records were emitted for the fund.
    Suppressed { reason: String },
}

/// Outcome of processing one fund page.
#[derive(Clone, Debug, PartialEq)]
pub struct FundReport {
    pub fund: String,
    pub records: Vec<ReconciledRecord>,
    pub status: FundStatus,
    /// Data-quality diagnostics raised while decoding (not failures).
    pub warnings: Vec<(Metric, LengthMismatch)>,
}

impl FundReport {
    pub fn is_complete(&self) -> bool {
        self.status == FundStatus::Complete
    }
}
