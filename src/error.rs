// src/error.rs
//! Error taxonomy of the chart extraction core.
//!
//! Everything here is scoped to one chart of one fund. A [`SeriesError`]
//! aborts that chart's decode and, through the per-fund gate in
//! `engine::reconcile`, suppresses the fund's records. It never affects other
//! funds. [`LengthMismatch`] is a diagnostic, not an error.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    /// No container with this id, or no script payload inside it.
    /// Expected for funds that do not publish every chart.
    #[error("chart `{chart}` not present on page")]
    ChartAbsent { chart: String },

    #[error("marker {marker} not found in chart script")]
    MarkerNotFound { marker: String },

    #[error("array after marker {marker} is never closed")]
    Unterminated { marker: String },

    #[error("unknown month in date label {label:?}")]
    UnknownMonth { label: String },

    #[error("date label {label:?} is not <Month>/<Year>")]
    MalformedLabel { label: String },

    #[error("value {token:?} is not a number")]
    NumericParse { token: String },
}

/// Labels and values arrays of one chart differ in length.
/// The decoder keeps the first `min(labels, values)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthMismatch {
    pub labels: usize,
    pub values: usize,
}

impl LengthMismatch {
    pub fn kept(&self) -> usize {
        self.labels.min(self.values)
    }
}

impl fmt::Display for LengthMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} labels vs {} values; kept the first {}",
            self.labels, self.values, self.kept()
        )
    }
}
