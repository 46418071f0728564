// src/engine/engine.rs
use crate::config::consts::CHARTS;
use crate::error::SeriesError;
use crate::specs::{chart, series};

use super::reconcile::reconcile;
use super::types::*;

/// Run the whole core over one fund page: locate and decode each chart,
/// then reconcile. Never fails; problems end up in `FundReport::status`.
pub fn process_page(fund: &str, page: &str) -> FundReport {
    let mut charts = ChartSet::default();
    let mut warnings = Vec::new();
    let mut absent: Option<SeriesError> = None;

    for (metric, chart_id, field) in CHARTS {
        let Some(js) = chart::locate(page, chart_id) else {
            let e = SeriesError::ChartAbsent { chart: s!(chart_id) };
            logd!("{fund}: {e}");
            absent.get_or_insert(e);
            continue;
        };

        match series::decode_checked(js, field) {
            Ok((points, mismatch)) => {
                if let Some(m) = mismatch {
                    logw!("{fund}: {} chart: {m}", metric.column());
                    warnings.push((metric, m));
                }
                charts.set(metric, points);
            }
            Err(e) => {
                logw!("{fund}: {} chart unreadable: {e}", metric.column());
                return FundReport {
                    fund: s!(fund),
                    records: Vec::new(),
                    status: FundStatus::Suppressed { reason: format!("{}: {e}", metric.column()) },
                    warnings,
                };
            }
        }
    }

    let records = reconcile(fund, &charts);
    let status = if !records.is_empty() {
        FundStatus::Complete
    } else if let Some(e) = absent {
        FundStatus::Suppressed { reason: e.to_string() }
    } else {
        let m = charts.first_empty().unwrap_or(Metric::BookValue);
        FundStatus::Suppressed { reason: format!("{}: chart has no data points", m.column()) }
    };

    FundReport { fund: s!(fund), records, status, warnings }
}
