// tests/pipeline.rs
use chrono::NaiveDate;

use fii_scrape::config::consts::CHARTS;
use fii_scrape::engine::{process_page, FundStatus, Metric};
use fii_scrape::specs::{chart, series};

const PAGE: &str = include_str!("fixtures/fund_page.html");

fn d(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

#[test]
fn every_chart_is_located_and_decoded() {
    for (metric, id, field) in CHARTS {
        let js = chart::locate(PAGE, id).unwrap_or_else(|| panic!("{id} not found"));
        let points = series::decode(js, field).unwrap();
        assert_eq!(points.len(), 4, "{metric:?}");
    }
}

#[test]
fn fixture_page_reconciles_by_date() {
    let report = process_page("HGLG11", PAGE);
    assert_eq!(report.status, FundStatus::Complete);
    assert!(report.warnings.is_empty());

    let rows: Vec<_> = report
        .records
        .iter()
        .map(|r| (r.date, r.book_value, r.dividend_yield, r.payout))
        .collect();
    assert_eq!(
        rows,
        vec![
            (d(2020, 10), Some(161.85), Some(0.55), None),
            (d(2020, 11), Some(162.02), Some(0.56), Some(0.78)),
            (d(2020, 12), Some(161.47), Some(0.57), Some(0.9)),
            (d(2021, 1), Some(162.3), Some(0.54), Some(0.78)),
            (d(2021, 2), None, None, Some(0.78)),
        ]
    );
    assert!(report.records.iter().all(|r| r.fund == "HGLG11"));
}

#[test]
fn page_without_one_chart_yields_nothing() {
    // drop the payout container entirely
    let start = PAGE.find(r#"<div id="dividends-chart-wrapper""#).unwrap();
    let end = PAGE[start..].find("</section>").unwrap() + start;
    let page = format!("{}{}", &PAGE[..start], &PAGE[end..]);

    let report = process_page("HGLG11", &page);
    assert!(report.records.is_empty());
    assert!(matches!(report.status, FundStatus::Suppressed { .. }));
}

#[test]
fn unknown_month_suppresses_fund() {
    let page = PAGE.replacen("Novembro\\/2020", "Nov\\/2020", 1);
    let report = process_page("HGLG11", &page);
    assert!(report.records.is_empty());
    match report.status {
        FundStatus::Suppressed { reason } => {
            assert!(reason.starts_with(Metric::BookValue.column()), "{reason}");
            assert!(reason.contains("Nov/2020"), "{reason}");
        }
        FundStatus::Complete => panic!("expected suppression"),
    }
}

#[test]
fn commented_out_markup_is_ignored() {
    // the comment in the fixture holds a stale payout container before the real one
    let js = chart::locate(PAGE, "dividends-chart-wrapper").unwrap();
    assert!(js.contains("Dividendos"));
    assert!(!js.contains("stale"));
}
