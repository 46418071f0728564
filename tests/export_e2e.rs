// tests/export_e2e.rs
use std::fs;

use chrono::NaiveDate;

use fii_scrape::config::options::{AppOptions, ExportFormat, ExportType};
use fii_scrape::csv::parse_rows;
use fii_scrape::engine::ReconciledRecord;
use fii_scrape::file::export_records;

fn rec(fund: &str, month: u32, vp: Option<f64>, dy: Option<f64>, payout: Option<f64>) -> ReconciledRecord {
    ReconciledRecord {
        fund: fund.to_string(),
        date: NaiveDate::from_ymd_opt(2021, month, 1).unwrap(),
        book_value: vp,
        dividend_yield: dy,
        payout,
    }
}

fn sample() -> Vec<ReconciledRecord> {
    vec![
        rec("HGLG11", 1, Some(10.0), Some(0.5), None),
        rec("HGLG11", 2, None, None, Some(1.2)),
        rec("KNRI11", 1, Some(160.25), Some(0.45), Some(0.7)),
    ]
}

#[test]
fn single_csv_with_headers_and_empty_cells() {
    let tmp = tempfile::tempdir().unwrap();
    let mut opts = AppOptions::default();
    opts.export.include_headers = true;
    opts.export.set_path(tmp.path().join("nested/run").to_str().unwrap());

    let written = export_records(&opts.export, &sample()).unwrap();
    assert_eq!(written, vec![tmp.path().join("nested/run.csv")]);

    let text = fs::read_to_string(&written[0]).unwrap();
    let rows = parse_rows(&text, ',');
    assert_eq!(rows[0], vec!["fund", "date", "book_value", "dividend_yield", "payout"]);
    assert_eq!(rows[1], vec!["HGLG11", "2021-01-01", "10", "0.5", ""]);
    assert_eq!(rows[2], vec!["HGLG11", "2021-02-01", "", "", "1.2"]);
    assert_eq!(rows.len(), 4);
}

#[test]
fn typed_extension_survives_format_change() {
    let tmp = tempfile::tempdir().unwrap();
    let mut opts = AppOptions::default();
    opts.export.set_path(tmp.path().join("hello.txt").to_str().unwrap());
    opts.export.format = ExportFormat::Tsv;

    let written = export_records(&opts.export, &sample()).unwrap();
    assert!(written[0].to_string_lossy().ends_with("hello.txt"));
    let text = fs::read_to_string(&written[0]).unwrap();
    assert!(text.starts_with("HGLG11\t2021-01-01\t10\t0.5\t\n"));
}

#[test]
fn per_fund_writes_one_file_each() {
    let tmp = tempfile::tempdir().unwrap();
    let mut opts = AppOptions::default();
    opts.export.export_type = ExportType::PerFund;
    opts.export.set_path(tmp.path().join("funds").to_str().unwrap());

    let written = export_records(&opts.export, &sample()).unwrap();
    assert_eq!(
        written,
        vec![tmp.path().join("funds/HGLG11.csv"), tmp.path().join("funds/KNRI11.csv")]
    );
    let hglg = parse_rows(&fs::read_to_string(&written[0]).unwrap(), ',');
    assert_eq!(hglg.len(), 2);
    assert!(hglg.iter().all(|r| r[0] == "HGLG11"));
}

#[test]
fn jsonl_uses_null_for_absent_values() {
    let tmp = tempfile::tempdir().unwrap();
    let mut opts = AppOptions::default();
    opts.export.format = ExportFormat::Jsonl;
    opts.export.include_headers = true; // no effect on JSON lines
    opts.export.set_path(tmp.path().join("out").to_str().unwrap());

    let written = export_records(&opts.export, &sample()).unwrap();
    assert_eq!(written, vec![tmp.path().join("out.jsonl")]);

    let text = fs::read_to_string(&written[0]).unwrap();
    let lines: Vec<serde_json::Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["payout"], serde_json::Value::Null);
    assert_eq!(lines[1]["book_value"], serde_json::Value::Null);
    assert_eq!(lines[2]["dividend_yield"], 0.45);
    assert_eq!(lines[2]["date"], "2021-01-01");
}
