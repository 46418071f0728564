// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

use crate::engine::ReconciledRecord;

/* ---------------- Parsing ---------------- */

/// Minimal CSV/TSV parser (quotes + CRLF tolerant). Empty cells survive,
/// so absent metrics round-trip as `""`.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Full delimited text for a table.
/// - `headers`: emitted only when present *and* `include_headers` is set
/// - `sep`: field separator
pub fn to_export_string(
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
    include_headers: bool,
    sep: char,
) -> String {
    let mut buf: Vec<u8> = Vec::new();

    if include_headers {
        if let Some(h) = headers {
            let _ = write_row(&mut buf, h, sep);
        }
    }
    for r in rows {
        let _ = write_row(&mut buf, r, sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

/// One JSON object per line; absent metrics are `null`.
pub fn to_jsonl_string(records: &[ReconciledRecord]) -> Result<String, serde_json::Error> {
    let mut out = s!();
    for r in records {
        out.push_str(&serde_json::to_string(r)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(payout: Option<f64>) -> ReconciledRecord {
        ReconciledRecord {
            fund: s!("HGLG11"),
            date: NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(),
            book_value: Some(10.0),
            dividend_yield: Some(0.5),
            payout,
        }
    }

    #[test]
    fn quotes_only_when_needed() {
        let mut buf = Vec::new();
        write_row(&mut buf, &[s!("a,b"), s!("say \"hi\""), s!("")], ',').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "\"a,b\",\"say \"\"hi\"\"\",\n");
    }

    #[test]
    fn headers_only_when_asked() {
        let headers = Some(ReconciledRecord::headers());
        let rows = vec![rec(None).to_row()];
        let with = to_export_string(&headers, &rows, true, ',');
        let without = to_export_string(&headers, &rows, false, ',');
        assert_eq!(with, "fund,date,book_value,dividend_yield,payout\nHGLG11,2021-02-01,10,0.5,\n");
        assert_eq!(without, "HGLG11,2021-02-01,10,0.5,\n");
    }

    #[test]
    fn parse_keeps_trailing_empty_cell() {
        let rows = parse_rows("HGLG11\t2021-02-01\t10\t0.5\t\r\n", '\t');
        assert_eq!(rows, vec![vec!["HGLG11", "2021-02-01", "10", "0.5", ""]]);
    }

    #[test]
    fn jsonl_uses_null_for_absent() {
        let text = to_jsonl_string(&[rec(None), rec(Some(1.25))]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            r#"{"fund":"HGLG11","date":"2021-02-01","book_value":10.0,"dividend_yield":0.5,"payout":null}"#
        );
        assert!(lines[1].ends_with(r#""payout":1.25}"#));
    }
}
