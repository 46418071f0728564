// src/specs/series.rs
//! Series *spec*: decode one chart script into a date → value map.
//!
//! The chart script is a fragment of a larger JS statement, roughly:
//!
//! ```text
//! new Chart(ctx, { data: { "labels":["Janeiro/2021","Fevereiro/2021"],
//!     "datasets":[{"label":"VP","data":[101.2,101.9]}] } });
//! ```
//!
//! It is not valid standalone JSON, so nothing here parses JSON. Both arrays
//! are found by their marker text and cut out with bracket matching; items are
//! split on top-level commas. Labels and values are then zipped by position.
//!
//! Labels are Portuguese `<Month>/<Year>` and always mean the first of the
//! month. A label that cannot be read fails the whole chart: skipping it would
//! shift every later value onto the wrong date.

use std::borrow::Cow;

use chrono::NaiveDate;

use crate::engine::SeriesMap;
use crate::error::{LengthMismatch, SeriesError};

pub const MONTHS: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
    "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

const LABELS_MARKER: [&str; 3] = ["\"labels\"", ":", "["];

/// 1-based month number for a Portuguese month name (case-insensitive).
pub fn month_number(name: &str) -> Option<u32> {
    let want = name.trim().to_lowercase();
    MONTHS
        .iter()
        .position(|m| m.to_lowercase() == want)
        .map(|i| i as u32 + 1)
}

/// Decode a chart script, logging a length mismatch as a warning.
pub fn decode(block: &str, value_field: &str) -> Result<SeriesMap, SeriesError> {
    let (map, mismatch) = decode_checked(block, value_field)?;
    if let Some(m) = mismatch {
        logw!("Series {value_field:?}: {m}");
    }
    Ok(map)
}

/// Decode a chart script and hand back any length mismatch to the caller.
pub fn decode_checked(
    block: &str,
    value_field: &str,
) -> Result<(SeriesMap, Option<LengthMismatch>), SeriesError> {
    let dates = labels(block)?;
    let vals = values(block, value_field)?;

    let mismatch = (dates.len() != vals.len())
        .then(|| LengthMismatch { labels: dates.len(), values: vals.len() });

    // Source order decides duplicates: last write wins.
    let mut map = SeriesMap::new();
    for (date, v) in dates.into_iter().zip(vals) {
        map.insert(date, v);
    }
    Ok((map, mismatch))
}

/// All dates of the `"labels":[…]` array, in source order.
pub fn labels(block: &str) -> Result<Vec<NaiveDate>, SeriesError> {
    let inner = array_after(block, &LABELS_MARKER)?;
    split_items(inner).into_iter().map(parse_label).collect()
}

/// All numbers of the `"<field>","data":[…]` array, in source order.
pub fn values(block: &str, value_field: &str) -> Result<Vec<f64>, SeriesError> {
    let field = format!("\"{value_field}\"");
    let marker = [field.as_str(), ",", "\"data\"", ":", "["];
    let inner = array_after(block, &marker)?;
    split_items(inner).into_iter().map(parse_value).collect()
}

/// `"Março/2021"` → 2021-03-01.
pub fn parse_label(token: &str) -> Result<NaiveDate, SeriesError> {
    let text = unescape_js(strip_quotes(token.trim()));
    let malformed = || SeriesError::MalformedLabel { label: text.to_string() };

    let (month, year) = text.split_once('/').ok_or_else(malformed)?;
    if year.contains('/') {
        return Err(malformed());
    }
    let m = month_number(month)
        .ok_or_else(|| SeriesError::UnknownMonth { label: text.to_string() })?;
    let y: i32 = year.trim().parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(malformed)
}

/// One numeric token. Quotes around it are tolerated; NaN and infinities are not.
pub fn parse_value(token: &str) -> Result<f64, SeriesError> {
    let t = strip_quotes(token.trim()).trim();
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SeriesError::NumericParse { token: token.trim().to_string() }),
    }
}

/* ---------- scanning helpers ---------- */

/// Find `parts` in sequence (whitespace allowed between them) and return the
/// body of the bracketed array the last part (`[`) opens.
fn array_after<'a>(block: &'a str, parts: &[&str]) -> Result<&'a str, SeriesError> {
    let marker = parts.concat();
    let open_end = find_marker(block, parts)
        .ok_or_else(|| SeriesError::MarkerNotFound { marker: marker.clone() })?;
    bracket_body(block, open_end).ok_or(SeriesError::Unterminated { marker })
}

/// End offset of the first match of `parts`, tokens separated by optional
/// whitespace.
fn find_marker(hay: &str, parts: &[&str]) -> Option<usize> {
    let (first, rest) = parts.split_first()?;
    let mut from = 0usize;

    while let Some(off) = hay[from..].find(first) {
        let start = from + off;
        let mut pos = start + first.len();
        let matched = rest.iter().all(|p| {
            pos += hay[pos..].len() - hay[pos..].trim_start().len();
            if hay[pos..].starts_with(p) {
                pos += p.len();
                true
            } else {
                false
            }
        });
        if matched {
            return Some(pos);
        }
        from = start + first.len();
    }
    None
}

/// Text from `open_end` up to the `]` that closes the already-open bracket.
/// Brackets inside quoted strings do not count.
fn bracket_body(s: &str, open_end: usize) -> Option<&str> {
    let mut depth = 1usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in s.as_bytes()[open_end..].iter().enumerate() {
        if let Some(q) = quote {
            if escaped { escaped = false; }
            else if b == b'\\' { escaped = true; }
            else if b == q { quote = None; }
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[open_end..open_end + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split an array body on commas outside quotes and nested brackets.
/// `""` → no items; a trailing comma does not make an empty last item.
fn split_items(inner: &str) -> Vec<&str> {
    if inner.trim().is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    let mut start = 0usize;

    for (i, &b) in inner.as_bytes().iter().enumerate() {
        if let Some(q) = quote {
            if escaped { escaped = false; }
            else if b == b'\\' { escaped = true; }
            else if b == q { quote = None; }
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            b'[' | b'{' => depth += 1,
            b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                items.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    let last = inner[start..].trim();
    if !last.is_empty() {
        items.push(last);
    }
    items
}

fn strip_quotes(s: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            return inner;
        }
    }
    s
}

/// Undo JS string escapes: `\/`, `\"`, `\\`, `\n`, `\uXXXX`, …
/// A `\u` not followed by exactly four hex digits is kept as written.
fn unescape_js(s: &str) -> Cow<'_, str> {
    if !s.contains('\\') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                let ch = (hex.len() == 4 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
                    .then(|| u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32))
                    .flatten();
                match ch {
                    Some(ch) => {
                        out.push(ch);
                        chars.nth(3);
                    }
                    None => out.push_str("\\u"),
                }
            }
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn script(labels: &[&str], field: &str, values: &[&str]) -> String {
        let labels: Vec<String> = labels.iter().map(|l| format!("\"{l}\"")).collect();
        format!(
            r#"var chart = new Chart(ctx, {{type:'line',data:{{"labels":[{}],"datasets":[{{"label":"{}","data":[{}]}}]}}}});"#,
            labels.join(","),
            field,
            values.join(","),
        )
    }

    #[test]
    fn every_month_maps_to_its_number() {
        for (i, name) in MONTHS.iter().enumerate() {
            let got = parse_label(&format!("\"{name}/2020\"")).unwrap();
            assert_eq!(got, d(2020, i as u32 + 1));
            assert_eq!(got.format("%Y-%m-%d").to_string(), format!("2020-{:02}-01", i + 1));
        }
    }

    #[test]
    fn marco_label() {
        assert_eq!(parse_label("\"Março/2021\"").unwrap().to_string(), "2021-03-01");
    }

    #[test]
    fn escaped_labels_decode() {
        assert_eq!(parse_label(r#""Março\/2021""#).unwrap(), d(2021, 3));
        assert_eq!(parse_label(r#""Abril\/2019""#).unwrap(), d(2019, 4));
    }

    #[test]
    fn unescape_maps_control_escapes() {
        assert_eq!(unescape_js(r"a\nb\tc\rd"), "a\nb\tc\rd");
        assert_eq!(unescape_js(r"Mar\u00e7o\/2021"), "Março/2021");
        assert_eq!(unescape_js(r#"\\\""#), "\\\"");
    }

    #[test]
    fn short_unicode_escape_is_kept_verbatim() {
        assert_eq!(unescape_js(r"x\u00"), r"x\u00");
        assert_eq!(unescape_js(r"\u00g1"), r"\u00g1");
        assert!(!unescape_js(r"Maio\u00").contains('\0'));
        assert!(matches!(parse_label(r#""Maio/2021\u00""#), Err(SeriesError::MalformedLabel { .. })));
    }

    #[test]
    fn month_lookup_ignores_case() {
        assert_eq!(month_number("MARÇO"), Some(3));
        assert_eq!(month_number("dezembro"), Some(12));
        assert_eq!(month_number("March"), None);
    }

    #[test]
    fn unknown_month_is_an_error() {
        let err = parse_label("\"Marco/2021\"").unwrap_err();
        assert_eq!(err, SeriesError::UnknownMonth { label: s!("Marco/2021") });
    }

    #[test]
    fn malformed_labels() {
        for bad in ["\"2021\"", "\"Março/20x1\"", "\"Março/2021/1\"", "\"\""] {
            assert!(
                matches!(parse_label(bad), Err(SeriesError::MalformedLabel { .. })),
                "{bad} should be malformed"
            );
        }
    }

    #[test]
    fn values_parse_and_reject() {
        assert_eq!(parse_value(" 1.25 ").unwrap(), 1.25);
        assert_eq!(parse_value("\"0.7\"").unwrap(), 0.7);
        assert_eq!(parse_value("-3").unwrap(), -3.0);
        for bad in ["null", "abc", "1,5", "NaN", ""] {
            assert!(matches!(parse_value(bad), Err(SeriesError::NumericParse { .. })), "{bad}");
        }
    }

    #[test]
    fn decode_pairs_labels_and_values() {
        let js = script(&["Janeiro/2021", "Fevereiro/2021", "Março/2021"], "VP", &["100.5", "101", "99.75"]);
        let map = decode(&js, "VP").unwrap();
        let got: Vec<(NaiveDate, f64)> = map.into_iter().collect();
        assert_eq!(got, vec![(d(2021, 1), 100.5), (d(2021, 2), 101.0), (d(2021, 3), 99.75)]);
    }

    #[test]
    fn decode_tolerates_whitespace_and_trailing_commas() {
        let js = r#"{ "labels" : [ "Maio/2022" , "Junho/2022", ],
            "datasets": [ { "label": "x" }, { "label": "Dividendos" , "data" : [ 0.8, 0.81 ] } ] }"#;
        let map = decode(js, "Dividendos").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&d(2022, 6)], 0.81);
    }

    #[test]
    fn decode_picks_the_named_dataset() {
        let js = r#""labels":["Julho/2020"],"datasets":[{"label":"Dividend Yield","data":[0.55]},{"label":"VP","data":[88.1]}]"#;
        assert_eq!(decode(js, "VP").unwrap()[&d(2020, 7)], 88.1);
        assert_eq!(decode(js, "Dividend Yield").unwrap()[&d(2020, 7)], 0.55);
    }

    #[test]
    fn length_mismatch_truncates_without_error() {
        let js = script(&["Janeiro/2021", "Fevereiro/2021", "Março/2021"], "VP", &["1", "2"]);
        let (map, mismatch) = decode_checked(&js, "VP").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(mismatch, Some(LengthMismatch { labels: 3, values: 2 }));
        assert!(!map.contains_key(&d(2021, 3)));

        let js = script(&["Janeiro/2021"], "VP", &["1", "2", "3"]);
        let (map, mismatch) = decode_checked(&js, "VP").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(mismatch.map(|m| m.kept()), Some(1));
    }

    #[test]
    fn duplicate_dates_last_write_wins() {
        let js = script(&["Janeiro/2021", "Janeiro/2021"], "VP", &["1", "2"]);
        let map = decode(&js, "VP").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&d(2021, 1)], 2.0);
    }

    #[test]
    fn empty_arrays_give_empty_map() {
        let js = script(&[], "VP", &[]);
        let (map, mismatch) = decode_checked(&js, "VP").unwrap();
        assert!(map.is_empty());
        assert_eq!(mismatch, None);
    }

    #[test]
    fn missing_markers() {
        let js = script(&["Janeiro/2021"], "VP", &["1"]);
        assert!(matches!(decode(&js, "Dividendos"), Err(SeriesError::MarkerNotFound { .. })));
        assert!(matches!(decode("var x = 1;", "VP"), Err(SeriesError::MarkerNotFound { .. })));
    }

    #[test]
    fn unterminated_array() {
        let js = r#""labels":["Janeiro/2021","#;
        assert!(matches!(labels(js), Err(SeriesError::Unterminated { .. })));
    }

    #[test]
    fn bad_label_fails_whole_chart() {
        let js = script(&["Janeiro/2021", "Foo/2021"], "VP", &["1", "2"]);
        assert!(matches!(decode(&js, "VP"), Err(SeriesError::UnknownMonth { .. })));
    }

    #[test]
    fn bad_value_fails_whole_chart() {
        let js = script(&["Janeiro/2021", "Fevereiro/2021"], "VP", &["1", "n/a"]);
        assert_eq!(
            decode(&js, "VP").unwrap_err(),
            SeriesError::NumericParse { token: s!("n/a") }
        );
    }

    #[test]
    fn bracket_body_ignores_quoted_brackets() {
        let s = r#"[ "a]b", ["c"], 'd]' ] tail"#;
        assert_eq!(bracket_body(s, 1), Some(r#" "a]b", ["c"], 'd]' "#));
    }

    #[test]
    fn split_items_respects_quotes() {
        assert_eq!(split_items(r#""a,b", "c""#), vec![r#""a,b""#, r#""c""#]);
        assert_eq!(split_items("  "), Vec::<&str>::new());
    }

    #[test]
    fn round_trip_pairs() {
        let pairs = [
            ("Outubro", 2019, 10u32, "12.5"),
            ("Novembro", 2019, 11, "0.003"),
            ("Dezembro", 2019, 12, "-7.25"),
            ("Janeiro", 2020, 1, "1000000.125"),
        ];
        let labels: Vec<String> = pairs.iter().map(|(m, y, _, _)| format!("{m}/{y}")).collect();
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        let values: Vec<&str> = pairs.iter().map(|p| p.3).collect();
        let js = script(&labels, "VP", &values);

        let map = decode(&js, "VP").unwrap();
        for (_, y, m, v) in pairs {
            assert_eq!(map[&d(y, m)], v.parse::<f64>().unwrap());
        }
    }
}
