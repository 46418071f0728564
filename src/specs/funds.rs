// src/specs/funds.rs
//! Scraping *spec* for the fund directory.
//!
//! Purpose:
//! - Parse the **listing page** and extract every fund code, i.e. the text of
//!   each `<span class="ticker">HGLG11</span>`.
//! - Build the per-fund **detail page URL** from the fixed template.
//!
//! Non-Responsibilities:
//! - **No caching** (see `crate::funds`).
//! - **No chart parsing** (see `specs::chart` and `specs::series`).

use std::error::Error;

use crate::config::consts::{FUND_LIST_URL, FUND_URL_TEMPLATE};
use crate::core::html::{self, strip_tags};
use crate::core::net;
use crate::core::sanitize::normalize_entities;

pub fn fetch() -> Result<Vec<String>, Box<dyn Error>> {
    let doc = net::http_get(FUND_LIST_URL)?;
    let t = std::time::Instant::now();
    let codes = parse_list(&doc);
    logd!("Funds: parsed {} codes in {:?}", codes.len(), t.elapsed());
    if codes.is_empty() {
        return Err("no fund codes found on listing page; layout may have changed".into());
    }
    Ok(codes)
}

/// All fund codes on the listing page: uppercased, sorted, deduplicated.
pub fn parse_list(doc: &str) -> Vec<String> {
    let mut codes: Vec<String> = html::tags(doc, 0)
        .filter(|t| !t.closing && t.name.eq_ignore_ascii_case("span") && html::has_class(t.attrs, "ticker"))
        .filter_map(|t| {
            let text = strip_tags(normalize_entities(html::text_until_close(doc, &t)));
            let code = text.to_ascii_uppercase();
            if is_fund_code(&code) {
                Some(code)
            } else {
                logd!("Funds: skipping ticker text {text:?}");
                None
            }
        })
        .collect();

    codes.sort_unstable();
    codes.dedup();
    codes
}

/// Exchange tickers are short ASCII alphanumerics, e.g. `HGLG11`, `KNRI11`.
pub fn is_fund_code(s: &str) -> bool {
    (4..=12).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Detail page for one fund.
pub fn detail_url(code: &str) -> String {
    FUND_URL_TEMPLATE.replace("{fund}", code)
}
