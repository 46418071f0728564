// src/specs/chart.rs
//! Chart *spec*: find the script payload of one chart on a fund page.
//!
//! Each chart sits in a wrapper element with a stable id, e.g.
//! `<div id="yields-chart-wrapper"> … <script>new Chart(…)</script> … </div>`.
//! The id is matched as an attribute value on a real tag and the container's
//! extent comes from nesting, so the same text elsewhere on the page (menu
//! links, a longer id, a string in another script) never matches.

use crate::core::html;

/// Script text of the chart inside the element with id `chart_id`.
///
/// `None` when no element carries that id or none of them holds a script
/// with a body. That is a normal outcome: not every fund publishes every chart.
pub fn locate<'a>(page: &'a str, chart_id: &str) -> Option<&'a str> {
    let mut from = 0usize;
    while let Some((start, end)) = html::element_by_id_from(page, chart_id, from) {
        if let Some(js) = html::first_script_text(&page[start..end]) {
            return Some(js);
        }
        // Duplicate ids happen on sloppy pages; keep looking past this one.
        from = if end > start { end } else { start + 1 };
    }
    None
}
