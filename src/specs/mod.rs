//! # Scraping “specs” module
//!
//! Page-specific extraction for the two pages the crawler reads. Each spec
//! encodes *where the ground truth lives in the page text* and *how to pull it
//! out without a DOM*.
//!
//! ## What lives here
//! - **`funds`**: the listing page → fund codes, plus the detail URL template.
//! - **`chart`** (Series Locator): detail page + chart id → the chart's script.
//! - **`series`** (Series Decoder): chart script + dataset label → date→value map,
//!   including Portuguese month/year label normalization.
//!
//! ## What does **not** live here
//! - **Joining metrics** by date and the per-fund all-or-nothing gate
//!   (`engine`).
//! - **Scheduling, caching, export** (`scrape`, `funds`, `file`).
//!
//! ## Typical call chain
//! ```text
//! cli → scrape::collect_funds → PageSource::fetch
//!                             ↘ engine::process_page → chart::locate
//!                                                    → series::decode  (×3)
//!                                                    → engine::reconcile
//!                  file::export_records
//! ```
//!
//! ## Conventions & invariants
//! - Tag and attribute names are matched case-insensitively; ids exactly.
//! - Chart scripts are scanned as delimited text, never parsed as JSON: they
//!   are fragments of a larger JS statement.
//! - Chart absence is `None`, not an error. Unreadable chart data is an error.
//!
//! ## Testing notes
//! - Every spec is testable offline against inline fixtures or
//!   `tests/fixtures/*.html`.
pub mod chart;
pub mod funds;
pub mod series;
