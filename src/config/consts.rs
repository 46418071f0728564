// src/config/consts.rs
use crate::engine::Metric;

// Net config
pub const FUND_LIST_URL: &str = "https://fiis.com.br/lista-de-fundos-imobiliarios/";
pub const FUND_URL_TEMPLATE: &str = "https://www.fundsexplorer.com.br/funds/{fund}";
pub const USER_AGENT: &str = concat!("fii_scrape/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 20;
pub const RETRIES: u32 = 2;
pub const RETRY_BACKOFF_MS: u64 = 500;

// Charts embedded in each fund page: (metric, container id, dataset label)
pub const CHARTS: [(Metric, &str, &str); 3] = [
    (Metric::BookValue, "patrimonial-value-chart-wrapper", "VP"),
    (Metric::DividendYield, "yields-chart-wrapper", "Dividend Yield"),
    (Metric::Payout, "dividends-chart-wrapper", "Dividendos"),
];

// Local cache
pub const STORE_DIR: &str = ".store";
pub const FUNDS_CACHE_FILE: &str = "funds.txt";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "fiis";

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 250; // be polite
pub const JITTER_MS: u64 = 100; // extra 0..100 ms
