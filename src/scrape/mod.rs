// src/scrape/mod.rs
mod scrape;
pub use scrape::{ collect_funds, resolve_funds, scrape_funds, HttpSource, PageSource, ScrapeSummary };
