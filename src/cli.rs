// src/cli.rs
use std::{error::Error, fs, path::PathBuf};

use clap::{builder::TypedValueParser, Parser, ValueEnum};

use crate::config::options::{AppOptions, ExportFormat, ExportType, FundSelector};
use crate::engine::{self, FundStatus};
use crate::progress::Progress;
use crate::{file, funds, scrape};

#[derive(Parser, Debug)]
#[command(
    name = "fii_scrape",
    about = "Monthly book value, dividend yield and payout history for Brazilian real-estate funds",
    version
)]
pub struct Cli {
    /// Fund codes, comma separated (e.g. HGLG11,KNRI11).
    #[arg(long, value_delimiter = ',', conflicts_with = "all")]
    pub funds: Vec<String>,

    /// Every fund on the listing page (default when no --funds).
    #[arg(short, long)]
    pub all: bool,

    /// Print the fund list and exit.
    #[arg(long)]
    pub list_funds: bool,

    /// Re-read the listing page instead of the cached fund list.
    #[arg(long)]
    pub refresh: bool,

    /// Process a saved fund page instead of fetching (needs --fund).
    #[arg(long, requires = "fund", conflicts_with_all = ["funds", "all"])]
    pub page: Option<PathBuf>,

    /// Fund code the saved page belongs to.
    #[arg(long, requires = "page")]
    pub fund: Option<String>,

    /// Output file, or directory with --per-fund.
    #[arg(short, long)]
    pub out: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,

    /// Write a header line (CSV/TSV).
    #[arg(long)]
    pub include_headers: bool,

    /// One file per fund.
    #[arg(long)]
    pub per_fund: bool,

    /// Concurrent page fetches.
    #[arg(long, default_value_t = crate::config::consts::WORKERS,
          value_parser = clap::value_parser!(u16).range(1..=32).map(usize::from))]
    pub workers: usize,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Tsv,
    Jsonl,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => ExportFormat::Csv,
            Format::Tsv => ExportFormat::Tsv,
            Format::Jsonl => ExportFormat::Jsonl,
        }
    }
}

impl Cli {
    pub fn to_options(&self) -> AppOptions {
        let mut opts = AppOptions::default();

        opts.scrape.funds = if self.all || self.funds.is_empty() {
            FundSelector::All
        } else {
            FundSelector::Codes(self.funds.clone())
        };
        opts.scrape.workers = self.workers;
        opts.scrape.refresh_funds = self.refresh;

        opts.export.format = self.format.into();
        opts.export.include_headers = self.include_headers;
        // layout first: set_path reads it
        if self.per_fund {
            opts.export.export_type = ExportType::PerFund;
        }
        if let Some(o) = &self.out {
            opts.export.set_path(o);
        }
        opts
    }
}

pub fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let opts = cli.to_options();

    if cli.list_funds {
        for code in funds::load(opts.scrape.refresh_funds)? {
            println!("{code}");
        }
        return Ok(());
    }

    let records = match (&cli.page, &cli.fund) {
        (Some(path), Some(fund)) => {
            let page = fs::read_to_string(path)
                .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
            let fund = fund.trim().to_ascii_uppercase();
            let report = engine::process_page(&fund, &page);
            if let FundStatus::Suppressed { reason } = &report.status {
                return Err(format!("{fund}: no records ({reason})").into());
            }
            report.records
        }
        _ => {
            let mut progress = ConsoleProgress::default();
            let summary = scrape::scrape_funds(&opts.scrape, Some(&mut progress))?;
            logf!(
                "Done: {} complete, {} suppressed, {} failed, {} records",
                summary.complete.len(),
                summary.suppressed.len(),
                summary.failed.len(),
                summary.records.len()
            );
            if summary.complete.is_empty() && !summary.failed.is_empty() {
                return Err(format!("All {} fund page(s) failed to load", summary.failed.len()).into());
            }
            summary.records
        }
    };

    for path in file::export_records(&opts.export, &records)? {
        logf!("Wrote {}", path.display());
    }
    Ok(())
}

/// Progress lines on stderr.
#[derive(Default)]
pub struct ConsoleProgress {
    done: usize,
    failed: usize,
    total: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, fund: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {fund}", self.done + self.failed, self.total);
    }
    fn item_failed(&mut self, fund: &str) {
        self.failed += 1;
        eprintln!("[{}/{}] {fund} FAILED", self.done + self.failed, self.total);
    }
    fn finish(&mut self) {
        if self.failed == 0 {
            eprintln!("Fetch complete ({}/{})", self.done, self.total);
        } else {
            eprintln!("Fetch complete ({}/{}, {} failed)", self.done, self.total, self.failed);
        }
    }
}
