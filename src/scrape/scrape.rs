// src/scrape/scrape.rs
use std::{
    error::Error, thread, time::Duration,
    sync::{ mpsc, Arc, atomic::{ AtomicUsize, Ordering }}
};

use crate::{
    config::options::{ FundSelector, ScrapeOptions },
    config::consts::JITTER_MS,
    core::net::{ self, FetchError },
    engine::{ self, FundReport, FundStatus, ReconciledRecord },
    progress::Progress,
    specs::funds::{ detail_url, is_fund_code },
    funds,
};

/// Where fund pages come from. The pool only needs text per fund code.
pub trait PageSource: Send + Sync {
    fn fetch(&self, fund: &str) -> Result<String, FetchError>;
}

/// Live detail pages over HTTP.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpSource;

impl PageSource for HttpSource {
    fn fetch(&self, fund: &str) -> Result<String, FetchError> {
        net::http_get(&detail_url(fund))
    }
}

/// Outcome of one run over many funds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrapeSummary {
    /// Sorted by (fund, date).
    pub records: Vec<ReconciledRecord>,
    pub complete: Vec<String>,
    /// (fund, reason): page fetched, zero records emitted.
    pub suppressed: Vec<(String, String)>,
    /// (fund, error): page could not be fetched.
    pub failed: Vec<(String, String)>,
}

/// Fund codes for a selector. Explicit codes are uppercased and deduplicated;
/// `All` goes through the cached fund list.
pub fn resolve_funds(sel: &FundSelector, refresh: bool) -> Result<Vec<String>, Box<dyn Error>> {
    match sel {
        FundSelector::All => funds::load(refresh),
        FundSelector::Codes(v) => {
            let mut out = Vec::with_capacity(v.len());
            for code in v {
                let code = code.trim().to_ascii_uppercase();
                if code.is_empty() { continue; }
                if !is_fund_code(&code) {
                    return Err(format!("Not a fund code: {code:?}").into());
                }
                out.push(code);
            }
            out.sort_unstable();
            out.dedup();
            Ok(out)
        }
    }
}

/// Resolve the selection and scrape it from the live site.
pub fn scrape_funds(
    scrape: &ScrapeOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<ScrapeSummary, Box<dyn Error>> {
    let funds = resolve_funds(&scrape.funds, scrape.refresh_funds)?;
    if funds.is_empty() {
        return Err("No funds selected".into());
    }
    Ok(collect_funds(scrape, funds, Arc::new(HttpSource), progress))
}

/// Fetch and process every fund with a small worker pool.
/// A failing fund never affects the others.
pub fn collect_funds<S>(
    scrape: &ScrapeOptions,
    funds: Vec<String>,
    source: Arc<S>,
    mut progress: Option<&mut dyn Progress>,
) -> ScrapeSummary
where
    S: PageSource + ?Sized + 'static,
{
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Fetching {} fund page(s)…", funds.len()));
        p.begin(funds.len());
    }

    // Concurrency
    type FetchErr = (String, String);

    let funds_arc = Arc::new(funds);
    let counter = Arc::new(AtomicUsize::new(0));
    let (res_tx, res_rx) = mpsc::channel::<Result<FundReport, FetchErr>>();

    let workers = scrape.workers.min(funds_arc.len()).max(1);
    let pause_ms = scrape.pause_ms;

    // Spawn workers

    for _ in 0..workers {
        let funds = Arc::clone(&funds_arc);
        let idx = Arc::clone(&counter);
        let source = Arc::clone(&source);
        let tx = res_tx.clone();

        thread::spawn(
            move || {
                loop {
                    let i = idx.fetch_add(1, Ordering::Relaxed);
                    if i >= funds.len() {
                        break;
                    }
                    let fund = &funds[i];
                    let result = match source.fetch(fund) {
                        Ok(page) => Ok(engine::process_page(fund, &page)),
                        Err(e) => Err((fund.clone(), e.to_string())),
                    };
                    if tx.send(result).is_err() {
                        break;
                    }
                    if pause_ms > 0 {
                        let jitter = (i as u64 * 37) % JITTER_MS;
                        thread::sleep(Duration::from_millis(pause_ms + jitter)); // be polite
                    }
                }
            }
        );
    }
    drop(res_tx); // main thread is sole receiver now

    // Aggregate results
    let mut summary = ScrapeSummary::default();

    for _ in 0..funds_arc.len() {
        match res_rx.recv() {
            Ok(Ok(report)) => {
                let FundReport { fund, mut records, status, warnings } = report;
                if !warnings.is_empty() {
                    logd!("{fund}: {} data-quality warning(s)", warnings.len());
                }
                match status {
                    FundStatus::Complete => {
                        logd!("{fund}: {} records", records.len());
                        summary.records.append(&mut records);
                        summary.complete.push(fund.clone());
                    }
                    FundStatus::Suppressed { reason } => {
                        logw!("{fund}: suppressed ({reason})");
                        summary.suppressed.push((fund.clone(), reason));
                    }
                }
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&fund);
                }
            }
            Ok(Err((fund, msg))) => {
                loge!("{fund}: {msg}");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&fund);
                }
                summary.failed.push((fund, msg));
            }
            Err(_) => break, // workers ended early; bail gracefully
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    // Sort
    summary.records.sort_by(|a, b| a.fund.cmp(&b.fund).then(a.date.cmp(&b.date)));
    summary.complete.sort_unstable();
    summary.suppressed.sort_unstable();
    summary.failed.sort_unstable();

    summary
}
