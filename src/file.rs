// src/file.rs

use std::{
    collections::{BTreeMap, HashMap},
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use crate::config::options::{ExportFormat, ExportOptions, ExportType};
use crate::core::sanitize::sanitize_fund_filename;
use crate::csv::{to_export_string, to_jsonl_string};
use crate::engine::ReconciledRecord;
use crate::store::DataSet;

/// Write records according to `ExportOptions` (layout, format, headers).
/// Returns every path written to.
pub fn export_records(
    export: &ExportOptions,
    records: &[ReconciledRecord],
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    match export.export_type {
        ExportType::SingleFile => Ok(vec![write_export_single(export, records)?]),
        ExportType::PerFund => write_export_per_fund(export, records),
    }
}

/// Write a single export file at `export.out_path()`.
pub fn write_export_single(
    export: &ExportOptions,
    records: &[ReconciledRecord],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = export.out_path();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    fs::write(&path, render(export, records)?)?;
    logd!("Export: {} rows → {}", records.len(), path.display());
    Ok(path)
}

/// One file per fund inside the directory `export.out_path()`.
pub fn write_export_per_fund(
    export: &ExportOptions,
    records: &[ReconciledRecord],
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let outdir = export.out_path();
    ensure_directory(&outdir)?;

    let mut by_fund: BTreeMap<&str, Vec<ReconciledRecord>> = BTreeMap::new();
    for r in records {
        by_fund.entry(r.fund.as_str()).or_default().push(r.clone());
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::with_capacity(by_fund.len());
    let ext = export.format.ext();

    for (fund, fund_rows) in by_fund {
        let stem = sanitize_fund_filename(fund);
        let path = resolve_fund_filename(&outdir, &stem, &mut seen, ext);
        fs::write(&path, render(export, &fund_rows)?)?;
        written.push(path);
    }

    logd!("Export: {} files → {}", written.len(), outdir.display());
    Ok(written)
}

fn render(export: &ExportOptions, records: &[ReconciledRecord]) -> Result<String, Box<dyn Error>> {
    match (export.format, export.delimiter()) {
        (ExportFormat::Jsonl, _) | (_, None) => Ok(to_jsonl_string(records)?),
        (_, Some(sep)) => {
            let data = DataSet::from_records(records);
            Ok(to_export_string(&data.headers, &data.rows, export.include_headers, sep))
        }
    }
}

pub fn ensure_directory(dir: &Path) -> Result<(), Box<dyn Error>> {
    if dir.exists() && !dir.is_dir() {
        return Err(format!("Path exists but is not a directory: {}", dir.display()).into());
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Duplicate handling **only within this run**
pub fn resolve_fund_filename(
    dir: &Path,
    stem: &str,                        // already sanitized, no extension
    seen_names: &mut HashMap<String, usize>,
    ext: &str,                         // "csv" | "tsv" | "jsonl"
) -> PathBuf {
    let count = seen_names.entry(stem.to_string()).or_insert(0);

    // First occurrence: "<stem>.ext"
    // Subsequent:       "<stem> (N).ext" with N starting at 2
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };

    *count += 1;
    dir.join(filename)
}
