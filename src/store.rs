// src/store.rs
use std::{fs, io, path::PathBuf};

use crate::config::consts::STORE_DIR;
use crate::engine::ReconciledRecord;

/// Flat string table handed to the export layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn from_records(records: &[ReconciledRecord]) -> Self {
        Self {
            headers: Some(ReconciledRecord::headers()),
            rows: records.iter().map(ReconciledRecord::to_row).collect(),
        }
    }
}

/// `<STORE_DIR>/<name>`
pub fn store_path(name: &str) -> PathBuf {
    PathBuf::from(STORE_DIR).join(name)
}

/// Read a cached list, one entry per line. Blank lines are skipped.
pub fn load_lines(name: &str) -> io::Result<Vec<String>> {
    let text = fs::read_to_string(store_path(name))?;
    Ok(text.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect())
}

/// Replace a cached list, creating the store directory if needed.
pub fn save_lines(name: &str, lines: &[String]) -> io::Result<()> {
    let p = store_path(name);
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut buf = s!();
    for l in lines {
        buf.push_str(l);
        buf.push('\n');
    }
    fs::write(p, buf)
}
