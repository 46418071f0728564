// src/funds.rs

use std::error::Error;

use crate::config::consts::FUNDS_CACHE_FILE;
use crate::specs;
use crate::store;

/// Fund codes from the local cache, or from the listing page when the cache
/// is missing, unreadable, empty, or `refresh` is set. A live fetch rewrites
/// the cache.
pub fn load(refresh: bool) -> Result<Vec<String>, Box<dyn Error>> {
    if !refresh {
        match store::load_lines(FUNDS_CACHE_FILE) {
            Ok(list) if !list.is_empty() => {
                logd!("Funds: {} codes from cache", list.len());
                return Ok(list);
            }
            Ok(_) => logd!("Funds: cache empty"),
            Err(e) => logd!("Funds: no cache ({e})"),
        }
    }

    // fallback to live fetch
    let funds = specs::funds::fetch()?;
    if let Err(e) = store::save_lines(FUNDS_CACHE_FILE, &funds) {
        logw!("Funds: could not write cache: {e}");
    }
    logf!("Funds: {} codes from listing page", funds.len());
    Ok(funds)
}
