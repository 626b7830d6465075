//! Flat-file inventory cache.
//!
//! The cache is a UTF-8 CSV table, one row per instance, overwritten
//! wholesale on every refresh. An absent, empty or malformed file all mean
//! the same thing to callers: the inventory needs a live refetch. They are
//! logged as distinct conditions.

use std::fs;
use std::future::Future;
use std::path::Path;

use yansi::Paint;

use crate::error::{JumpError, Result};
use crate::record::InstanceRecord;

/// Read the cached inventory. `None` means "needs refresh", never an error.
pub fn load(path: &Path) -> Option<Vec<InstanceRecord>> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "cache file not found");
        return None;
    }

    let mut reader = match csv::Reader::from_path(path) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(path = %path.display(), %e, "cache file unreadable, treating as absent");
            return None;
        }
    };

    let mut records = Vec::new();
    for row in reader.deserialize::<InstanceRecord>() {
        match row {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "cache file malformed, treating as absent");
                return None;
            }
        }
    }

    if records.is_empty() {
        tracing::warn!(path = %path.display(), "cache file has no instance rows, treating as absent");
        return None;
    }

    tracing::info!(count = records.len(), path = %path.display(), "loaded instances from cache");
    Some(records)
}

/// Write the inventory, replacing any existing cache. Callers only invoke
/// this with a non-empty record set.
pub fn save(path: &Path, records: &[InstanceRecord]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| JumpError::CacheWrite(e.to_string()))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| JumpError::CacheWrite(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| JumpError::CacheWrite(e.to_string()))?;
    tracing::info!(count = records.len(), path = %path.display(), "instance data saved to cache");
    Ok(())
}

/// Remove the cache file so the next read forces a live refetch. Removal
/// failures are logged, not raised.
pub fn invalidate(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(e) = fs::remove_file(path) {
        tracing::error!(path = %path.display(), %e, "failed to remove cache file");
    } else {
        tracing::info!(path = %path.display(), "removed cache file");
    }
}

/// Cache policy: serve from the cache unless a refresh was forced or the
/// cache needs one, then fetch live. A fetch that fails or finds nothing
/// leaves no stale cache behind; both outcomes collapse to an empty
/// inventory here (and only here), with distinct messages.
pub async fn load_or_refresh<F, Fut>(path: &Path, force: bool, fetch: F) -> Vec<InstanceRecord>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<InstanceRecord>>>,
{
    if !force {
        if let Some(records) = load(path) {
            println!(
                "Cache file found: {}. Loaded {} instances.",
                path.display(),
                records.len()
            );
            return records;
        }
        println!("No usable cache at {}. Fetching live inventory...", path.display());
    } else {
        println!("Forcing refresh...");
    }

    match fetch().await {
        Ok(records) if !records.is_empty() => {
            println!("Fetched {} running instances.", records.len());
            match save(path, &records) {
                Ok(()) => println!("Instance data saved to cache file: {}", path.display()),
                Err(e) => {
                    tracing::error!(%e, "could not write cache");
                    eprintln!(
                        "{}: {}",
                        Paint::new("Could not write instance data to cache").red(),
                        e
                    );
                }
            }
            records
        }
        Ok(_) => {
            println!("No running instances found.");
            remove_outdated(path);
            Vec::new()
        }
        Err(e) => {
            tracing::error!(%e, "inventory fetch failed");
            eprintln!("{}: {}", Paint::new("Failed to fetch instances").red(), e);
            remove_outdated(path);
            Vec::new()
        }
    }
}

fn remove_outdated(path: &Path) {
    if path.exists() {
        invalidate(path);
        println!(
            "Removed potentially outdated cache file: {}",
            path.display()
        );
    }
}
