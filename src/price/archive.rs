//! Date-partitioned local price archive: write today's partition, merge
//! reruns with last-write-wins, prune partitions outside the retention
//! window, and load the window as a lazy scan.

use crate::config;
use crate::error::{CardatlasError, Result};
use crate::parquet_io;
use chrono::NaiveDate;
use polars::prelude::*;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Bounded parallelism for partition uploads (independent network PUTs, no
/// shared mutable state besides the archive directory each worker reads
/// from under its own distinct path).
const SYNC_WORKERS: usize = 16;
const UPLOAD_RETRIES: u32 = 3;

/// Remote partition store for the shared price archive. The object store
/// itself is an external collaborator (mirrors [`crate::cache::SourceProvider`]);
/// this trait is the seam a caller's S3/GCS/etc. client implements.
pub trait ObjectStoreClient: Sync {
    /// Every remote partition date currently stored, as `YYYY-MM-DD` strings.
    fn list_remote_partitions(&self) -> Result<Vec<String>>;
    /// Raw bytes of a remote partition's `data.parquet`.
    fn download_partition(&self, date: &str) -> Result<Vec<u8>>;
    /// Upload a local partition's `data.parquet` bytes.
    fn upload_partition(&self, date: &str, bytes: &[u8]) -> Result<()>;
}

/// Build sequence step 1: migrate a legacy single-file price archive (every
/// historical row in one `prices.parquet` under the cache root, predating
/// the date-partitioned layout) into `prices/date=YYYY-MM-DD/data.parquet`
/// partitions, one per distinct `date` value, merging into any partition
/// that already exists the same way a same-day rerun does. No-op if no
/// legacy file is present. Idempotent: the legacy file is renamed aside once
/// migrated, so a second call (nothing left to migrate) is also a no-op.
pub fn migrate_legacy_archive(cache_root: &Path) -> Result<()> {
    let legacy_path = config::legacy_price_archive_path(cache_root);
    if !legacy_path.exists() {
        return Ok(());
    }

    tracing::info!(
        path = %legacy_path.display(),
        "migrating legacy single-file price archive into date partitions"
    );
    let legacy = parquet_io::scan_parquet(&legacy_path)?.collect()?;
    let dates: std::collections::BTreeSet<String> = legacy
        .column("date")?
        .str()?
        .into_iter()
        .filter_map(|v| v.map(str::to_string))
        .collect();

    for date in &dates {
        let day = legacy.clone().lazy().filter(col("date").eq(lit(date.as_str())));
        write_daily_partition(day, cache_root, date)?;
    }

    fs::rename(&legacy_path, legacy_path.with_extension("parquet.migrated"))?;
    Ok(())
}

/// Build sequence step 2: download any remote partition missing locally,
/// within the retention window. Runs before today's fetch so a cache root
/// that's behind the shared archive catches up before this run adds to it.
pub fn sync_down(cache_root: &Path, client: &dyn ObjectStoreClient, today: NaiveDate) -> Result<()> {
    let cutoff = today - chrono::Duration::days(config::PRICE_ARCHIVE_RETENTION_DAYS);

    for date_str in client.list_remote_partitions()? {
        let Ok(date) = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") else {
            continue;
        };
        if date < cutoff || date > today {
            continue;
        }

        let dest = config::price_partition_path(cache_root, &date_str);
        if dest.exists() {
            continue;
        }

        let bytes = client.download_partition(&date_str)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, bytes)?;
    }
    Ok(())
}

/// Build sequence step 5: upload partitions to the shared object store in a
/// bounded 16-worker pool, retrying each upload 3x with exponential backoff.
/// A partition still failing after retries is logged and skipped, never
/// aborts the build — the next run re-attempts it.
pub fn sync_up(cache_root: &Path, client: &dyn ObjectStoreClient, dates: &[String]) -> Result<()> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(SYNC_WORKERS)
        .build()
        .map_err(|e| CardatlasError::InvalidArgument(format!("object-store sync thread pool: {e}")))?;

    pool.install(|| {
        dates.par_iter().for_each(|date_str| {
            let path = config::price_partition_path(cache_root, date_str);
            let bytes = match fs::read(&path) {
                Ok(b) => b,
                Err(err) => {
                    tracing::warn!(date = %date_str, error = %err, "local partition missing for upload; skipping");
                    return;
                }
            };

            let mut attempt: u32 = 0;
            loop {
                match client.upload_partition(date_str, &bytes) {
                    Ok(()) => break,
                    Err(err) if attempt + 1 < UPLOAD_RETRIES => {
                        attempt += 1;
                        thread::sleep(Duration::from_millis(200 * 2u64.pow(attempt)));
                    }
                    Err(err) => {
                        let wrapped = CardatlasError::ObjectStoreUpload {
                            partition: date_str.clone(),
                            detail: err.to_string(),
                        };
                        tracing::warn!(error = %wrapped, "partition upload failed after retries; next run will re-attempt");
                        break;
                    }
                }
            }
        });
    });

    Ok(())
}

/// Columns that make a price row unique; a rerun on the same date produces
/// rows with the same key but possibly a different `price`, and the later
/// fetch wins.
const COMPOSITE_KEY: [&str; 6] = ["uuid", "date", "source", "provider", "priceType", "finish"];

/// Write today's frame to its partition, merging with whatever is already
/// there for the same date (a rerun on the same day) by keeping the last
/// row per composite key.
pub fn write_daily_partition(today: LazyFrame, cache_root: &Path, date: &str) -> Result<()> {
    let dest = config::price_partition_path(cache_root, date);
    let merged = if dest.exists() {
        let existing = parquet_io::scan_parquet(&dest)?;
        dedup_last_write_wins(concat([existing, today], UnionArgs::default())?)
    } else {
        today
    };
    let mut df = merged.collect()?;
    parquet_io::write_parquet_atomic(&mut df, &dest)
}

/// Relies on `today`'s rows being concatenated after the existing archive
/// rows: a per-group `last()` then picks the rerun's value over the stale
/// one without needing an explicit row-order column.
fn dedup_last_write_wins(lf: LazyFrame) -> LazyFrame {
    lf.group_by(COMPOSITE_KEY.iter().map(|k| col(*k)).collect::<Vec<_>>())
        .agg([col("*").exclude(COMPOSITE_KEY).last()])
}

/// Delete any `prices/date=YYYY-MM-DD/` partition older than the retention
/// window, counted back from `today`.
pub fn prune_old_partitions(cache_root: &Path, today: NaiveDate) -> Result<()> {
    let prices_dir = cache_root.join("prices");
    if !prices_dir.exists() {
        return Ok(());
    }
    let cutoff = today - chrono::Duration::days(config::PRICE_ARCHIVE_RETENTION_DAYS);

    for entry in fs::read_dir(&prices_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(date_str) = name.strip_prefix("date=") else { continue };
        let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") else { continue };
        if date < cutoff {
            fs::remove_dir_all(entry.path())?;
        }
    }
    Ok(())
}

/// Load the 90-day retention window as a single lazy scan over every
/// partition directory still on disk (already pruned, so this is the whole
/// local archive).
pub fn load_window(cache_root: &Path) -> Result<LazyFrame> {
    let prices_dir = cache_root.join("prices");
    if !prices_dir.exists() {
        return Ok(empty_price_frame());
    }

    let mut frames = Vec::new();
    for entry in fs::read_dir(&prices_dir)? {
        let entry = entry?;
        let path = entry.path().join("data.parquet");
        if path.exists() {
            frames.push(parquet_io::scan_parquet(&path)?);
        }
    }
    if frames.is_empty() {
        return Ok(empty_price_frame());
    }
    Ok(concat(frames, UnionArgs::default())?)
}

pub(crate) fn empty_price_frame() -> LazyFrame {
    df!(
        "uuid" => Vec::<String>::new(),
        "date" => Vec::<String>::new(),
        "source" => Vec::<String>::new(),
        "provider" => Vec::<String>::new(),
        "priceType" => Vec::<String>::new(),
        "finish" => Vec::<String>::new(),
        "price" => Vec::<f64>::new(),
        "currency" => Vec::<String>::new(),
    )
    .expect("static empty-frame schema is always valid")
    .lazy()
}
