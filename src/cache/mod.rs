//! Source Cache (component A): one lazy frame per external source.
//!
//! Download once, cache to a local file, reopen lazily on every subsequent
//! access — generalized from "CDN file download" to "opaque provider
//! fetch": individual provider HTTP clients are out of scope, so every
//! source is materialized through a caller-supplied [`SourceProvider`]
//! rather than a hardcoded CDN URL.
//!
//! Holding the primary card bulk as an eager frame pins its multi-GB
//! deserialized form in memory for the whole run. Writing it to a local
//! zstd parquet file once and reopening it as a lazy scan means every
//! downstream query only pulls in the columns and row groups it actually
//! touches.

use crate::config::{self, BuildConfig};
use crate::error::{CardatlasError, Result};
use crate::parquet_io;
use polars::prelude::*;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::collections::HashMap;
use std::path::PathBuf;

/// Bounded parallelism for source loads (independent network downloads,
/// no shared mutable state besides the cache's own frame map).
const LOAD_WORKERS: usize = 10;

/// Fetches one named source as a raw tabular frame. Individual provider HTTP
/// clients are an external collaborator; this trait is the seam.
pub trait SourceProvider: Sync {
    fn fetch(&self, source: &str) -> Result<DataFrame>;
}

impl<F> SourceProvider for F
where
    F: Fn(&str) -> Result<DataFrame> + Sync,
{
    fn fetch(&self, source: &str) -> Result<DataFrame> {
        self(source)
    }
}

/// Holds one lazy frame per external source. Write-once-then-read-only:
/// after [`SourceCache::load_all`] returns, every accessor just clones a
/// cheap lazy-plan handle.
pub struct SourceCache {
    cache_root: PathBuf,
    offline: bool,
    frames: HashMap<&'static str, LazyFrame>,
}

impl SourceCache {
    pub fn new(config: &BuildConfig) -> Self {
        Self {
            cache_root: config.cache_root.clone(),
            offline: config.offline,
            frames: HashMap::new(),
        }
    }

    fn local_path(&self, filename: &str) -> PathBuf {
        self.cache_root.join(filename)
    }

    /// Materialize every declared source that isn't already cached locally,
    /// in bounded parallel, then reopen each as a lazy scan.
    ///
    /// `set_code_filter` and `face_id_allowlist` narrow the primary card
    /// bulk source at materialization time, for runs that only need the
    /// cards referenced by a specific deck list.
    pub fn load_all(
        &mut self,
        provider: &dyn SourceProvider,
        set_code_filter: Option<&[String]>,
        face_id_allowlist: Option<&[String]>,
    ) -> Result<()> {
        let sources = config::source_files();
        let pool = ThreadPoolBuilder::new()
            .num_threads(LOAD_WORKERS)
            .build()
            .map_err(|e| CardatlasError::InvalidArgument(format!("source cache thread pool: {e}")))?;

        let cache_root = self.cache_root.clone();
        let offline = self.offline;

        let results: Vec<(&'static str, Result<PathBuf>)> = pool.install(|| {
            sources
                .par_iter()
                .map(|(name, filename)| {
                    let path = ensure_materialized(
                        &cache_root,
                        offline,
                        name,
                        filename,
                        provider,
                        set_code_filter,
                        face_id_allowlist,
                    );
                    (*name, path)
                })
                .collect()
        });

        for (name, path) in results {
            let path = path?;
            self.frames.insert(name, parquet_io::scan_parquet(&path)?);
        }
        Ok(())
    }

    fn get(&self, name: &str) -> Result<LazyFrame> {
        self.frames
            .get(name)
            .cloned()
            .ok_or_else(|| CardatlasError::NotFound(format!("source not loaded: {name}")))
    }

    pub fn card_bulk(&self) -> Result<LazyFrame> {
        self.get("card_bulk")
    }

    pub fn rulings(&self) -> Result<LazyFrame> {
        self.get("rulings")
    }

    pub fn set_metadata(&self) -> Result<LazyFrame> {
        self.get("set_metadata")
    }

    pub fn retail_inventory(&self) -> Result<LazyFrame> {
        self.get("retail_inventory")
    }

    pub fn marketplace_identifiers(&self) -> Result<LazyFrame> {
        self.get("marketplace_identifiers")
    }

    pub fn commander_saltiness(&self) -> Result<LazyFrame> {
        self.get("commander_saltiness")
    }

    pub fn combo_synergy(&self) -> Result<LazyFrame> {
        self.get("combo_synergy")
    }

    pub fn meld_triplets(&self) -> Result<LazyFrame> {
        self.get("meld_triplets")
    }

    pub fn secret_lair_subsets(&self) -> Result<LazyFrame> {
        self.get("secret_lair_subsets")
    }

    pub fn marketplace_skus(&self) -> Result<LazyFrame> {
        self.get("marketplace_skus")
    }

    pub fn official_db_page_ids(&self) -> Result<LazyFrame> {
        self.get("official_db_page_ids")
    }

    pub fn image_orientation(&self) -> Result<LazyFrame> {
        self.get("image_orientation")
    }

    pub fn multiverse_bridge(&self) -> Result<LazyFrame> {
        self.get("multiverse_bridge")
    }

    pub fn sealed_products(&self) -> Result<LazyFrame> {
        self.get("sealed_products")
    }

    pub fn sealed_product_contents(&self) -> Result<LazyFrame> {
        self.get("sealed_product_contents")
    }

    pub fn deck_lists(&self) -> Result<LazyFrame> {
        self.get("deck_lists")
    }

    pub fn booster_configs(&self) -> Result<LazyFrame> {
        self.get("booster_configs")
    }

    pub fn token_product_map(&self) -> Result<LazyFrame> {
        self.get("token_product_map")
    }

    pub fn manual_overrides(&self) -> Result<LazyFrame> {
        self.get("manual_overrides")
    }

    pub fn meld_overrides(&self) -> Result<LazyFrame> {
        self.get("meld_overrides")
    }

    pub fn watermark_overrides(&self) -> Result<LazyFrame> {
        self.get("watermark_overrides")
    }

    pub fn foreign_data_exceptions(&self) -> Result<LazyFrame> {
        self.get("foreign_data_exceptions")
    }

    /// Remove every cached source file, forcing the next `load_all` to
    /// re-fetch from scratch.
    pub fn clear(&self) -> Result<()> {
        if self.cache_root.exists() {
            std::fs::remove_dir_all(&self.cache_root)?;
            std::fs::create_dir_all(&self.cache_root)?;
        }
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn ensure_materialized(
    cache_root: &std::path::Path,
    offline: bool,
    name: &str,
    filename: &str,
    provider: &dyn SourceProvider,
    set_code_filter: Option<&[String]>,
    face_id_allowlist: Option<&[String]>,
) -> Result<PathBuf> {
    let local_path = cache_root.join(filename);
    if local_path.exists() {
        return Ok(local_path);
    }
    if offline {
        return Err(CardatlasError::NotFound(format!(
            "source '{name}' not cached and offline mode is enabled"
        )));
    }

    let mut df = provider.fetch(name)?;
    if name == "card_bulk" {
        df = apply_card_bulk_filter(df, set_code_filter, face_id_allowlist)?;
    }

    parquet_io::write_parquet_atomic(&mut df, &local_path)?;
    Ok(local_path)
}

/// Narrow the primary card bulk source to requested sets and/or an explicit
/// face-ID allow-list, applied once at materialization time rather than
/// re-filtered on every pipeline run against the same cache.
fn apply_card_bulk_filter(
    df: DataFrame,
    set_code_filter: Option<&[String]>,
    face_id_allowlist: Option<&[String]>,
) -> Result<DataFrame> {
    if set_code_filter.is_none() && face_id_allowlist.is_none() {
        return Ok(df);
    }
    let mut lf = df.lazy();
    if let Some(codes) = set_code_filter {
        let series = Series::new("setCode".into(), codes);
        lf = lf.filter(col("setCode").is_in(lit(series)));
    }
    if let Some(ids) = face_id_allowlist {
        let series = Series::new("scryfallId".into(), ids);
        lf = lf.filter(col("scryfallId").is_in(lit(series)));
    }
    Ok(lf.collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;

    fn empty_card_bulk() -> DataFrame {
        df![
            "setCode" => ["NEO", "NEO", "MID"],
            "scryfallId" => ["a", "b", "c"],
        ]
        .unwrap()
    }

    #[test]
    fn set_code_filter_narrows_rows() {
        let df = empty_card_bulk();
        let filtered =
            apply_card_bulk_filter(df, Some(&["NEO".to_string()]), None).unwrap();
        assert_eq!(filtered.height(), 2);
    }

    #[test]
    fn no_filters_is_passthrough() {
        let df = empty_card_bulk();
        let filtered = apply_card_bulk_filter(df, None, None).unwrap();
        assert_eq!(filtered.height(), 3);
    }

    #[test]
    fn offline_missing_source_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let config = BuildConfig {
            cache_root: tmp.path().to_path_buf(),
            output_root: tmp.path().to_path_buf(),
            offline: true,
            debug: false,
        };
        let cache = SourceCache::new(&config);
        let result = ensure_materialized(
            &config.cache_root,
            true,
            "card_bulk",
            "sources/card_bulk.parquet",
            &(|_: &str| -> Result<DataFrame> { Ok(empty_card_bulk()) }),
            None,
            None,
        );
        assert!(result.is_err());
        assert!(cache.get("card_bulk").is_err());
    }
}
