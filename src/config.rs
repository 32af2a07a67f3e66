//! Build-wide configuration: cache/output roots, environment overrides, and
//! the handful of named constants that are product decisions rather than
//! values to infer from the data.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Environment variable prefix honored by this crate. A concrete CLI binary
/// is out of scope; we still honor the three documented variables so an
/// external launcher can rely on them.
pub const ENV_PREFIX: &str = "CARDATLAS";

/// Local source-cache filenames, keyed by logical source name.
/// Every source is materialized once to a zstd-compressed parquet file under
/// `cache/sources/` and re-opened as a lazy scan from then on.
pub fn source_files() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("card_bulk", "sources/card_bulk.parquet"),
        ("rulings", "sources/rulings.parquet"),
        ("set_metadata", "sources/set_metadata.parquet"),
        ("retail_inventory", "sources/retail_inventory.parquet"),
        ("marketplace_identifiers", "sources/marketplace_identifiers.parquet"),
        ("commander_saltiness", "sources/commander_saltiness.parquet"),
        ("combo_synergy", "sources/combo_synergy.parquet"),
        ("meld_triplets", "sources/meld_triplets.parquet"),
        ("secret_lair_subsets", "sources/secret_lair_subsets.parquet"),
        ("marketplace_skus", "sources/marketplace_skus.parquet"),
        ("official_db_page_ids", "sources/official_db_page_ids.parquet"),
        ("image_orientation", "sources/image_orientation.parquet"),
        ("multiverse_bridge", "sources/multiverse_bridge.parquet"),
        ("sealed_products", "sources/sealed_products.parquet"),
        ("sealed_product_contents", "sources/sealed_product_contents.parquet"),
        ("deck_lists", "sources/deck_lists.parquet"),
        ("booster_configs", "sources/booster_configs.parquet"),
        ("token_product_map", "sources/token_product_map.parquet"),
        ("manual_overrides", "sources/manual_overrides.parquet"),
        ("meld_overrides", "sources/meld_overrides.parquet"),
        ("watermark_overrides", "sources/watermark_overrides.parquet"),
        ("foreign_data_exceptions", "sources/foreign_data_exceptions.parquet"),
    ])
}

/// Persisted state layout: per-set card/token partitions,
/// daily price partitions, and the P1 resume checkpoint file all live under
/// the cache root so a `--from-cache` rebuild can find them.
pub fn cards_partition_path(cache_root: &std::path::Path, set_code: &str) -> PathBuf {
    cache_root.join(format!("cards/setCode={}/0.parquet", set_code))
}

pub fn tokens_partition_path(cache_root: &std::path::Path, set_code: &str) -> PathBuf {
    cache_root.join(format!("tokens/setCode={}/0.parquet", set_code))
}

pub fn price_partition_path(cache_root: &std::path::Path, date: &str) -> PathBuf {
    cache_root.join(format!("prices/date={}/data.parquet", date))
}

/// Where a pre-partitioning build would have left its single-file price
/// archive, back when every historical row lived in one parquet file under
/// the cache root instead of one partition per calendar date.
pub fn legacy_price_archive_path(cache_root: &std::path::Path) -> PathBuf {
    cache_root.join("prices.parquet")
}

pub const TCG_PRICE_CHECKPOINT_FILE: &str = ".tcg_price_checkpoint.json";

/// The date after which bonus ("booster-fun") printings are counted toward
/// `totalSetSize` but excluded from `baseSetSize`. Observed value as of the
/// Throne of Eldraine release; kept here as a single named constant rather
/// than derived, since this is a product decision and not something to
/// infer from the data.
pub const BOOSTER_FUN_CUTOFF_DATE: &str = "2019-10-04";

/// Rolling local retention window for the price archive.
pub const PRICE_ARCHIVE_RETENTION_DAYS: i64 = 90;

/// Deterministic-UUID namespace. Any v5 UUID produced by this crate is
/// derived under this fixed namespace so rebuilds — and ports to other
/// languages implementing the same canonicalization — agree bit-for-bit.
pub const UUID_NAMESPACE: uuid::Uuid = uuid::Uuid::from_bytes([
    0x0f, 0x5e, 0xba, 0xd1, 0xd9, 0x0d, 0x44, 0xa9, 0x9d, 0x4f, 0x37, 0x6c, 0x6b, 0xf5, 0x6d, 0x21,
]);

/// Resolved build-wide configuration. Constructed once per run and threaded
/// by value into every stage, as an explicit context object rather than a
/// process-wide singleton.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub cache_root: PathBuf,
    pub output_root: PathBuf,
    pub offline: bool,
    pub debug: bool,
}

impl BuildConfig {
    /// Build from explicit values, falling back to environment variables and
    /// then platform defaults, the same precedence order a cache manager
    /// typically uses for its cache directory.
    pub fn from_env(cache_root: Option<PathBuf>, output_root: Option<PathBuf>) -> Self {
        let offline = env::var(format!("{}_OFFLINE_MODE", ENV_PREFIX))
            .map(|v| v != "0" && !v.is_empty())
            .unwrap_or(false);
        let debug = env::var(format!("{}_DEBUG", ENV_PREFIX))
            .map(|v| v != "0" && !v.is_empty())
            .unwrap_or(false);
        let output_root = output_root
            .or_else(|| env::var(format!("{}_OUTPUT_PATH", ENV_PREFIX)).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("./output"));

        Self {
            cache_root: cache_root.unwrap_or_else(default_cache_dir),
            output_root,
            offline,
            debug,
        }
    }
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("cardatlas")
    } else {
        PathBuf::from(".cardatlas-cache")
    }
}
