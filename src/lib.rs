//! Card and price database compiler for Magic: the Gathering.
//!
//! Pulls card, set, ruling, and marketplace data from a pluggable set of
//! sources (component A), consolidates the cross-references every
//! downstream stage needs (component B), runs the 13-stage, 4-checkpoint
//! card compilation pipeline (component C), assembles and streams out the
//! public nested/relational/columnar formats (component D), and separately
//! builds and archives the daily price snapshot (component E).
//!
//! # Quick start
//!
//! ```no_run
//! use cardatlas::{BuildConfig, CardatlasBuild};
//!
//! let config = BuildConfig::from_env(None, None);
//! let build = CardatlasBuild::new(config);
//! ```

pub mod assembly;
pub mod booster;
pub mod cache;
pub mod config;
pub mod error;
pub mod lookups;
pub mod mana;
pub mod models;
pub mod parquet_io;
pub mod pipeline;
pub mod price;
pub mod referral;
pub mod typeline;
pub mod uuid_gen;

pub use cache::SourceCache;
pub use config::BuildConfig;
pub use error::{CardatlasError, Result};
pub use pipeline::CardPipeline;

use cache::SourceProvider;
use models::sub::Meta;

/// Top-level orchestrator wiring components A through F for one build run.
/// Configure once, then call the phase methods in sequence.
pub struct CardatlasBuild {
    config: BuildConfig,
}

impl CardatlasBuild {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Component A: materialize every external source into the local cache,
    /// narrowed to `set_codes`/`face_id_allowlist` when given.
    pub fn load_sources(
        &self,
        provider: &dyn SourceProvider,
        set_codes: Option<&[String]>,
        face_id_allowlist: Option<&[String]>,
    ) -> Result<SourceCache> {
        let mut cache = SourceCache::new(&self.config);
        cache.load_all(provider, set_codes, face_id_allowlist)?;
        Ok(cache)
    }

    /// Components B + C: run the card compilation pipeline against an
    /// already-loaded cache, writing per-set partitions under the cache
    /// root.
    pub fn compile_cards(&self, cache: &SourceCache, set_codes: &[String], face_id_allowlist: Option<&[String]>) -> Result<()> {
        CardPipeline::new(cache, &self.config).run(set_codes, face_id_allowlist)
    }

    /// Component D: assemble and write every output format from the
    /// partitions `compile_cards` produced.
    pub fn write_outputs(&self, cache: &SourceCache, meta: &Meta) -> Result<()> {
        assembly::write_all_outputs(cache, &self.config.cache_root, &self.config.output_root, meta)
    }

    /// Component F: walk the card partitions `compile_cards` wrote and emit
    /// the flat `/links/{hash} -> destination URL;` referral map under the
    /// output root.
    pub fn build_referral_map(&self) -> Result<()> {
        referral::write_referral_map(&self.config.cache_root, &self.config.output_root)
    }

    /// Component E: fetch, archive, and stream today's price snapshot.
    /// Returns the retention-window lazy frame the caller can also hand to
    /// [`price::writers::write_all_outputs`] (done here for convenience).
    pub fn build_prices(
        &self,
        providers: &[Box<dyn price::providers::PriceProvider>],
        bridges: &lookups::IdBridges,
        today: chrono::NaiveDate,
        meta: &Meta,
        object_store: Option<&dyn price::archive::ObjectStoreClient>,
    ) -> Result<()> {
        let window = price::run_daily_build(&self.config, providers, bridges, today, object_store)?;
        let today_str = today.format("%Y-%m-%d").to_string();
        let today_frame = price::archive::load_window(&self.config.cache_root)?
            .filter(polars::prelude::col("date").eq(polars::prelude::lit(today_str)));
        price::writers::write_all_outputs(window, today_frame, meta, &self.config.output_root.join("prices"))
    }
}
