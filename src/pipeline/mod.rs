//! Card Compilation Pipeline (component C): a 13-stage, 4-checkpoint lazy
//! transform from raw card bulk to per-set partitioned output.
//!
//! Each stage module is a free function taking and returning a `LazyFrame`
//! (or, at a checkpoint, collecting to a `DataFrame` and handing back a fresh
//! scan) so the overall run sequence in [`CardPipeline::run`] reads as a
//! straight-line list of stage calls mirroring the stage table.

mod derived;
mod enrichment;
mod faces;
mod relationships;
mod sink;
mod uuids;

use crate::cache::SourceCache;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::lookups;
use crate::parquet_io;
use polars::prelude::*;
use std::path::PathBuf;

pub struct CardPipeline<'a> {
    cache: &'a SourceCache,
    config: &'a BuildConfig,
}

impl<'a> CardPipeline<'a> {
    pub fn new(cache: &'a SourceCache, config: &'a BuildConfig) -> Self {
        Self { cache, config }
    }

    fn checkpoint_path(&self, name: &str) -> PathBuf {
        self.config.cache_root.join(format!("checkpoints/{name}.parquet"))
    }

    /// Run the full pipeline for `set_codes`, optionally narrowed to
    /// `face_id_allowlist`, and partition-write the result under
    /// `cache_root/cards/setCode=<CODE>/` and `.../tokens/setCode=<CODE>/`.
    pub fn run(&self, set_codes: &[String], face_id_allowlist: Option<&[String]>) -> Result<()> {
        // Stage 1: load + filter.
        let lf = faces::load_and_filter(self.cache, set_codes, face_id_allowlist)?;

        // Stage 2: per-face transforms (columnar part — mana value, colors,
        // basic field extraction).
        let lf = faces::per_face_columnar_transforms(lf);

        // Stage 3: checkpoint 1, with the row-wise part of stage 2 (type
        // line parse, ASCII folding, finish ordering, meld sides) riding
        // along on the same collect.
        let lf = parquet_io::checkpoint_with(lf, &self.checkpoint_path("stage3"), faces::per_face_row_transforms)?;

        // Stage 4: multi-row joins against the lookup consolidator.
        let lf = joins(self.cache, lf)?;

        // Stage 5: checkpoint 2.
        let lf = parquet_io::checkpoint(lf, &self.checkpoint_path("stage5"))?;

        // Stage 6: struct assembly + UUID assignment (row-wise; deterministic
        // v5 over the canonical face key, preferring any cached UUID).
        // Stage 7: derived fields (duel-deck side, official DB page IDs).
        let lf = derived::official_db_page_ids(self.cache, lf);

        // Stage 8: checkpoint 3, with UUID assignment riding the collect.
        let lf = parquet_io::checkpoint_with(lf, &self.checkpoint_path("stage8"), uuids::assign_uuids)?;

        // Stage 9: relationship ops requiring self-joins.
        let lf = relationships::apply(self.cache, lf)?;

        // Stage 10: checkpoint 4, with self-reference cleanup for the
        // relationship lists built in stage 9 (each grouping includes the
        // row's own UUID until this pass strips it).
        let lf = parquet_io::checkpoint_with(lf, &self.checkpoint_path("stage10"), relationships::strip_self_references)?;

        // Stage 11: final enrichment (manual overrides, rebalanced linkage,
        // Secret Lair subsets, sourceProducts).
        let lf = enrichment::apply(self.cache, lf)?;

        // Stage 12: signatures + cleanup.
        let lf = enrichment::join_signatures(self.cache, lf)?;

        // Stage 13: sink — dedupe, variations, foil/nonfoil twins,
        // card/token split, partition write.
        sink::write_partitions(lf, &self.config.cache_root)
    }
}

/// Stage 4: join identifiers, oracle, set+number, by-name, marketplace
/// lookups onto the face frame; augment availability from ID presence.
fn joins(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let identifiers = lookups::identifiers_lookup(cache)?;
    let oracle = lookups::oracle_lookup(cache)?;
    let set_number = lookups::set_number_lookup(cache)?;
    let by_name = lookups::by_name_lookup(cache)?;
    let meld_side = lookups::meld_side_lookup(cache)?;
    let face_flavor_names = lookups::face_flavor_names_lookup(cache)?;
    let marketplace_set_map = lookups::marketplace_set_map_lookup(cache)?;

    let lf = lf
        .join(
            identifiers,
            [col("scryfallId"), col("side")],
            [col("scryfallId"), col("side")],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            oracle,
            [col("oracleId")],
            [col("oracleId")],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            set_number,
            [col("setCode"), col("number")],
            [col("setCode"), col("collectorNumber")],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            by_name,
            [col("name")],
            [col("name")],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            meld_side,
            [col("name")],
            [col("name")],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            face_flavor_names,
            [col("scryfallId"), col("side")],
            [col("scryfallId"), col("side")],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            marketplace_set_map,
            [col("setCode")],
            [col("setCode")],
            JoinArgs::new(JoinType::Left).with_coalesce(JoinCoalesce::CoalesceColumns),
        )
        .with_column(col("side").fill_null(col("meldSide")));

    Ok(lf.with_column(
        when(col("mtgoId").is_not_null())
            .then(concat_list([col("availability"), lit(Series::new("".into(), ["mtgo"]))]).unwrap())
            .otherwise(col("availability"))
            .alias("availability"),
    ))
}
