//! Stages 11-12: final enrichment, signatures, cleanup.

use crate::cache::SourceCache;
use crate::error::Result;
use crate::lookups;
use polars::prelude::*;

/// Stage 11: manual overrides, rebalanced↔original linkage, Secret Lair
/// subset tags, `sourceProducts`.
pub fn apply(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let lf = apply_manual_overrides(cache, lf)?;
    let lf = rebalanced_linkage(cache, lf)?;
    let lf = secret_lair_subsets(cache, lf)?;
    let lf = source_products(cache, lf)?;
    let lf = apply_meld_overrides(cache, lf)?;
    let lf = apply_foreign_data_exceptions(cache, lf)?;
    Ok(lf)
}

fn apply_manual_overrides(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let watermark_overrides = lookups::watermark_overrides_lookup(cache)?
        .select([col("scryfallId"), col("watermark").alias("watermarkOverride")]);

    let lf = lf.join(
        watermark_overrides,
        [col("scryfallId")],
        [col("scryfallId")],
        JoinArgs::new(JoinType::Left),
    );
    Ok(lf.with_column(
        col("watermarkOverride")
            .fill_null(col("watermark"))
            .alias("watermark"),
    ))
}

/// Curated per-face correction for `side` (meld assignment by name match in
/// [`super::joins`]'s `meld_side_lookup` can't disambiguate two meld parts
/// that happen to share a name across sets). Same override-wins,
/// fall-back-to-existing shape as [`apply_manual_overrides`]'s watermark
/// handling.
fn apply_meld_overrides(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let overrides = cache
        .meld_overrides()?
        .select([col("scryfallId"), col("meldSide").alias("meldSideOverride")]);

    let lf = lf.join(
        overrides,
        [col("scryfallId")],
        [col("scryfallId")],
        JoinArgs::new(JoinType::Left),
    );
    Ok(lf
        .with_column(col("meldSideOverride").fill_null(col("side")).alias("side"))
        .drop(["meldSideOverride"]))
}

/// Curated corrections to a face's foreign-language data, for the rare
/// printing where [`lookups::set_number_lookup`]'s physical-card grouping
/// (set + collector number) doesn't hold — an exception table is ordinary
/// input, joined here rather than patched at runtime, same as every other
/// manual-override table (spec's own framing for these tables).
fn apply_foreign_data_exceptions(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let exceptions = cache
        .foreign_data_exceptions()?
        .select([col("scryfallId"), col("foreignData").alias("foreignDataException")]);

    let lf = lf.join(
        exceptions,
        [col("scryfallId")],
        [col("scryfallId")],
        JoinArgs::new(JoinType::Left),
    );
    Ok(lf
        .with_column(
            when(col("foreignDataException").is_not_null())
                .then(col("foreignDataException"))
                .otherwise(col("foreignData"))
                .alias("foreignData"),
        )
        .drop(["foreignDataException"]))
}

/// For any `"A-"`-prefixed face, find the un-prefixed face in the
/// Alchemy set's *parent* set (`set_metadata.parentCode`, not a literal
/// `setCode` match — a rebalanced card always lives in its own
/// `Y`-prefixed set, e.g. `YMID` rebalancing `MID`) and link both ways:
/// `originalPrintings` on the rebalanced face, `rebalancedPrintings` on
/// the original.
fn rebalanced_linkage(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let set_parents = cache
        .set_metadata()?
        .filter(col("parentCode").is_not_null())
        .select([col("code").alias("setCode"), col("parentCode")]);

    let rebalanced = lf
        .clone()
        .filter(col("name").str().starts_with(lit("A-")))
        .select([
            col("uuid").alias("rebalancedUuid"),
            col("setCode"),
            col("name").str().strip_prefix(lit("A-")).alias("baseName"),
        ])
        .join(
            set_parents,
            [col("setCode")],
            [col("setCode")],
            JoinArgs::new(JoinType::Inner),
        );

    let originals = lf
        .clone()
        .filter(col("name").str().starts_with(lit("A-")).not())
        .select([
            col("uuid").alias("originalUuid"),
            col("setCode").alias("parentCode"),
            col("name").alias("baseName"),
        ]);

    let pairs = rebalanced.join(
        originals,
        [col("parentCode"), col("baseName")],
        [col("parentCode"), col("baseName")],
        JoinArgs::new(JoinType::Inner),
    );

    let original_printings = pairs
        .clone()
        .group_by([col("rebalancedUuid")])
        .agg([col("originalUuid").alias("originalPrintings")])
        .rename(["rebalancedUuid"], ["uuid"], true);

    let rebalanced_printings = pairs
        .group_by([col("originalUuid")])
        .agg([col("rebalancedUuid").alias("rebalancedPrintings")])
        .rename(["originalUuid"], ["uuid"], true);

    let lf = lf.join(original_printings, [col("uuid")], [col("uuid")], JoinArgs::new(JoinType::Left));
    let lf = lf.join(
        rebalanced_printings,
        [col("uuid")],
        [col("uuid")],
        JoinArgs::new(JoinType::Left),
    );
    Ok(lf.with_column(col("originalPrintings").is_not_null().alias("isRebalanced")))
}

fn secret_lair_subsets(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let subsets = cache
        .secret_lair_subsets()?
        .group_by([col("scryfallId")])
        .agg([col("subsetName").sort(SortOptions::default()).alias("subsets")]);

    Ok(lf.join(
        subsets,
        [col("scryfallId")],
        [col("scryfallId")],
        JoinArgs::new(JoinType::Left),
    ))
}

/// Invert sealed-product contents to `uuid -> {nonfoil, foil, etched}`
/// sealed-product-UUID sets.
fn source_products(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let contents = cache
        .sealed_product_contents()?
        .select([col("cardUuid"), col("sealedUuid"), col("finish")]);

    let per_finish = |finish: &'static str| {
        contents
            .clone()
            .filter(col("finish").eq(lit(finish)))
            .group_by([col("cardUuid")])
            .agg([col("sealedUuid").sort(SortOptions::default()).alias(finish)])
    };

    let nonfoil = per_finish("nonfoil");
    let foil = per_finish("foil");
    let etched = per_finish("etched");

    let joined = nonfoil
        .join(foil, [col("cardUuid")], [col("cardUuid")], JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns))
        .join(etched, [col("cardUuid")], [col("cardUuid")], JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns))
        .select([
            col("cardUuid").alias("uuid"),
            as_struct(vec![
                col("nonfoil").fill_null(lit(Series::new_empty("".into(), &DataType::String))),
                col("foil").fill_null(lit(Series::new_empty("".into(), &DataType::String))),
                col("etched").fill_null(lit(Series::new_empty("".into(), &DataType::String))),
            ])
            .alias("sourceProducts"),
        ]);

    Ok(lf.join(joined, [col("uuid")], [col("uuid")], JoinArgs::new(JoinType::Left)))
}

/// Stage 12: join signatures, pack the `identifiers`/`leadershipSkills`
/// nested structs, drop raw upstream helper columns, rename to output
/// schema.
///
/// Struct assembly would naturally happen right after
/// the stage-4 joins, but `cardKingdomId`, `cardKingdomFoilId`,
/// `cardKingdomEtchedId`, `tcgplayerProductId`, and `tcgplayerEtchedProductId`
/// are still needed as flat columns by stage 9's `purchaseUrls` derivation
/// ([`super::relationships::purchase_urls`]). Folding them into `identifiers`
/// has to wait until after that self-join stage, so it rides along here on
/// the stage-12 cleanup pass instead — the same "drop raw upstream columns"
/// pass already collapses `legalities`-shaped raw fields, just not fields
/// this crate also needs flat further downstream.
///
/// `isPreBoosterFunCutoff` is not computed here: the booster-fun adjustment
/// to `baseSetSize` (spec invariant 6) is a per-set count over
/// `promoTypes`, not a per-face flag, so it's computed once per set in
/// [`crate::assembly::is_booster_fun_card`]/[`crate::assembly::assemble_set`]
/// against the actually-written card partition instead.
pub fn join_signatures(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let signatures = lookups::signatures_lookup(cache)?;
    let lf = lf.join(
        signatures,
        [col("scryfallId")],
        [col("scryfallId")],
        JoinArgs::new(JoinType::Left),
    );

    let lf = pack_identifiers(lf);
    let lf = pack_leadership_skills(lf);

    // `orientation` is deliberately not dropped here: it has no place in
    // `identifiers` (it names a token's card-back layout, not a marketplace
    // ID) and survives as the flat column `CardToken::orientation` expects.
    Ok(lf
        .drop([
            "meldSide",
            "watermarkOverride",
            "scryfallId",
            "scryfallOracleId",
            "scryfallIllustrationId",
            "multiverseId",
            "mtgoId",
            "mtgoFoilId",
            "mtgArenaId",
            "tcgplayerProductId",
            "tcgplayerEtchedProductId",
            "mcmId",
            "mcmMetaId",
            "cardKingdomId",
            "cardKingdomFoilId",
            "cardKingdomEtchedId",
            "cachedUuid",
            "brawl",
            "commander",
            "oathbreaker",
        ]))
}

/// Packs the ~10 marketplace identifier columns the identifiers lookup
/// joined onto every face at stage 4 into the single nested `identifiers`
/// struct the output schema expects.
fn pack_identifiers(lf: LazyFrame) -> LazyFrame {
    lf.with_column(
        as_struct(vec![
            col("scryfallId").alias("scryfallId"),
            col("scryfallOracleId").alias("scryfallOracleId"),
            col("scryfallIllustrationId").alias("scryfallIllustrationId"),
            col("multiverseId").alias("multiverseId"),
            col("mtgoId").alias("mtgoId"),
            col("mtgoFoilId").alias("mtgoFoilId"),
            col("mtgArenaId").alias("mtgArenaId"),
            col("tcgplayerProductId").alias("tcgplayerProductId"),
            col("tcgplayerEtchedProductId").alias("tcgplayerEtchedProductId"),
            col("mcmId").alias("mcmId"),
            col("mcmMetaId").alias("mcmMetaId"),
            col("cardKingdomId").alias("cardKingdomId"),
            col("cardKingdomFoilId").alias("cardKingdomFoilId"),
            col("cardKingdomEtchedId").alias("cardKingdomEtchedId"),
        ])
        .alias("identifiers"),
    )
}

/// Packs the by-name lookup's flat `brawl`/`commander`/`oathbreaker`
/// booleans into the `leadershipSkills` struct. Missing rows (no entry in
/// the commander-saltiness source for this name) default every format to
/// not-legal rather than null, since `LeadershipSkills`'s fields are plain
/// `bool`, not `Option<bool>` (determinism rule: a map-lookup miss needs a
/// declared default).
fn pack_leadership_skills(lf: LazyFrame) -> LazyFrame {
    lf.with_column(
        as_struct(vec![
            col("brawl").fill_null(lit(false)).alias("brawl"),
            col("commander").fill_null(lit(false)).alias("commander"),
            col("oathbreaker").fill_null(lit(false)).alias("oathbreaker"),
        ])
        .alias("leadershipSkills"),
    )
}
