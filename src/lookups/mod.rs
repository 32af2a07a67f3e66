//! Lookup Consolidator (component B). Builds the nine reusable lookup frames
//! the card pipeline joins against, each once per run, from the Source Cache.
//!
//! Every lookup here is a thin, declarative join over cache accessors. The
//! one exception is the set+number lookup, which has to mint a stable UUID
//! per non-English printing and therefore collects its (small, grouped)
//! intermediate frame and does that derivation in Rust rather than forcing a
//! per-row closure through the lazy expression graph.

use crate::cache::SourceCache;
use crate::error::Result;
use crate::uuid_gen;
use polars::prelude::*;

/// `(scryfallId, side) -> (cachedUuid, cardKingdomId, cardKingdomEtchedId, cardKingdomFoilId, orientation)`.
/// Full-outer join so a face that only Card Kingdom's mapping knows about is
/// still retained (null identifiers, but present).
pub fn identifiers_lookup(cache: &SourceCache) -> Result<LazyFrame> {
    let marketplace = cache.marketplace_identifiers()?;
    let orientation = cache.image_orientation()?;

    let joined = marketplace.join(
        orientation,
        [col("scryfallId"), col("side")],
        [col("scryfallId"), col("side")],
        JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
    );
    Ok(joined)
}

/// `oracleId -> (edhrecSaltiness, edhrecRank, rulings[], printings[])`.
/// `printings` is every set code the oracle appears in, sorted and deduped
/// so the grouped list is stable across rebuilds.
pub fn oracle_lookup(cache: &SourceCache) -> Result<LazyFrame> {
    let saltiness = cache.commander_saltiness()?;
    let rulings = cache
        .rulings()?
        .sort(["oracleId", "date", "text"], SortMultipleOptions::default())
        .group_by([col("oracleId")])
        .agg([as_struct(vec![col("date"), col("text")]).alias("rulings")]);

    let printings = cache
        .card_bulk()?
        .select([col("oracleId"), col("setCode")])
        .unique(None, UniqueKeepStrategy::First)
        .sort(["oracleId", "setCode"], SortMultipleOptions::default())
        .group_by([col("oracleId")])
        .agg([col("setCode").alias("printings")]);

    let joined = saltiness
        .join(
            rulings,
            [col("oracleId")],
            [col("oracleId")],
            JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
        )
        .join(
            printings,
            [col("oracleId")],
            [col("oracleId")],
            JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
        );
    Ok(joined)
}

/// `(setCode, collectorNumber) -> (foreignData[], duelDeck, foreignUuids[])`.
///
/// The most complex lookup: groups every non-English printing of the same
/// physical card, mints each a stable UUID (derived the same way as an
/// English face, tagged `"foreign"`), and tags duel-deck side assignment
/// from the set's name convention (`"... Elves"` / `"... Goblins"` style
/// decks, recorded in `set_metadata` as a `duelDeckSideA`/`duelDeckSideB`
/// pair of set codes).
pub fn set_number_lookup(cache: &SourceCache) -> Result<LazyFrame> {
    let card_bulk = cache.card_bulk()?;

    let foreign = card_bulk
        .clone()
        .filter(col("language").neq(lit("English")))
        .select([
            col("setCode"),
            col("number").alias("collectorNumber"),
            col("scryfallId"),
            col("language"),
            col("faceName").alias("name"),
            col("text"),
            col("flavorText"),
            col("multiverseId"),
        ])
        .sort(
            ["setCode", "collectorNumber", "language"],
            SortMultipleOptions::default(),
        )
        .collect()?;

    let foreign = assign_foreign_uuids(foreign)?;

    let foreign_grouped = foreign
        .lazy()
        .group_by([col("setCode"), col("collectorNumber")])
        .agg([
            as_struct(vec![
                col("language"),
                col("name"),
                col("text"),
                col("flavorText"),
                col("multiverseId"),
                col("foreignUuid"),
            ])
            .alias("foreignData"),
            col("foreignUuid").alias("foreignUuids"),
        ]);

    let duel_deck_tags = duel_deck_side_map(cache)?;

    Ok(foreign_grouped.join(
        duel_deck_tags,
        [col("setCode")],
        [col("setCode")],
        JoinArgs::new(JoinType::Left),
    ))
}

/// Collects a non-English printing frame and mints a deterministic v5 UUID
/// per row. Small intermediate (only non-English rows), so collecting before
/// the per-row derivation stays within the "only checkpoint, never scan"
/// discipline used everywhere else.
fn assign_foreign_uuids(mut df: DataFrame) -> Result<DataFrame> {
    let scryfall_ids = df.column("scryfallId")?.str()?.clone();
    let languages = df.column("language")?.str()?.clone();
    let names = df.column("name")?.str()?.clone();

    let uuids: Vec<String> = scryfall_ids
        .into_iter()
        .zip(languages.into_iter())
        .zip(names.into_iter())
        .map(|((sid, lang), name)| {
            uuid_gen::foreign_uuid(sid.unwrap_or(""), lang.unwrap_or(""), name.unwrap_or(""))
                .to_string()
        })
        .collect();

    df.with_column(Series::new("foreignUuid".into(), uuids))?;
    Ok(df)
}

/// Duel-deck side assignment (supplemented feature, grounded in
/// `the-muppet-mtgjson`'s `set_builder::mark_duel_decks`): a set flagged as
/// one half of a duel-deck pairing in `set_metadata` tags every card in it
/// with `"a"` or `"b"` depending on which half it's in.
fn duel_deck_side_map(cache: &SourceCache) -> Result<LazyFrame> {
    let sets = cache.set_metadata()?;
    Ok(sets
        .filter(col("duelDeckSide").is_not_null())
        .select([col("code").alias("setCode"), col("duelDeckSide").alias("duelDeck")]))
}

/// `name -> (cardParts[], leadershipSkills)`.
pub fn by_name_lookup(cache: &SourceCache) -> Result<LazyFrame> {
    let meld = cache
        .meld_triplets()?
        .select([col("partAName"), col("partBName"), col("resultName")]);

    let part_a = meld.clone().select([
        col("partAName").alias("name"),
        concat_list([col("partBName"), col("resultName")])
            .unwrap()
            .alias("cardParts"),
    ]);
    let part_b = meld.clone().select([
        col("partBName").alias("name"),
        concat_list([col("partAName"), col("resultName")])
            .unwrap()
            .alias("cardParts"),
    ]);
    let result = meld.select([
        col("resultName").alias("name"),
        concat_list([col("partAName"), col("partBName")])
            .unwrap()
            .alias("cardParts"),
    ]);

    let card_parts = concat([part_a, part_b, result], UnionArgs::default())?;

    let leadership = cache.commander_saltiness()?.select([
        col("name"),
        col("leadershipSkillsBrawl").alias("brawl"),
        col("leadershipSkillsCommander").alias("commander"),
        col("leadershipSkillsOathbreaker").alias("oathbreaker"),
    ]);

    Ok(card_parts.join(
        leadership,
        [col("name")],
        [col("name")],
        JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
    ))
}

/// `name -> "a" | "b"` meld-side tag:
/// the two parts get `side = "a"`, the result gets `side = "b"`.
pub fn meld_side_lookup(cache: &SourceCache) -> Result<LazyFrame> {
    let meld = cache.meld_triplets()?;
    let parts = meld
        .clone()
        .select([col("partAName").alias("name")])
        .with_column(lit("a").alias("meldSide"));
    let parts_b = meld
        .clone()
        .select([col("partBName").alias("name")])
        .with_column(lit("a").alias("meldSide"));
    let result = meld
        .select([col("resultName").alias("name")])
        .with_column(lit("b").alias("meldSide"));
    Ok(concat([parts, parts_b, result], UnionArgs::default())?.unique(None, UniqueKeepStrategy::First))
}

/// `scryfallId -> signatures[]` (World-Championship signed cards).
pub fn signatures_lookup(cache: &SourceCache) -> Result<LazyFrame> {
    Ok(cache
        .manual_overrides()?
        .filter(col("signature").is_not_null())
        .select([col("scryfallId"), col("signature")])
        .group_by([col("scryfallId")])
        .agg([col("signature").sort(SortOptions::default()).alias("signatures")]))
}

/// `scryfallId -> corrected watermark string`.
pub fn watermark_overrides_lookup(cache: &SourceCache) -> Result<LazyFrame> {
    cache.watermark_overrides()
}

/// Face-specific flavor-name aliases.
pub fn face_flavor_names_lookup(cache: &SourceCache) -> Result<LazyFrame> {
    Ok(cache
        .manual_overrides()?
        .filter(col("faceFlavorName").is_not_null())
        .select([col("scryfallId"), col("side"), col("faceFlavorName")]))
}

/// `setCode -> marketplace set metadata` (TCGplayer group IDs, CardMarket IDs).
pub fn marketplace_set_map_lookup(cache: &SourceCache) -> Result<LazyFrame> {
    cache.multiverse_bridge()
}

/// The four ID→UUID bridges the price engine uses to resolve a provider's
/// native ID to an MTGJSON UUID. A native ID that maps to more than one UUID
/// (e.g. two printings sharing a TCGplayer product ID) is intentionally kept
/// as one row per UUID so the price engine can duplicate the row across them.
pub struct IdBridges {
    pub tcgplayer_product_id: LazyFrame,
    pub tcgplayer_etched_product_id: LazyFrame,
    pub mtgo_id: LazyFrame,
    pub scryfall_id: LazyFrame,
}

pub fn id_to_uuid_bridges(identifiers: LazyFrame) -> IdBridges {
    IdBridges {
        tcgplayer_product_id: identifiers
            .clone()
            .filter(col("tcgplayerProductId").is_not_null())
            .select([col("tcgplayerProductId"), col("uuid")]),
        tcgplayer_etched_product_id: identifiers
            .clone()
            .filter(col("tcgplayerEtchedProductId").is_not_null())
            .select([col("tcgplayerEtchedProductId"), col("uuid")]),
        mtgo_id: identifiers
            .clone()
            .filter(col("mtgoId").is_not_null())
            .select([col("mtgoId"), col("uuid")]),
        scryfall_id: identifiers
            .filter(col("scryfallId").is_not_null())
            .select([col("scryfallId"), col("uuid")]),
    }
}
