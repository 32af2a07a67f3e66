//! Stage 9: relationship ops that require self-joins.
//!
//! `otherFaceIds`, `tokenIds`, and `reverseRelated` all follow the same
//! shape: group or join faces against each other (or against the token
//! subset) and fold the matches into a list column. The self-reference each
//! of these groupings picks up (a card always "matches" itself) is stripped
//! in the checkpoint-4 row pass in [`super::uuids`]'s sibling module, since
//! removing one's own UUID from a list is cheapest done once per row rather
//! than threaded through three separate list expressions.

use crate::cache::SourceCache;
use crate::error::Result;
use polars::prelude::*;

/// Removes each row's own UUID from `otherFaceIds`. A card is never its own
/// sibling; the grouping in [`other_face_ids`] can't express that exclusion
/// as a pure list `Expr` without referencing the outer row, so it's done
/// once per row on the already-materialized checkpoint-4 frame.
pub fn strip_self_references(mut df: DataFrame) -> Result<DataFrame> {
    let uuids = df.column("uuid")?.str()?.clone();
    let other_face_ids = df.column("otherFaceIds")?.list()?.clone();

    let mut cleaned = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let own = uuids.get(i).unwrap_or("");
        let series = other_face_ids
            .get_as_series(i)
            .unwrap_or_else(|| Series::new_empty("".into(), &DataType::String));
        let values: Vec<String> = series
            .str()
            .map(|ca| {
                ca.into_iter()
                    .filter_map(|s| s)
                    .filter(|s| *s != own)
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();
        cleaned.push(Series::new("".into(), &values));
    }

    df.with_column(Series::new("otherFaceIds".into(), cleaned))?;
    Ok(df)
}

pub fn apply(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let lf = other_face_ids(lf);
    let lf = token_ids_and_reverse_related(cache, lf)?;
    let lf = propagate_salt_to_tokens(cache, lf)?;
    let lf = related_cards(cache, lf)?;
    let lf = alternative_deck_limit(lf);
    let lf = funny_and_timeshifted(lf);
    let lf = purchase_urls(lf);
    Ok(lf)
}

/// Group by the pre-explode source card id; every face in the group links
/// to the full group's UUID list (self-inclusive until the checkpoint-4
/// cleanup pass removes each row's own UUID from its own list).
fn other_face_ids(lf: LazyFrame) -> LazyFrame {
    let siblings = lf
        .clone()
        .group_by([col("sourceCardId")])
        .agg([col("uuid").sort(SortOptions::default()).alias("otherFaceIds")]);

    lf.join(
        siblings,
        [col("sourceCardId")],
        [col("sourceCardId")],
        JoinArgs::new(JoinType::Left),
    )
}

/// Cross-join non-token faces against the set's declared token set, keeping
/// pairs where the face's text mentions the token's name, then fold into
/// `tokenIds` (spell -> tokens) and `reverseRelated` (token -> spells).
fn token_ids_and_reverse_related(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let tokens = cache.token_product_map()?.select([
        col("setCode"),
        col("tokenUuid"),
        col("tokenName"),
    ]);

    let matches = lf
        .clone()
        .filter(col("types").list().contains(lit("Token")).not())
        .select([col("uuid"), col("setCode"), col("text")])
        .join(
            tokens,
            [col("setCode")],
            [col("setCode")],
            JoinArgs::new(JoinType::Inner),
        )
        .filter(
            col("text")
                .fill_null(lit(""))
                .str()
                .contains(col("tokenName"), false),
        );

    let token_ids = matches
        .clone()
        .group_by([col("uuid")])
        .agg([col("tokenUuid").sort(SortOptions::default()).alias("tokenIds")]);

    let reverse_related = matches
        .group_by([col("tokenUuid")])
        .agg([col("uuid").sort(SortOptions::default()).alias("reverseRelated")])
        .rename(["tokenUuid"], ["uuid"], true);

    let lf = lf.join(token_ids, [col("uuid")], [col("uuid")], JoinArgs::new(JoinType::Left));
    Ok(lf.join(reverse_related, [col("uuid")], [col("uuid")], JoinArgs::new(JoinType::Left)))
}

/// A token's own `edhrecSaltiness` is propagated from the spell(s) that
/// create it (the same text-mentions-token-name match
/// [`token_ids_and_reverse_related`] uses): a token has no EDHREC deck-entry
/// history of its own, so it takes its creating spell's saltiness rather
/// than defaulting to null. When more than one spell creates the same
/// token, the highest saltiness among them wins.
fn propagate_salt_to_tokens(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let tokens = cache.token_product_map()?.select([
        col("setCode"),
        col("tokenUuid"),
        col("tokenName"),
    ]);

    let spell_saltiness = lf
        .clone()
        .filter(col("types").list().contains(lit("Token")).not())
        .select([col("setCode"), col("text"), col("edhrecSaltiness")])
        .join(
            tokens,
            [col("setCode")],
            [col("setCode")],
            JoinArgs::new(JoinType::Inner),
        )
        .filter(
            col("text")
                .fill_null(lit(""))
                .str()
                .contains(col("tokenName"), false),
        )
        .filter(col("edhrecSaltiness").is_not_null());

    let token_salt = spell_saltiness
        .group_by([col("tokenUuid")])
        .agg([col("edhrecSaltiness").max().alias("tokenSaltiness")])
        .rename(["tokenUuid"], ["uuid"], true);

    let lf = lf.join(token_salt, [col("uuid")], [col("uuid")], JoinArgs::new(JoinType::Left));
    Ok(lf
        .with_column(col("edhrecSaltiness").fill_null(col("tokenSaltiness")).alias("edhrecSaltiness"))
        .drop(["tokenSaltiness"]))
}

/// `relatedCards.spellbook` from the combo/synergy table; `.tokens` and
/// `.reverseRelated` mirror the columns computed above.
fn related_cards(cache: &SourceCache, lf: LazyFrame) -> Result<LazyFrame> {
    let synergy = cache
        .combo_synergy()?
        .group_by([col("name")])
        .agg([col("relatedName").sort(SortOptions::default()).alias("spellbook")]);

    let lf = lf.join(synergy, [col("name")], [col("name")], JoinArgs::new(JoinType::Left));

    Ok(lf.with_column(
        as_struct(vec![
            col("reverseRelated").fill_null(lit(Series::new_empty("".into(), &DataType::String))),
            col("spellbook").fill_null(lit(Series::new_empty("".into(), &DataType::String))),
            col("tokenIds").alias("tokens").fill_null(lit(Series::new_empty("".into(), &DataType::String))),
        ])
        .alias("relatedCards"),
    ))
}

/// Cards like Relentless Rats that explicitly permit more than the default
/// one-copy deck-construction limit.
fn alternative_deck_limit(lf: LazyFrame) -> LazyFrame {
    lf.with_column(
        col("text")
            .fill_null(lit(""))
            .str()
            .contains(lit("any number of cards named"), false)
            .alias("hasAlternativeDeckLimit"),
    )
}

fn funny_and_timeshifted(lf: LazyFrame) -> LazyFrame {
    lf.with_columns([
        col("isFunny").fill_null(lit(false)),
        col("frameVersion").eq(lit("future")).alias("isTimeshifted"),
    ])
}

/// Direct marketplace purchase-URL templates keyed by provider identifier.
/// Consumed by the referral/URL builder (component F) to mint the 16-hex
/// redirect hashes.
fn purchase_urls(lf: LazyFrame) -> LazyFrame {
    // Build each URL only when its backing marketplace ID is present, so an
    // ID-less face contributes no key rather than a URL with an empty
    // catalog path glued on.
    let card_kingdom = when(col("cardKingdomId").is_not_null())
        .then(concat_str(
            [lit("https://www.cardkingdom.com/mtg?partner=mtgjson&utm_campaign=partner&utm_medium=link&utm_source=mtgjson&url=catalog%2Fitem%2F"), col("cardKingdomId")],
            "",
            true,
        ))
        .otherwise(lit(NULL));
    let card_kingdom_etched = when(col("cardKingdomEtchedId").is_not_null())
        .then(concat_str(
            [lit("https://www.cardkingdom.com/mtg?partner=mtgjson&filter%5Btype%5D=etched&url=catalog%2Fitem%2F"), col("cardKingdomEtchedId")],
            "",
            true,
        ))
        .otherwise(lit(NULL));
    let card_kingdom_foil = when(col("cardKingdomFoilId").is_not_null())
        .then(concat_str(
            [lit("https://www.cardkingdom.com/mtg?partner=mtgjson&filter%5Btype%5D=foil&url=catalog%2Fitem%2F"), col("cardKingdomFoilId")],
            "",
            true,
        ))
        .otherwise(lit(NULL));
    let tcgplayer = when(col("tcgplayerProductId").is_not_null())
        .then(concat_str(
            [lit("https://www.tcgplayer.com/product/"), col("tcgplayerProductId")],
            "",
            true,
        ))
        .otherwise(lit(NULL));
    let tcgplayer_etched = when(col("tcgplayerEtchedProductId").is_not_null())
        .then(concat_str(
            [lit("https://www.tcgplayer.com/product/"), col("tcgplayerEtchedProductId")],
            "",
            true,
        ))
        .otherwise(lit(NULL));

    let all_absent = col("cardKingdomId")
        .is_null()
        .and(col("cardKingdomEtchedId").is_null())
        .and(col("cardKingdomFoilId").is_null())
        .and(col("tcgplayerProductId").is_null())
        .and(col("tcgplayerEtchedProductId").is_null());

    let urls_struct = as_struct(vec![
        card_kingdom.alias("cardKingdom"),
        card_kingdom_etched.alias("cardKingdomEtched"),
        card_kingdom_foil.alias("cardKingdomFoil"),
        tcgplayer.alias("tcgplayer"),
        tcgplayer_etched.alias("tcgplayerEtched"),
    ]);

    // A face with no marketplace IDs at all gets a null `purchaseUrls`
    // column rather than a struct of five nulls: the JSON/relational
    // writers treat a null struct column as an absent key, not `{}`.
    lf.with_column(
        when(all_absent)
            .then(lit(NULL))
            .otherwise(urls_struct)
            .alias("purchaseUrls"),
    )
}
