//! Shared fixtures for integration tests.

use cardatlas::cache::SourceCache;
use cardatlas::config::BuildConfig;
use cardatlas::error::Result;
use polars::prelude::*;
use tempfile::TempDir;

/// A `BuildConfig` rooted in a fresh temp directory, kept alive for the
/// duration of the test via the returned `TempDir` guard.
pub fn temp_config() -> (TempDir, BuildConfig) {
    let tmp = tempfile::tempdir().unwrap();
    let config = BuildConfig {
        cache_root: tmp.path().join("cache"),
        output_root: tmp.path().join("output"),
        offline: false,
        debug: false,
    };
    std::fs::create_dir_all(&config.cache_root).unwrap();
    std::fs::create_dir_all(&config.output_root).unwrap();
    (tmp, config)
}

/// A minimal but valid `CardSet` JSON payload. Every field besides the ones
/// listed here carries `#[serde(default)]`, so this is the smallest object
/// that still deserializes.
pub fn minimal_card_json(uuid: &str, name: &str, set_code: &str, number: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "type": "Creature",
        "layout": "normal",
        "uuid": uuid,
        "setCode": set_code,
        "number": number,
    })
}

// ---------------------------------------------------------------------------
// Card pipeline fixtures — a minimal but schema-correct stand-in for every
// source `CardPipeline::run` reads, so a test can exercise the real pipeline
// end to end without a network fetch.
// ---------------------------------------------------------------------------

/// One row of the raw `card_bulk` source. Every field a test doesn't care
/// about gets the same fixed default across a fixture (single-faced,
/// English, nonfoil, paper-only, modern frame) so only the fields under
/// test vary between rows.
pub struct CardRow {
    pub set_code: &'static str,
    pub scryfall_id: &'static str,
    pub oracle_id: &'static str,
    pub number: &'static str,
    pub name: &'static str,
    pub mana_cost: &'static str,
    pub text: &'static str,
    pub type_line: &'static str,
    pub side: &'static str,
}

impl CardRow {
    pub fn new(
        set_code: &'static str,
        scryfall_id: &'static str,
        oracle_id: &'static str,
        number: &'static str,
        name: &'static str,
        mana_cost: &'static str,
        text: &'static str,
        type_line: &'static str,
    ) -> Self {
        Self {
            set_code,
            scryfall_id,
            oracle_id,
            number,
            name,
            mana_cost,
            text,
            type_line,
            side: "a",
        }
    }
}

/// Builds a `card_bulk` frame from `rows`, all single-faced (`faces` is a
/// genuine `null::list<struct>` of the right shape, not an untyped null, so
/// the stage-2 explode's schema resolution against it still type-checks).
pub fn card_bulk_frame(rows: &[CardRow]) -> DataFrame {
    let set_code: Vec<&str> = rows.iter().map(|r| r.set_code).collect();
    let scryfall_id: Vec<&str> = rows.iter().map(|r| r.scryfall_id).collect();
    let oracle_id: Vec<&str> = rows.iter().map(|r| r.oracle_id).collect();
    let number: Vec<&str> = rows.iter().map(|r| r.number).collect();
    let name: Vec<&str> = rows.iter().map(|r| r.name).collect();
    let mana_cost: Vec<&str> = rows.iter().map(|r| r.mana_cost).collect();
    let text: Vec<&str> = rows.iter().map(|r| r.text).collect();
    let type_line: Vec<&str> = rows.iter().map(|r| r.type_line).collect();
    let side: Vec<&str> = rows.iter().map(|r| r.side).collect();
    let language: Vec<&str> = rows.iter().map(|_| "English").collect();
    let layout: Vec<&str> = rows.iter().map(|_| "normal").collect();
    let frame_version: Vec<&str> = rows.iter().map(|_| "2015").collect();
    let release_date: Vec<&str> = rows.iter().map(|_| "2020-01-01").collect();
    let source_card_id: Vec<&str> = scryfall_id.clone();
    let is_funny: Vec<bool> = rows.iter().map(|_| false).collect();
    let watermark: Vec<Option<&str>> = rows.iter().map(|_| None).collect();
    let face_name: Vec<Option<&str>> = rows.iter().map(|_| None).collect();
    let flavor_text: Vec<Option<&str>> = rows.iter().map(|_| None).collect();
    let power: Vec<Option<&str>> = rows.iter().map(|_| None).collect();
    let toughness: Vec<Option<&str>> = rows.iter().map(|_| None).collect();
    let loyalty: Vec<Option<&str>> = rows.iter().map(|_| None).collect();
    // Only read for non-English rows by `lookups::set_number_lookup`, but
    // the column must exist in `card_bulk`'s schema regardless of row count.
    let multiverse_id: Vec<Option<&str>> = rows.iter().map(|_| None).collect();

    let mut df = df![
        "setCode" => set_code,
        "scryfallId" => scryfall_id,
        "oracleId" => oracle_id,
        "number" => number,
        "name" => name,
        "manaCost" => mana_cost,
        "text" => text,
        "typeLine" => type_line,
        "side" => side,
        "language" => language,
        "layout" => layout,
        "frameVersion" => frame_version,
        "releaseDate" => release_date,
        "sourceCardId" => source_card_id,
        "isFunny" => is_funny,
        "watermark" => watermark,
        "faceName" => face_name,
        "flavorText" => flavor_text,
        "power" => power,
        "toughness" => toughness,
        "loyalty" => loyalty,
        "multiverseId" => multiverse_id,
    ]
    .unwrap();

    let finishes: Vec<Series> = rows.iter().map(|_| Series::new("".into(), &["nonfoil"])).collect();
    let availability: Vec<Series> = rows.iter().map(|_| Series::new("".into(), &["paper"])).collect();
    let color_indicator: Vec<Series> = rows
        .iter()
        .map(|_| Series::new_empty("".into(), &DataType::String))
        .collect();
    df.with_column(Series::new("finishes".into(), finishes)).unwrap();
    df.with_column(Series::new("availability".into(), availability)).unwrap();
    df.with_column(Series::new("colorIndicator".into(), color_indicator)).unwrap();

    // `faces` must carry the real `list<struct<...>>` dtype stage 2's
    // explode path expects, even though every row here is single-faced
    // (null). A plain untyped-null column would fail stage 2's schema
    // resolution for the multi-faced branch before a single row is read.
    let null_faces = when(lit(true))
        .then(lit(NULL))
        .otherwise(concat_list([as_struct(vec![
            lit("").alias("name"),
            lit("").alias("manaCost"),
            lit("").alias("text"),
            lit("").alias("power"),
            lit("").alias("toughness"),
            lit("").alias("loyalty"),
            lit("").alias("typeLine"),
            lit("").alias("side"),
            lit("").alias("flavorText"),
        ])])
        .unwrap())
        .alias("faces");

    df.lazy().with_column(null_faces).collect().unwrap()
}

fn empty_utf8_frame(columns: &[&str]) -> DataFrame {
    let mut df = DataFrame::empty();
    for name in columns {
        df.with_column(Series::new_empty((*name).into(), &DataType::String)).unwrap();
    }
    df
}

/// Every non-`card_bulk` source `CardPipeline::run` touches, shaped to the
/// minimal schema each accessor's consumer actually reads, with zero rows
/// unless a test overrides one via the matching field.
#[derive(Default)]
pub struct AncillarySources {
    pub set_metadata: Option<DataFrame>,
    pub meld_triplets: Option<DataFrame>,
    pub commander_saltiness: Option<DataFrame>,
    pub token_product_map: Option<DataFrame>,
    pub marketplace_identifiers: Option<DataFrame>,
}

fn default_ancillary(name: &str) -> DataFrame {
    match name {
        "rulings" => empty_utf8_frame(&["oracleId", "date", "text"]),
        "set_metadata" => empty_utf8_frame(&["code", "parentCode", "duelDeckSide"]),
        "retail_inventory" => empty_utf8_frame(&["placeholder"]),
        "marketplace_identifiers" => empty_utf8_frame(&[
            "scryfallId",
            "side",
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
        ]),
        "commander_saltiness" => empty_utf8_frame(&[
            "oracleId",
            "name",
            "edhrecSaltiness",
            "leadershipSkillsBrawl",
            "leadershipSkillsCommander",
            "leadershipSkillsOathbreaker",
        ]),
        "combo_synergy" => empty_utf8_frame(&["name", "relatedName"]),
        "meld_triplets" => empty_utf8_frame(&["partAName", "partBName", "resultName"]),
        "secret_lair_subsets" => empty_utf8_frame(&["scryfallId", "subsetName"]),
        "marketplace_skus" => empty_utf8_frame(&["placeholder"]),
        "official_db_page_ids" => empty_utf8_frame(&["scryfallId", "pageId"]),
        "image_orientation" => empty_utf8_frame(&["scryfallId", "side", "orientation"]),
        "multiverse_bridge" => empty_utf8_frame(&["setCode", "tcgplayerGroupId"]),
        "sealed_products" => empty_utf8_frame(&["placeholder"]),
        "sealed_product_contents" => empty_utf8_frame(&["cardUuid", "sealedUuid", "finish"]),
        "deck_lists" => empty_utf8_frame(&["placeholder"]),
        "booster_configs" => empty_utf8_frame(&["placeholder"]),
        "token_product_map" => empty_utf8_frame(&["setCode", "tokenUuid", "tokenName"]),
        "manual_overrides" => empty_utf8_frame(&["scryfallId", "side", "watermark", "signature", "faceFlavorName"]),
        "meld_overrides" => empty_utf8_frame(&["scryfallId", "meldSide"]),
        "watermark_overrides" => empty_utf8_frame(&["scryfallId", "watermark"]),
        "foreign_data_exceptions" => {
            let base = empty_utf8_frame(&["scryfallId"]);
            let null_foreign_data = when(lit(true))
                .then(lit(NULL))
                .otherwise(as_struct(vec![
                    lit("").alias("language"),
                    lit("").alias("name"),
                    lit("").alias("text"),
                    lit("").alias("flavorText"),
                    lit("").alias("multiverseId"),
                    lit("").alias("foreignUuid"),
                ]))
                .alias("foreignData");
            base.lazy().with_column(null_foreign_data).collect().unwrap()
        }
        other => panic!("no default ancillary fixture for source {other}"),
    }
}

/// Loads a `SourceCache` backed entirely by in-memory fixtures: `card_bulk`
/// plus every declared ancillary source, each either an `overrides` value
/// or this module's schema-correct empty default.
pub fn load_pipeline_cache(config: &BuildConfig, card_bulk: DataFrame, overrides: AncillarySources) -> SourceCache {
    let provider = move |name: &str| -> Result<DataFrame> {
        Ok(match name {
            "card_bulk" => card_bulk.clone(),
            "set_metadata" => overrides.set_metadata.clone().unwrap_or_else(|| default_ancillary(name)),
            "meld_triplets" => overrides.meld_triplets.clone().unwrap_or_else(|| default_ancillary(name)),
            "commander_saltiness" => overrides
                .commander_saltiness
                .clone()
                .unwrap_or_else(|| default_ancillary(name)),
            "token_product_map" => overrides
                .token_product_map
                .clone()
                .unwrap_or_else(|| default_ancillary(name)),
            "marketplace_identifiers" => overrides
                .marketplace_identifiers
                .clone()
                .unwrap_or_else(|| default_ancillary(name)),
            other => default_ancillary(other),
        })
    };

    let mut cache = SourceCache::new(config);
    cache.load_all(&provider, None, None).unwrap();
    cache
}
