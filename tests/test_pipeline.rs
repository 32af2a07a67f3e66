//! End-to-end tests against `CardPipeline::run`, backed entirely by
//! in-memory fixtures from `tests/common`.

mod common;

use cardatlas::config;
use cardatlas::uuid_gen;
use cardatlas::CardPipeline;
use common::{card_bulk_frame, load_pipeline_cache, temp_config, AncillarySources, CardRow};
use polars::prelude::*;

fn read_cards(cache_root: &std::path::Path, set_code: &str) -> DataFrame {
    LazyFrame::scan_parquet(config::cards_partition_path(cache_root, set_code), ScanArgsParquet::default())
        .unwrap()
        .collect()
        .unwrap()
}

fn read_tokens(cache_root: &std::path::Path, set_code: &str) -> DataFrame {
    LazyFrame::scan_parquet(config::tokens_partition_path(cache_root, set_code), ScanArgsParquet::default())
        .unwrap()
        .collect()
        .unwrap()
}

fn list_col(df: &DataFrame, name: &str, row: usize) -> Vec<String> {
    let series = df.column(name).unwrap().list().unwrap().get_as_series(row).unwrap();
    series
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .map(|s| s.to_string())
        .collect()
}

/// `colorIdentity` must include the mana-cost colors (`colors` itself) plus
/// any color symbol printed in the card's own rules text, even though that
/// symbol never appears in the casting cost.
#[test]
fn color_identity_includes_rules_text_colors_beyond_mana_cost() {
    let (_tmp, config) = temp_config();

    let rows = vec![CardRow::new(
        "TST",
        "scry-1",
        "oracle-1",
        "1",
        "Test Conduit",
        "{U}",
        "{T}: Add {R}.",
        "Artifact",
    )];
    let card_bulk = card_bulk_frame(&rows);
    let cache = load_pipeline_cache(&config, card_bulk, AncillarySources::default());

    CardPipeline::new(&cache, &config)
        .run(&["TST".to_string()], None)
        .unwrap();

    let cards = read_cards(&config.cache_root, "TST");
    assert_eq!(cards.height(), 1);

    let colors = list_col(&cards, "colors", 0);
    let color_identity = list_col(&cards, "colorIdentity", 0);
    assert_eq!(colors, vec!["U".to_string()]);
    assert_eq!(color_identity, vec!["U".to_string(), "R".to_string()]);
    assert!(colors.iter().all(|c| color_identity.contains(c)));
}

/// An `"A-"`-prefixed Alchemy printing in a rebalanced set links back to its
/// original printing through `set_metadata.parentCode`, not a literal
/// `setCode` match (the rebalanced card lives in its own set code, `YMID`,
/// whose `parentCode` is `MID`).
#[test]
fn rebalanced_card_links_to_original_via_parent_code() {
    let (_tmp, config) = temp_config();

    let rows = vec![
        CardRow::new(
            "MID",
            "scry-original",
            "oracle-original",
            "42",
            "Lightning Strike",
            "{1}{R}",
            "Lightning Strike deals 3 damage to any target.",
            "Instant",
        ),
        CardRow::new(
            "YMID",
            "scry-rebalanced",
            "oracle-rebalanced",
            "42",
            "A-Lightning Strike",
            "{1}{R}",
            "A-Lightning Strike deals 2 damage to any target.",
            "Instant",
        ),
    ];
    let card_bulk = card_bulk_frame(&rows);

    let set_metadata = df![
        "code" => ["MID", "YMID"],
        "parentCode" => [None::<&str>, Some("MID")],
        "duelDeckSide" => [None::<&str>, None::<&str>],
    ]
    .unwrap();

    let overrides = AncillarySources {
        set_metadata: Some(set_metadata),
        ..Default::default()
    };
    let cache = load_pipeline_cache(&config, card_bulk, overrides);

    CardPipeline::new(&cache, &config)
        .run(&["MID".to_string(), "YMID".to_string()], None)
        .unwrap();

    let original = read_cards(&config.cache_root, "MID");
    let rebalanced = read_cards(&config.cache_root, "YMID");

    let original_uuid = original.column("uuid").unwrap().str().unwrap().get(0).unwrap().to_string();
    let rebalanced_uuid = rebalanced.column("uuid").unwrap().str().unwrap().get(0).unwrap().to_string();

    assert_eq!(list_col(&rebalanced, "originalPrintings", 0), vec![original_uuid]);
    assert_eq!(list_col(&original, "rebalancedPrintings", 0), vec![rebalanced_uuid]);

    let is_rebalanced = rebalanced.column("isRebalanced").unwrap().bool().unwrap().get(0).unwrap();
    assert!(is_rebalanced);
}

/// A token has no EDHREC deck-entry history of its own; its `edhrecSaltiness`
/// is propagated from the spell that creates it (matched by the spell's
/// rules text mentioning the token's name).
#[test]
fn token_salt_is_propagated_from_its_creating_spell() {
    let (_tmp, config) = temp_config();

    let rows = vec![
        CardRow::new(
            "TST",
            "scry-spell",
            "oracle-spell",
            "1",
            "Raise the Saprolings",
            "{2}{G}",
            "Create two 1/1 green Saproling creature tokens.",
            "Sorcery",
        ),
        CardRow::new(
            "TST",
            "scry-token",
            "oracle-token",
            "T1",
            "Saproling",
            "",
            "",
            "Token Creature — Saproling",
        ),
    ];
    let card_bulk = card_bulk_frame(&rows);

    let token_uuid = uuid_gen::face_uuid("scry-token", Some("a"), "Saproling", None).to_string();
    let token_product_map = df![
        "setCode" => ["TST"],
        "tokenUuid" => [token_uuid.as_str()],
        "tokenName" => ["Saproling"],
    ]
    .unwrap();

    let commander_saltiness = df![
        "oracleId" => ["oracle-spell"],
        "name" => ["Raise the Saprolings"],
        "edhrecSaltiness" => [0.75f64],
        "leadershipSkillsBrawl" => [true],
        "leadershipSkillsCommander" => [true],
        "leadershipSkillsOathbreaker" => [true],
    ]
    .unwrap();

    let overrides = AncillarySources {
        token_product_map: Some(token_product_map),
        commander_saltiness: Some(commander_saltiness),
        ..Default::default()
    };
    let cache = load_pipeline_cache(&config, card_bulk, overrides);

    CardPipeline::new(&cache, &config)
        .run(&["TST".to_string()], None)
        .unwrap();

    let tokens = read_tokens(&config.cache_root, "TST");
    assert_eq!(tokens.height(), 1);

    let saltiness = tokens.column("edhrecSaltiness").unwrap().f64().unwrap().get(0);
    assert_eq!(saltiness, Some(0.75));
}
