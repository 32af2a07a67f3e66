//! Integration tests for the booster pack simulator, exercising scenarios
//! beyond the crate's own inline weighted-selection unit tests: multi-pack
//! boxes and duplicate-allowing sheets.

mod common;

use cardatlas::booster::BoosterSimulator;
use cardatlas::models::card::CardSet;
use cardatlas::models::sub::{BoosterConfig, BoosterPack, BoosterSheet};
use std::collections::HashMap;

fn card(uuid: &str, name: &str) -> CardSet {
    serde_json::from_value(common::minimal_card_json(uuid, name, "NEO", "1")).unwrap()
}

fn config_with_duplicates_allowed() -> BoosterConfig {
    let mut sheet_cards = HashMap::new();
    sheet_cards.insert("u1".to_string(), 1);
    sheet_cards.insert("u2".to_string(), 1);

    let mut sheets = HashMap::new();
    sheets.insert(
        "common".to_string(),
        BoosterSheet {
            allow_duplicates: Some(true),
            balance_colors: None,
            cards: sheet_cards,
            foil: false,
            fixed: None,
            total_weight: 2,
        },
    );

    let mut contents = HashMap::new();
    contents.insert("common".to_string(), 5);

    BoosterConfig {
        boosters: vec![BoosterPack { contents, weight: 1 }],
        boosters_total_weight: 1,
        name: Some("draft".to_string()),
        sheets,
        source_set_codes: vec!["NEO".to_string()],
    }
}

#[test]
fn allow_duplicates_sheet_can_draw_more_than_its_distinct_card_count() {
    let config = config_with_duplicates_allowed();
    let mut cards = HashMap::new();
    cards.insert("u1".to_string(), card("u1", "Card One"));
    cards.insert("u2".to_string(), card("u2", "Card Two"));

    let sim = BoosterSimulator::new(&config, &cards);
    let pack = sim.open_pack().unwrap();
    assert_eq!(pack.len(), 5);
}

#[test]
fn no_duplicates_sheet_never_draws_more_than_its_distinct_card_count() {
    let mut sheet_cards = HashMap::new();
    sheet_cards.insert("u1".to_string(), 1);
    sheet_cards.insert("u2".to_string(), 1);

    let mut sheets = HashMap::new();
    sheets.insert(
        "common".to_string(),
        BoosterSheet {
            allow_duplicates: Some(false),
            balance_colors: None,
            cards: sheet_cards,
            foil: false,
            fixed: None,
            total_weight: 2,
        },
    );
    let mut contents = HashMap::new();
    contents.insert("common".to_string(), 5);
    let config = BoosterConfig {
        boosters: vec![BoosterPack { contents, weight: 1 }],
        boosters_total_weight: 1,
        name: Some("draft".to_string()),
        sheets,
        source_set_codes: vec!["NEO".to_string()],
    };

    let mut cards = HashMap::new();
    cards.insert("u1".to_string(), card("u1", "Card One"));
    cards.insert("u2".to_string(), card("u2", "Card Two"));

    let sim = BoosterSimulator::new(&config, &cards);
    let pack = sim.open_pack().unwrap();
    assert_eq!(pack.len(), 2);
}

#[test]
fn open_box_produces_one_pack_per_requested_count() {
    let config = config_with_duplicates_allowed();
    let mut cards = HashMap::new();
    cards.insert("u1".to_string(), card("u1", "Card One"));
    cards.insert("u2".to_string(), card("u2", "Card Two"));

    let sim = BoosterSimulator::new(&config, &cards);
    let packs = sim.open_box(24).unwrap();
    assert_eq!(packs.len(), 24);
    for pack in &packs {
        assert_eq!(pack.len(), 5);
    }
}

#[test]
fn unknown_sheet_name_in_pack_template_is_skipped_not_an_error() {
    let mut contents = HashMap::new();
    contents.insert("nonexistent".to_string(), 3);
    let config = BoosterConfig {
        boosters: vec![BoosterPack { contents, weight: 1 }],
        boosters_total_weight: 1,
        name: None,
        sheets: HashMap::new(),
        source_set_codes: vec![],
    };
    let cards = HashMap::new();
    let sim = BoosterSimulator::new(&config, &cards);
    let pack = sim.open_pack().unwrap();
    assert!(pack.is_empty());
}
