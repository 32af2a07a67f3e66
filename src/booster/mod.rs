//! Booster pack simulator.
//!
//! Simulates opening a booster pack by performing weighted random pack-template
//! selection followed by weighted random card selection from each sheet in the
//! template, over the config and card data already assembled for a set's
//! `booster` field.
//!
//! Operates directly on an assembled [`BoosterConfig`] and a `uuid -> card`
//! map, since this crate has no query layer to page through.

use crate::error::{CardatlasError, Result};
use crate::models::card::CardSet;
use crate::models::sub::{BoosterConfig, BoosterSheet};
use rand::prelude::*;
use std::collections::HashMap;

/// Simulates opening packs for one booster configuration (e.g. a set's
/// "draft" booster, as opposed to its "collector" booster).
pub struct BoosterSimulator<'a> {
    config: &'a BoosterConfig,
    cards_by_uuid: &'a HashMap<String, CardSet>,
}

impl<'a> BoosterSimulator<'a> {
    pub fn new(config: &'a BoosterConfig, cards_by_uuid: &'a HashMap<String, CardSet>) -> Self {
        Self { config, cards_by_uuid }
    }

    /// Open a single pack: pick a weighted pack template, then for each sheet
    /// named in that template pick the declared number of cards.
    pub fn open_pack(&self) -> Result<Vec<CardSet>> {
        if self.config.boosters.is_empty() {
            return Err(CardatlasError::NotFound(
                "booster configuration has no pack templates".to_string(),
            ));
        }

        let template = pick_pack(&self.config.boosters);
        let mut uuids: Vec<String> = Vec::new();

        for (sheet_name, pick_count) in &template.contents {
            if *pick_count <= 0 {
                continue;
            }
            let Some(sheet) = self.config.sheets.get(sheet_name) else {
                continue;
            };
            uuids.extend(pick_from_sheet(sheet, *pick_count as usize));
        }

        Ok(uuids
            .iter()
            .filter_map(|uuid| self.cards_by_uuid.get(uuid).cloned())
            .collect())
    }

    /// Open a box containing `packs` booster packs.
    pub fn open_box(&self, packs: usize) -> Result<Vec<Vec<CardSet>>> {
        (0..packs).map(|_| self.open_pack()).collect()
    }
}

// ---------------------------------------------------------------------------
// Free-standing weighted-selection helpers (pure; no I/O).
// ---------------------------------------------------------------------------

fn pick_pack(boosters: &[crate::models::sub::BoosterPack]) -> &crate::models::sub::BoosterPack {
    let mut rng = thread_rng();
    let total_weight: i64 = boosters.iter().map(|b| b.weight.max(1)).sum();

    if total_weight <= 0 {
        return &boosters[rng.gen_range(0..boosters.len())];
    }

    let mut roll = rng.gen_range(0..total_weight);
    for booster in boosters {
        roll -= booster.weight.max(1);
        if roll < 0 {
            return booster;
        }
    }
    boosters.last().unwrap()
}

fn pick_from_sheet(sheet: &BoosterSheet, count: usize) -> Vec<String> {
    let mut rng = thread_rng();
    if sheet.cards.is_empty() {
        return Vec::new();
    }

    let uuids: Vec<String> = sheet.cards.keys().cloned().collect();
    let weights: Vec<i64> = uuids.iter().map(|u| sheet.cards[u]).collect();

    if sheet.allow_duplicates.unwrap_or(false) {
        weighted_with_replacement(&uuids, &weights, count, &mut rng)
    } else {
        weighted_without_replacement(&uuids, &weights, count, &mut rng)
    }
}

fn weighted_with_replacement(
    uuids: &[String],
    weights: &[i64],
    count: usize,
    rng: &mut ThreadRng,
) -> Vec<String> {
    let total_weight: i64 = weights.iter().sum();
    if total_weight <= 0 {
        return Vec::new();
    }

    let mut results = Vec::with_capacity(count);
    for _ in 0..count {
        let mut roll = rng.gen_range(0..total_weight);
        for (i, &w) in weights.iter().enumerate() {
            roll -= w;
            if roll < 0 {
                results.push(uuids[i].clone());
                break;
            }
        }
    }
    results
}

fn weighted_without_replacement(
    uuids: &[String],
    weights: &[i64],
    count: usize,
    rng: &mut ThreadRng,
) -> Vec<String> {
    let actual_count = count.min(uuids.len());
    let mut remaining_uuids: Vec<String> = uuids.to_vec();
    let mut remaining_weights: Vec<i64> = weights.to_vec();
    let mut results = Vec::with_capacity(actual_count);

    for _ in 0..actual_count {
        if remaining_uuids.is_empty() {
            break;
        }
        let total_weight: i64 = remaining_weights.iter().sum();
        if total_weight <= 0 {
            break;
        }

        let mut roll = rng.gen_range(0..total_weight);
        let mut picked_idx = remaining_uuids.len() - 1;
        for (i, &w) in remaining_weights.iter().enumerate() {
            roll -= w;
            if roll < 0 {
                picked_idx = i;
                break;
            }
        }

        results.push(remaining_uuids.remove(picked_idx));
        remaining_weights.remove(picked_idx);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sub::BoosterPack;

    fn sample_config() -> BoosterConfig {
        let mut sheet_cards = HashMap::new();
        sheet_cards.insert("uuid-1".to_string(), 1);
        sheet_cards.insert("uuid-2".to_string(), 1);

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
        contents.insert("common".to_string(), 2);

        BoosterConfig {
            boosters: vec![BoosterPack { contents, weight: 1 }],
            boosters_total_weight: 1,
            name: Some("draft".to_string()),
            sheets,
            source_set_codes: vec!["NEO".to_string()],
        }
    }

    #[test]
    fn open_pack_draws_declared_count() {
        let config = sample_config();
        let mut cards = HashMap::new();
        cards.insert(
            "uuid-1".to_string(),
            serde_json::from_value::<CardSet>(serde_json::json!({
                "name": "Test Card", "type": "Creature", "layout": "normal",
                "uuid": "uuid-1", "setCode": "NEO", "number": "1",
            }))
            .unwrap(),
        );
        cards.insert(
            "uuid-2".to_string(),
            serde_json::from_value::<CardSet>(serde_json::json!({
                "name": "Test Card 2", "type": "Creature", "layout": "normal",
                "uuid": "uuid-2", "setCode": "NEO", "number": "2",
            }))
            .unwrap(),
        );

        let sim = BoosterSimulator::new(&config, &cards);
        let pack = sim.open_pack().unwrap();
        assert_eq!(pack.len(), 2);
    }

    #[test]
    fn empty_config_errors() {
        let config = BoosterConfig {
            boosters: vec![],
            boosters_total_weight: 0,
            name: None,
            sheets: HashMap::new(),
            source_set_codes: vec![],
        };
        let cards = HashMap::new();
        let sim = BoosterSimulator::new(&config, &cards);
        assert!(sim.open_pack().is_err());
    }
}
