use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::card::{CardSet, CardToken};
use super::deck::DeckList;
use super::sealed::SealedProduct;

// ---------------------------------------------------------------------------
// SetList — Summary info for a set (used in set list endpoints)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetList {
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_field: String,
    pub release_date: String,
    pub base_set_size: i64,
    pub total_set_size: i64,
    pub keyrune_code: String,
    #[serde(default)]
    pub translations: Option<serde_json::Value>,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub parent_code: Option<String>,
    #[serde(default)]
    pub mtgo_code: Option<String>,
    #[serde(default)]
    pub token_set_code: Option<String>,
    #[serde(default)]
    pub mcm_id: Option<i64>,
    #[serde(default)]
    pub mcm_id_extras: Option<i64>,
    #[serde(default)]
    pub mcm_name: Option<String>,
    #[serde(default)]
    pub tcgplayer_group_id: Option<i64>,
    #[serde(default)]
    pub cardsphere_set_id: Option<i64>,
    #[serde(default)]
    pub is_foil_only: Option<bool>,
    #[serde(default)]
    pub is_non_foil_only: Option<bool>,
    #[serde(default)]
    pub is_online_only: Option<bool>,
    #[serde(default)]
    pub is_paper_only: Option<bool>,
    #[serde(default)]
    pub is_foreign_only: Option<bool>,
    #[serde(default)]
    pub is_partial_preview: Option<bool>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub decks: Option<Vec<DeckList>>,
    #[serde(default)]
    pub sealed_product: Option<Vec<SealedProduct>>,
}

// ---------------------------------------------------------------------------
// MtgSet — Full set data including cards and tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MtgSet {
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_field: String,
    pub release_date: String,
    pub base_set_size: i64,
    pub total_set_size: i64,
    pub keyrune_code: String,
    #[serde(default)]
    pub translations: Option<serde_json::Value>,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub parent_code: Option<String>,
    #[serde(default)]
    pub mtgo_code: Option<String>,
    #[serde(default)]
    pub token_set_code: Option<String>,
    #[serde(default)]
    pub mcm_id: Option<i64>,
    #[serde(default)]
    pub mcm_id_extras: Option<i64>,
    #[serde(default)]
    pub mcm_name: Option<String>,
    #[serde(default)]
    pub tcgplayer_group_id: Option<i64>,
    #[serde(default)]
    pub cardsphere_set_id: Option<i64>,
    #[serde(default)]
    pub is_foil_only: Option<bool>,
    #[serde(default)]
    pub is_non_foil_only: Option<bool>,
    #[serde(default)]
    pub is_online_only: Option<bool>,
    #[serde(default)]
    pub is_paper_only: Option<bool>,
    #[serde(default)]
    pub is_foreign_only: Option<bool>,
    #[serde(default)]
    pub is_partial_preview: Option<bool>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,

    // -- Full set specific fields --
    #[serde(default)]
    pub cards: Vec<CardSet>,
    #[serde(default)]
    pub tokens: Vec<CardToken>,
    #[serde(default)]
    pub booster: Option<HashMap<String, crate::models::sub::BoosterConfig>>,
    #[serde(default)]
    pub decks: Vec<super::deck::Deck>,
    #[serde(default)]
    pub sealed_product: Vec<SealedProduct>,
}
