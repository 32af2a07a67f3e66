use serde::{Deserialize, Serialize};

use super::card::CardSetDeck;

// ---------------------------------------------------------------------------
// DeckList — Summary info for a deck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckList {
    pub code: String,
    pub name: String,
    pub file_name: String,
    #[serde(rename = "type")]
    pub type_field: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Deck — full board-grouped card list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(default)]
    pub commander: Vec<CardSetDeck>,
    #[serde(default)]
    pub display_commander: Vec<CardSetDeck>,
    #[serde(default)]
    pub mainboard: Vec<CardSetDeck>,
    #[serde(default)]
    pub planes: Vec<CardSetDeck>,
    #[serde(default)]
    pub schemes: Vec<CardSetDeck>,
    #[serde(default)]
    pub sideboard: Vec<CardSetDeck>,
    #[serde(default)]
    pub tokens: Vec<CardSetDeck>,
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub type_field: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub sealed_product_uuids: Option<Vec<String>>,
}
