use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CardSet — The primary card model (all fields from the full printing chain)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSet {
    // -- CardBase fields --
    pub name: String,
    #[serde(default)]
    pub ascii_name: Option<String>,
    #[serde(default)]
    pub face_name: Option<String>,
    #[serde(rename = "type")]
    pub type_field: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub subtypes: Vec<String>,
    #[serde(default)]
    pub supertypes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default)]
    pub color_indicator: Option<Vec<String>>,
    #[serde(default)]
    pub produced_mana: Option<Vec<String>>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub layout: String,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub loyalty: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub identifiers: Option<serde_json::Value>,
    #[serde(default)]
    pub is_funny: Option<bool>,
    #[serde(default)]
    pub edhrec_saltiness: Option<f64>,
    #[serde(default)]
    pub subsets: Option<Vec<String>>,

    // -- CardAtomicBase fields --
    #[serde(default)]
    pub converted_mana_cost: Option<f64>,
    #[serde(default)]
    pub mana_value: Option<f64>,
    #[serde(default)]
    pub face_converted_mana_cost: Option<f64>,
    #[serde(default)]
    pub face_mana_value: Option<f64>,
    #[serde(default)]
    pub defense: Option<String>,
    #[serde(default)]
    pub hand: Option<String>,
    #[serde(default)]
    pub life: Option<String>,
    #[serde(default)]
    pub edhrec_rank: Option<i64>,
    #[serde(default)]
    pub foreign_data: Option<serde_json::Value>,
    #[serde(default)]
    pub legalities: Option<serde_json::Value>,
    #[serde(default)]
    pub leadership_skills: Option<serde_json::Value>,
    #[serde(default)]
    pub rulings: Option<serde_json::Value>,
    #[serde(default)]
    pub has_alternative_deck_limit: Option<bool>,
    #[serde(default)]
    pub is_reserved: Option<bool>,
    #[serde(default)]
    pub is_game_changer: Option<bool>,
    #[serde(default)]
    pub printings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_urls: Option<serde_json::Value>,
    #[serde(default)]
    pub related_cards: Option<serde_json::Value>,

    // -- CardPrintingBase fields --
    pub uuid: String,
    pub set_code: String,
    pub number: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub artist_ids: Option<Vec<String>>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub frame_version: Option<String>,
    #[serde(default)]
    pub frame_effects: Option<Vec<String>>,
    #[serde(default)]
    pub watermark: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub security_stamp: Option<String>,
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub flavor_name: Option<String>,
    #[serde(default)]
    pub face_flavor_name: Option<String>,
    #[serde(default)]
    pub original_text: Option<String>,
    #[serde(default)]
    pub original_type: Option<String>,
    #[serde(default)]
    pub printed_name: Option<String>,
    #[serde(default)]
    pub printed_text: Option<String>,
    #[serde(default)]
    pub printed_type: Option<String>,
    #[serde(default)]
    pub face_printed_name: Option<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(default)]
    pub booster_types: Option<Vec<String>>,
    #[serde(default)]
    pub finishes: Vec<String>,
    #[serde(default)]
    pub promo_types: Option<Vec<String>>,
    #[serde(default)]
    pub attraction_lights: Option<Vec<i64>>,
    #[serde(default)]
    pub is_full_art: Option<bool>,
    #[serde(default)]
    pub is_online_only: Option<bool>,
    #[serde(default)]
    pub is_oversized: Option<bool>,
    #[serde(default)]
    pub is_promo: Option<bool>,
    #[serde(default)]
    pub is_reprint: Option<bool>,
    #[serde(default)]
    pub is_textless: Option<bool>,
    #[serde(default)]
    pub other_face_ids: Option<Vec<String>>,
    #[serde(default)]
    pub card_parts: Option<Vec<String>>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub source_products: Option<serde_json::Value>,

    // -- CardPrintingFull fields --
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub duel_deck: Option<String>,
    #[serde(default)]
    pub is_rebalanced: Option<bool>,
    #[serde(default)]
    pub original_printings: Option<Vec<String>>,
    #[serde(default)]
    pub rebalanced_printings: Option<Vec<String>>,
    #[serde(default)]
    pub original_release_date: Option<String>,
    #[serde(default)]
    pub is_alternative: Option<bool>,
    #[serde(default)]
    pub is_story_spotlight: Option<bool>,
    #[serde(default)]
    pub is_timeshifted: Option<bool>,
    #[serde(default)]
    pub has_content_warning: Option<bool>,
    #[serde(default)]
    pub variations: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// CardAtomic — Oracle-only card (no printing fields)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAtomic {
    // -- CardBase fields --
    pub name: String,
    #[serde(default)]
    pub ascii_name: Option<String>,
    #[serde(default)]
    pub face_name: Option<String>,
    #[serde(rename = "type")]
    pub type_field: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub subtypes: Vec<String>,
    #[serde(default)]
    pub supertypes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default)]
    pub color_indicator: Option<Vec<String>>,
    #[serde(default)]
    pub produced_mana: Option<Vec<String>>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub layout: String,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub loyalty: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub identifiers: Option<serde_json::Value>,
    #[serde(default)]
    pub is_funny: Option<bool>,
    #[serde(default)]
    pub edhrec_saltiness: Option<f64>,
    #[serde(default)]
    pub subsets: Option<Vec<String>>,

    // -- CardAtomicBase fields --
    #[serde(default)]
    pub converted_mana_cost: Option<f64>,
    #[serde(default)]
    pub mana_value: Option<f64>,
    #[serde(default)]
    pub face_converted_mana_cost: Option<f64>,
    #[serde(default)]
    pub face_mana_value: Option<f64>,
    #[serde(default)]
    pub defense: Option<String>,
    #[serde(default)]
    pub hand: Option<String>,
    #[serde(default)]
    pub life: Option<String>,
    #[serde(default)]
    pub edhrec_rank: Option<i64>,
    #[serde(default)]
    pub foreign_data: Option<serde_json::Value>,
    #[serde(default)]
    pub legalities: Option<serde_json::Value>,
    #[serde(default)]
    pub leadership_skills: Option<serde_json::Value>,
    #[serde(default)]
    pub rulings: Option<serde_json::Value>,
    #[serde(default)]
    pub has_alternative_deck_limit: Option<bool>,
    #[serde(default)]
    pub is_reserved: Option<bool>,
    #[serde(default)]
    pub is_game_changer: Option<bool>,
    #[serde(default)]
    pub printings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_urls: Option<serde_json::Value>,
    #[serde(default)]
    pub related_cards: Option<serde_json::Value>,

    // -- Atomic-specific --
    #[serde(default)]
    pub first_printing: Option<String>,
}

// ---------------------------------------------------------------------------
// CardToken — Token card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardToken {
    // -- CardBase fields --
    pub name: String,
    #[serde(default)]
    pub ascii_name: Option<String>,
    #[serde(default)]
    pub face_name: Option<String>,
    #[serde(rename = "type")]
    pub type_field: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub subtypes: Vec<String>,
    #[serde(default)]
    pub supertypes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default)]
    pub color_indicator: Option<Vec<String>>,
    #[serde(default)]
    pub produced_mana: Option<Vec<String>>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub layout: String,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub loyalty: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub identifiers: Option<serde_json::Value>,
    #[serde(default)]
    pub is_funny: Option<bool>,
    #[serde(default)]
    pub edhrec_saltiness: Option<f64>,
    #[serde(default)]
    pub subsets: Option<Vec<String>>,

    // -- CardPrintingBase fields --
    pub uuid: String,
    pub set_code: String,
    pub number: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub artist_ids: Option<Vec<String>>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub frame_version: Option<String>,
    #[serde(default)]
    pub frame_effects: Option<Vec<String>>,
    #[serde(default)]
    pub watermark: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub security_stamp: Option<String>,
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub flavor_name: Option<String>,
    #[serde(default)]
    pub face_flavor_name: Option<String>,
    #[serde(default)]
    pub original_text: Option<String>,
    #[serde(default)]
    pub original_type: Option<String>,
    #[serde(default)]
    pub printed_name: Option<String>,
    #[serde(default)]
    pub printed_text: Option<String>,
    #[serde(default)]
    pub printed_type: Option<String>,
    #[serde(default)]
    pub face_printed_name: Option<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(default)]
    pub booster_types: Option<Vec<String>>,
    #[serde(default)]
    pub finishes: Vec<String>,
    #[serde(default)]
    pub promo_types: Option<Vec<String>>,
    #[serde(default)]
    pub attraction_lights: Option<Vec<i64>>,
    #[serde(default)]
    pub is_full_art: Option<bool>,
    #[serde(default)]
    pub is_online_only: Option<bool>,
    #[serde(default)]
    pub is_oversized: Option<bool>,
    #[serde(default)]
    pub is_promo: Option<bool>,
    #[serde(default)]
    pub is_reprint: Option<bool>,
    #[serde(default)]
    pub is_textless: Option<bool>,
    #[serde(default)]
    pub other_face_ids: Option<Vec<String>>,
    #[serde(default)]
    pub card_parts: Option<Vec<String>>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub source_products: Option<serde_json::Value>,

    // -- Token-specific fields --
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub reverse_related: Option<Vec<String>>,
    #[serde(default)]
    pub related_cards: Option<serde_json::Value>,
    #[serde(default)]
    pub token_products: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// CardDeck — Card in a deck (all CardSet fields + deck-specific)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDeck {
    // -- CardBase fields --
    pub name: String,
    #[serde(default)]
    pub ascii_name: Option<String>,
    #[serde(default)]
    pub face_name: Option<String>,
    #[serde(rename = "type")]
    pub type_field: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub subtypes: Vec<String>,
    #[serde(default)]
    pub supertypes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default)]
    pub color_indicator: Option<Vec<String>>,
    #[serde(default)]
    pub produced_mana: Option<Vec<String>>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub layout: String,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub loyalty: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub identifiers: Option<serde_json::Value>,
    #[serde(default)]
    pub is_funny: Option<bool>,
    #[serde(default)]
    pub edhrec_saltiness: Option<f64>,
    #[serde(default)]
    pub subsets: Option<Vec<String>>,

    // -- CardAtomicBase fields --
    #[serde(default)]
    pub converted_mana_cost: Option<f64>,
    #[serde(default)]
    pub mana_value: Option<f64>,
    #[serde(default)]
    pub face_converted_mana_cost: Option<f64>,
    #[serde(default)]
    pub face_mana_value: Option<f64>,
    #[serde(default)]
    pub defense: Option<String>,
    #[serde(default)]
    pub hand: Option<String>,
    #[serde(default)]
    pub life: Option<String>,
    #[serde(default)]
    pub edhrec_rank: Option<i64>,
    #[serde(default)]
    pub foreign_data: Option<serde_json::Value>,
    #[serde(default)]
    pub legalities: Option<serde_json::Value>,
    #[serde(default)]
    pub leadership_skills: Option<serde_json::Value>,
    #[serde(default)]
    pub rulings: Option<serde_json::Value>,
    #[serde(default)]
    pub has_alternative_deck_limit: Option<bool>,
    #[serde(default)]
    pub is_reserved: Option<bool>,
    #[serde(default)]
    pub is_game_changer: Option<bool>,
    #[serde(default)]
    pub printings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_urls: Option<serde_json::Value>,
    #[serde(default)]
    pub related_cards: Option<serde_json::Value>,

    // -- CardPrintingBase fields --
    pub uuid: String,
    pub set_code: String,
    pub number: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub artist_ids: Option<Vec<String>>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub frame_version: Option<String>,
    #[serde(default)]
    pub frame_effects: Option<Vec<String>>,
    #[serde(default)]
    pub watermark: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub security_stamp: Option<String>,
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub flavor_name: Option<String>,
    #[serde(default)]
    pub face_flavor_name: Option<String>,
    #[serde(default)]
    pub original_text: Option<String>,
    #[serde(default)]
    pub original_type: Option<String>,
    #[serde(default)]
    pub printed_name: Option<String>,
    #[serde(default)]
    pub printed_text: Option<String>,
    #[serde(default)]
    pub printed_type: Option<String>,
    #[serde(default)]
    pub face_printed_name: Option<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(default)]
    pub booster_types: Option<Vec<String>>,
    #[serde(default)]
    pub finishes: Vec<String>,
    #[serde(default)]
    pub promo_types: Option<Vec<String>>,
    #[serde(default)]
    pub attraction_lights: Option<Vec<i64>>,
    #[serde(default)]
    pub is_full_art: Option<bool>,
    #[serde(default)]
    pub is_online_only: Option<bool>,
    #[serde(default)]
    pub is_oversized: Option<bool>,
    #[serde(default)]
    pub is_promo: Option<bool>,
    #[serde(default)]
    pub is_reprint: Option<bool>,
    #[serde(default)]
    pub is_textless: Option<bool>,
    #[serde(default)]
    pub other_face_ids: Option<Vec<String>>,
    #[serde(default)]
    pub card_parts: Option<Vec<String>>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub source_products: Option<serde_json::Value>,

    // -- CardPrintingFull fields --
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub duel_deck: Option<String>,
    #[serde(default)]
    pub is_rebalanced: Option<bool>,
    #[serde(default)]
    pub original_printings: Option<Vec<String>>,
    #[serde(default)]
    pub rebalanced_printings: Option<Vec<String>>,
    #[serde(default)]
    pub original_release_date: Option<String>,
    #[serde(default)]
    pub is_alternative: Option<bool>,
    #[serde(default)]
    pub is_story_spotlight: Option<bool>,
    #[serde(default)]
    pub is_timeshifted: Option<bool>,
    #[serde(default)]
    pub has_content_warning: Option<bool>,
    #[serde(default)]
    pub variations: Option<Vec<String>>,

    // -- Deck-specific fields --
    pub count: i64,
    #[serde(default)]
    pub is_foil: Option<bool>,
    #[serde(default)]
    pub is_etched: Option<bool>,
}

// ---------------------------------------------------------------------------
// CardSetDeck — Minimal card reference in a deck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSetDeck {
    pub count: i64,
    #[serde(default)]
    pub is_foil: Option<bool>,
    pub uuid: String,
}
