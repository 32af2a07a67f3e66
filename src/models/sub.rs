use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Meta
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Meta {
    pub date: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Identifiers {
    #[serde(default)]
    pub abu_id: Option<String>,
    #[serde(default)]
    pub cardtrader_id: Option<String>,
    #[serde(default)]
    pub csi_id: Option<String>,
    #[serde(default)]
    pub miniaturemarket_id: Option<String>,
    #[serde(default)]
    pub mvp_id: Option<String>,
    #[serde(default)]
    pub scg_id: Option<String>,
    #[serde(default)]
    pub tnt_id: Option<String>,
    #[serde(default)]
    pub card_kingdom_etched_id: Option<String>,
    #[serde(default)]
    pub card_kingdom_foil_id: Option<String>,
    #[serde(default)]
    pub card_kingdom_id: Option<String>,
    #[serde(default)]
    pub cardsphere_id: Option<String>,
    #[serde(default)]
    pub cardsphere_foil_id: Option<String>,
    #[serde(default)]
    pub deckbox_id: Option<String>,
    #[serde(default)]
    pub mcm_id: Option<String>,
    #[serde(default)]
    pub mcm_meta_id: Option<String>,
    #[serde(default)]
    pub mtg_arena_id: Option<String>,
    #[serde(default)]
    pub mtgjson_foil_version_id: Option<String>,
    #[serde(default)]
    pub mtgjson_non_foil_version_id: Option<String>,
    #[serde(default)]
    #[serde(rename = "mtgjsonV4Id")]
    pub mtgjson_v4_id: Option<String>,
    #[serde(default)]
    pub mtgo_foil_id: Option<String>,
    #[serde(default)]
    pub mtgo_id: Option<String>,
    #[serde(default)]
    pub multiverse_id: Option<String>,
    #[serde(default)]
    pub scryfall_id: Option<String>,
    #[serde(default)]
    pub scryfall_card_back_id: Option<String>,
    #[serde(default)]
    pub scryfall_illustration_id: Option<String>,
    #[serde(default)]
    pub scryfall_oracle_id: Option<String>,
    #[serde(default)]
    pub tcgplayer_etched_product_id: Option<String>,
    #[serde(default)]
    pub tcgplayer_product_id: Option<String>,
}

// ---------------------------------------------------------------------------
// LeadershipSkills
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeadershipSkills {
    pub brawl: bool,
    pub commander: bool,
    pub oathbreaker: bool,
}

// ---------------------------------------------------------------------------
// Legalities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Legalities {
    #[serde(default)]
    pub alchemy: Option<String>,
    #[serde(default)]
    pub brawl: Option<String>,
    #[serde(default)]
    pub commander: Option<String>,
    #[serde(default)]
    pub duel: Option<String>,
    #[serde(default)]
    pub explorer: Option<String>,
    #[serde(default)]
    pub future: Option<String>,
    #[serde(default)]
    pub gladiator: Option<String>,
    #[serde(default)]
    pub historic: Option<String>,
    #[serde(default)]
    pub historicbrawl: Option<String>,
    #[serde(default)]
    pub legacy: Option<String>,
    #[serde(default)]
    pub modern: Option<String>,
    #[serde(default)]
    pub oathbreaker: Option<String>,
    #[serde(default)]
    pub oldschool: Option<String>,
    #[serde(default)]
    pub pauper: Option<String>,
    #[serde(default)]
    pub paupercommander: Option<String>,
    #[serde(default)]
    pub penny: Option<String>,
    #[serde(default)]
    pub pioneer: Option<String>,
    #[serde(default)]
    pub predh: Option<String>,
    #[serde(default)]
    pub premodern: Option<String>,
    #[serde(default)]
    pub standard: Option<String>,
    #[serde(default)]
    pub standardbrawl: Option<String>,
    #[serde(default)]
    pub timeless: Option<String>,
    #[serde(default)]
    pub vintage: Option<String>,
}

// ---------------------------------------------------------------------------
// PurchaseUrls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseUrls {
    #[serde(default)]
    pub card_kingdom: Option<String>,
    #[serde(default)]
    pub card_kingdom_etched: Option<String>,
    #[serde(default)]
    pub card_kingdom_foil: Option<String>,
    #[serde(default)]
    pub cardmarket: Option<String>,
    #[serde(default)]
    pub tcgplayer: Option<String>,
    #[serde(default)]
    pub tcgplayer_etched: Option<String>,
}

// ---------------------------------------------------------------------------
// RelatedCards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RelatedCards {
    #[serde(default)]
    pub reverse_related: Vec<String>,
    #[serde(default)]
    pub spellbook: Vec<String>,
    #[serde(default)]
    pub tokens: Vec<String>,
}

// ---------------------------------------------------------------------------
// Rulings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Rulings {
    pub date: String,
    pub text: String,
}

// ---------------------------------------------------------------------------
// SourceProducts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceProducts {
    #[serde(default)]
    pub etched: Vec<String>,
    #[serde(default)]
    pub foil: Vec<String>,
    #[serde(default)]
    pub nonfoil: Vec<String>,
}

// ---------------------------------------------------------------------------
// ForeignDataIdentifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ForeignDataIdentifiers {
    #[serde(default)]
    pub multiverse_id: Option<String>,
    #[serde(default)]
    pub scryfall_id: Option<String>,
}

// ---------------------------------------------------------------------------
// ForeignData
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ForeignData {
    pub language: String,
    #[serde(default)]
    pub face_name: Option<String>,
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub identifiers: Option<ForeignDataIdentifiers>,
    #[serde(default)]
    pub multiverse_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    #[serde(rename = "type")]
    pub type_field: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
}

// ---------------------------------------------------------------------------
// Translations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Translations {
    #[serde(default)]
    #[serde(rename = "Ancient Greek")]
    pub ancient_greek: Option<String>,
    #[serde(default)]
    #[serde(rename = "Arabic")]
    pub arabic: Option<String>,
    #[serde(default)]
    #[serde(rename = "Chinese Simplified")]
    pub chinese_simplified: Option<String>,
    #[serde(default)]
    #[serde(rename = "Chinese Traditional")]
    pub chinese_traditional: Option<String>,
    #[serde(default)]
    #[serde(rename = "French")]
    pub french: Option<String>,
    #[serde(default)]
    #[serde(rename = "German")]
    pub german: Option<String>,
    #[serde(default)]
    #[serde(rename = "Hebrew")]
    pub hebrew: Option<String>,
    #[serde(default)]
    #[serde(rename = "Italian")]
    pub italian: Option<String>,
    #[serde(default)]
    #[serde(rename = "Japanese")]
    pub japanese: Option<String>,
    #[serde(default)]
    #[serde(rename = "Korean")]
    pub korean: Option<String>,
    #[serde(default)]
    #[serde(rename = "Latin")]
    pub latin: Option<String>,
    #[serde(default)]
    #[serde(rename = "Phyrexian")]
    pub phyrexian: Option<String>,
    #[serde(default)]
    #[serde(rename = "Portuguese (Brazil)")]
    pub portuguese_brazil: Option<String>,
    #[serde(default)]
    #[serde(rename = "Russian")]
    pub russian: Option<String>,
    #[serde(default)]
    #[serde(rename = "Sanskrit")]
    pub sanskrit: Option<String>,
    #[serde(default)]
    #[serde(rename = "Spanish")]
    pub spanish: Option<String>,
}

// ---------------------------------------------------------------------------
// TcgplayerSkus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcgplayerSkus {
    pub condition: String,
    #[serde(default)]
    pub finish: Option<String>,
    pub language: String,
    pub printing: String,
    pub product_id: i64,
    pub sku_id: i64,
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Keywords {
    #[serde(default)]
    pub ability_words: Vec<String>,
    #[serde(default)]
    pub keyword_abilities: Vec<String>,
    #[serde(default)]
    pub keyword_actions: Vec<String>,
}

// ---------------------------------------------------------------------------
// CardType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CardType {
    #[serde(default)]
    pub sub_types: Vec<String>,
    #[serde(default)]
    pub super_types: Vec<String>,
}

// ---------------------------------------------------------------------------
// BoosterSheet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoosterSheet {
    #[serde(default)]
    pub allow_duplicates: Option<bool>,
    #[serde(default)]
    pub balance_colors: Option<bool>,
    #[serde(default)]
    pub cards: HashMap<String, i64>,
    pub foil: bool,
    #[serde(default)]
    pub fixed: Option<bool>,
    pub total_weight: i64,
}

// ---------------------------------------------------------------------------
// BoosterPack
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoosterPack {
    #[serde(default)]
    pub contents: HashMap<String, i64>,
    pub weight: i64,
}

// ---------------------------------------------------------------------------
// BoosterConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoosterConfig {
    #[serde(default)]
    pub boosters: Vec<BoosterPack>,
    pub boosters_total_weight: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sheets: HashMap<String, BoosterSheet>,
    #[serde(default)]
    pub source_set_codes: Vec<String>,
}

// ---------------------------------------------------------------------------
// PricePoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PricePoints {
    #[serde(default)]
    pub etched: HashMap<String, f64>,
    #[serde(default)]
    pub foil: HashMap<String, f64>,
    #[serde(default)]
    pub normal: HashMap<String, f64>,
}

// ---------------------------------------------------------------------------
// PriceList
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceList {
    #[serde(default)]
    pub buylist: Option<PricePoints>,
    pub currency: String,
    #[serde(default)]
    pub retail: Option<PricePoints>,
}

// ---------------------------------------------------------------------------
// PriceFormats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PriceFormats {
    #[serde(default)]
    pub mtgo: Option<HashMap<String, PriceList>>,
    #[serde(default)]
    pub paper: Option<HashMap<String, PriceList>>,
}

// ---------------------------------------------------------------------------
// SealedProductCard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedProductCard {
    #[serde(default)]
    pub finishes: Option<Vec<String>>,
    #[serde(default)]
    pub foil: Option<bool>,
    pub name: String,
    pub number: String,
    pub set: String,
    pub uuid: String,
}

// ---------------------------------------------------------------------------
// SealedProductDeck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedProductDeck {
    pub name: String,
    pub set: String,
}

// ---------------------------------------------------------------------------
// SealedProductOther
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedProductOther {
    pub name: String,
}

// ---------------------------------------------------------------------------
// SealedProductPack
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedProductPack {
    pub code: String,
    pub set: String,
}

// ---------------------------------------------------------------------------
// SealedProductSealed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedProductSealed {
    pub count: i64,
    pub name: String,
    pub set: String,
    #[serde(default)]
    pub uuid: Option<String>,
}

// ---------------------------------------------------------------------------
// SealedProductContents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SealedProductContents {
    #[serde(default)]
    pub card: Option<Vec<SealedProductCard>>,
    #[serde(default)]
    pub deck: Option<Vec<SealedProductDeck>>,
    #[serde(default)]
    pub other: Option<Vec<SealedProductOther>>,
    #[serde(default)]
    pub pack: Option<Vec<SealedProductPack>>,
    #[serde(default)]
    pub sealed: Option<Vec<SealedProductSealed>>,
    #[serde(default)]
    pub variable: Option<Vec<serde_json::Value>>,
}
