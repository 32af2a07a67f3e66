use serde::{Deserialize, Serialize};

use super::sub::SealedProductContents;

// ---------------------------------------------------------------------------
// SealedProduct — Full sealed product data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedProduct {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub set_code: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub card_count: Option<i64>,
    #[serde(default)]
    pub product_size: Option<i64>,
    #[serde(default)]
    pub contents: Option<SealedProductContents>,
    #[serde(default)]
    pub identifiers: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_urls: Option<serde_json::Value>,
}
