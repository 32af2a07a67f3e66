//! Integration tests for the referral/URL builder (component F): deriving
//! hash entries from a compiled card's `purchaseUrls`/`identifiers`, and
//! writing the flat redirect map from a set of written card partitions.

mod common;

use cardatlas::models::CardSet;
use cardatlas::parquet_io;
use cardatlas::referral::{self, ReferralProvider};
use polars::prelude::*;

fn card_with_purchase_urls(uuid: &str, purchase_urls: serde_json::Value, identifiers: serde_json::Value) -> CardSet {
    let json = serde_json::json!({
        "name": "Lightning Bolt",
        "type": "Instant",
        "layout": "normal",
        "uuid": uuid,
        "setCode": "LEA",
        "number": "1",
        "purchaseUrls": purchase_urls,
        "identifiers": identifiers,
    });
    serde_json::from_value(json).unwrap()
}

#[test]
fn no_purchase_urls_yields_no_entries() {
    let card = card_with_purchase_urls("uuid-a", serde_json::Value::Null, serde_json::Value::Null);
    assert!(referral::referral_entries_for_card(&card).is_empty());
}

#[test]
fn each_purchase_url_key_yields_one_entry_salted_by_provider_and_finish() {
    let card = card_with_purchase_urls(
        "uuid-b",
        serde_json::json!({
            "cardKingdom": "https://www.cardkingdom.com/mtg?...item%2F123",
            "cardKingdomFoil": "https://www.cardkingdom.com/mtg?...item%2F123&foil",
            "tcgplayer": "https://www.tcgplayer.com/product/456",
        }),
        serde_json::json!({
            "cardKingdomId": "123",
            "cardKingdomFoilId": "123",
            "tcgplayerProductId": "456",
        }),
    );

    let entries = referral::referral_entries_for_card(&card);
    assert_eq!(entries.len(), 3);
    for entry in &entries {
        assert_eq!(entry.hash.len(), 16);
        assert!(entry.hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    // Same provider, same underlying card, different finish: distinct hashes.
    let ck_normal = entries.iter().find(|e| e.destination.contains("item%2F123") && !e.destination.contains("foil")).unwrap();
    let ck_foil = entries.iter().find(|e| e.destination.contains("foil")).unwrap();
    assert_ne!(ck_normal.hash, ck_foil.hash);

    // Matches the direct hash computation for the non-foil Card Kingdom entry.
    let expected = referral::referral_hash(ReferralProvider::CardKingdom, "123", "uuid-b", None);
    assert_eq!(ck_normal.hash, expected);
}

/// Builds a three-row card partition frame with per-row optional
/// `purchaseUrls`/`identifiers` struct columns, following the same
/// conditional-null-struct idiom `relationships::purchase_urls` and the
/// `foreign_data_exceptions` test fixture use: a row with no marketplace ID
/// at all gets a genuinely null struct, not a struct of empty strings.
fn three_card_partition() -> DataFrame {
    let uuid = vec!["uuid-1", "uuid-2", "uuid-3"];
    let name = vec!["Lightning Bolt", "Black Lotus", "Ancestral Recall"];
    let card_kingdom_id: Vec<Option<&str>> = vec![None, Some("2"), None];
    let card_kingdom_url: Vec<Option<&str>> = vec![None, Some("https://www.cardkingdom.com/mtg?...item%2F2"), None];
    let tcgplayer_id: Vec<Option<&str>> = vec![Some("1"), None, None];
    let tcgplayer_url: Vec<Option<&str>> = vec![Some("https://www.tcgplayer.com/product/1"), None, None];

    let df = df![
        "uuid" => uuid,
        "name" => name,
        "type" => vec!["Instant", "Artifact", "Instant"],
        "layout" => vec!["normal"; 3],
        "setCode" => vec!["LEA"; 3],
        "number" => vec!["1", "2", "3"],
        "cardKingdomId" => card_kingdom_id,
        "cardKingdomUrl" => card_kingdom_url,
        "tcgplayerProductId" => tcgplayer_id,
        "tcgplayerUrl" => tcgplayer_url,
    ]
    .unwrap();

    let all_absent = col("cardKingdomId").is_null().and(col("tcgplayerProductId").is_null());

    df.lazy()
        .with_columns([
            when(all_absent.clone())
                .then(lit(NULL))
                .otherwise(as_struct(vec![
                    col("cardKingdomUrl").alias("cardKingdom"),
                    col("tcgplayerUrl").alias("tcgplayer"),
                ]))
                .alias("purchaseUrls"),
            when(all_absent)
                .then(lit(NULL))
                .otherwise(as_struct(vec![
                    col("cardKingdomId").alias("cardKingdomId"),
                    col("tcgplayerProductId").alias("tcgplayerProductId"),
                ]))
                .alias("identifiers"),
        ])
        .select([
            col("uuid"),
            col("name"),
            col("type"),
            col("layout"),
            col("setCode"),
            col("number"),
            col("purchaseUrls"),
            col("identifiers"),
        ])
        .collect()
        .unwrap()
}

#[test]
fn write_referral_map_emits_one_line_per_entry_sorted_by_hash() {
    let (_tmp, config) = common::temp_config();

    let mut df = three_card_partition();
    parquet_io::write_parquet_atomic(&mut df, &cardatlas::config::cards_partition_path(&config.cache_root, "LEA")).unwrap();

    referral::write_referral_map(&config.cache_root, &config.output_root).unwrap();

    let path = config.output_root.join("ReferralMap.txt");
    assert!(path.exists());
    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    // Ancestral Recall has no purchaseUrls at all: contributes no line.
    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert!(line.starts_with("/links/"));
        assert!(line.ends_with(';'));
    }

    let mut hashes: Vec<&str> = lines.iter().map(|l| l.trim_start_matches("/links/").split(" -> ").next().unwrap()).collect();
    let mut sorted = hashes.clone();
    sorted.sort();
    assert_eq!(hashes, sorted, "entries must be written in sorted hash order");
    hashes.sort();
    hashes.dedup();
    assert_eq!(hashes.len(), 2, "hashes must be unique per entry");
}
