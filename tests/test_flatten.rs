//! Integration tests for the relational/columnar card output: flattening a
//! written card partition into the `cards`/`foreign_data` tables across
//! every declared format.

mod common;

use cardatlas::assembly::flatten;
use cardatlas::cache::SourceCache;
use cardatlas::models::sub::Meta;
use cardatlas::parquet_io;
use polars::prelude::*;
use std::fs;

/// Writes a card partition frame with just the handful of `CardSet` fields
/// that lack `#[serde(default)]`; every other field is absent and
/// deserializes to its default.
fn write_card_partition(cache_root: &std::path::Path, set_code: &str, uuids: &[&str], names: &[&str], numbers: &[&str]) {
    let mut df = df![
        "uuid" => uuids,
        "name" => names,
        "type" => vec!["Creature"; uuids.len()],
        "layout" => vec!["normal"; uuids.len()],
        "setCode" => vec![set_code; uuids.len()],
        "number" => numbers,
    ]
    .unwrap();
    parquet_io::write_parquet_atomic(&mut df, &cardatlas::config::cards_partition_path(cache_root, set_code)).unwrap();
}

#[test]
fn write_relational_outputs_produces_every_declared_format() {
    let (_tmp, config) = common::temp_config();
    write_card_partition(&config.cache_root, "NEO", &["uuid-1", "uuid-2"], &["Card One", "Card Two"], &["1", "2"]);

    let cache = SourceCache::new(&config);
    let meta = Meta { date: "2026-07-27".to_string(), version: "5.2.1".to_string() };
    flatten::write_relational_outputs(&cache, &config.cache_root, &config.output_root, &meta).unwrap();

    for name in [
        "AllPrintings.sqlite",
        "AllPrintings.sql",
        "AllPrintings.psql",
        "cards.csv",
        "AllPrintings.parquet",
        "cards.parquet",
    ] {
        let path = config.output_root.join(name);
        assert!(path.exists(), "missing {path:?}");
        assert!(fs::metadata(&path).unwrap().len() > 0, "{path:?} is empty");
    }
}

#[test]
fn cards_csv_contains_every_card_name() {
    let (_tmp, config) = common::temp_config();
    write_card_partition(&config.cache_root, "NEO", &["uuid-1", "uuid-2"], &["Card One", "Card Two"], &["1", "2"]);

    let cache = SourceCache::new(&config);
    let meta = Meta { date: "2026-07-27".to_string(), version: "5.2.1".to_string() };
    flatten::write_relational_outputs(&cache, &config.cache_root, &config.output_root, &meta).unwrap();

    let csv = fs::read_to_string(config.output_root.join("cards.csv")).unwrap();
    assert!(csv.contains("Card One"));
    assert!(csv.contains("Card Two"));
}
