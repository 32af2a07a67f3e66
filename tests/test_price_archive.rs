//! Integration tests for the date-partitioned local price archive:
//! write/merge, prune, and the retention-window scan.

mod common;

use cardatlas::price::archive;
use polars::prelude::*;

fn price_frame(uuids: &[&str], dates: &[&str], prices: &[f64]) -> LazyFrame {
    df![
        "uuid" => uuids,
        "date" => dates,
        "source" => vec!["paper"; uuids.len()],
        "provider" => vec!["tcgplayer"; uuids.len()],
        "priceType" => vec!["retail"; uuids.len()],
        "finish" => vec!["nonfoil"; uuids.len()],
        "price" => prices,
        "currency" => vec!["USD"; uuids.len()],
    ]
    .unwrap()
    .lazy()
}

#[test]
fn write_then_load_window_round_trips_rows() {
    let (_tmp, config) = common::temp_config();
    let today = price_frame(&["u1", "u2"], &["2026-07-27", "2026-07-27"], &[1.5, 2.5]);
    archive::write_daily_partition(today, &config.cache_root, "2026-07-27").unwrap();

    let loaded = archive::load_window(&config.cache_root).unwrap().collect().unwrap();
    assert_eq!(loaded.height(), 2);
}

#[test]
fn rerun_on_same_day_overwrites_by_composite_key() {
    let (_tmp, config) = common::temp_config();
    let first = price_frame(&["u1"], &["2026-07-27"], &[1.0]);
    archive::write_daily_partition(first, &config.cache_root, "2026-07-27").unwrap();

    let rerun = price_frame(&["u1"], &["2026-07-27"], &[9.0]);
    archive::write_daily_partition(rerun, &config.cache_root, "2026-07-27").unwrap();

    let loaded = archive::load_window(&config.cache_root).unwrap().collect().unwrap();
    assert_eq!(loaded.height(), 1);
    let price = loaded.column("price").unwrap().f64().unwrap().get(0).unwrap();
    assert_eq!(price, 9.0);
}

#[test]
fn prune_removes_partitions_outside_retention_window() {
    let (_tmp, config) = common::temp_config();
    let old = price_frame(&["u1"], &["2026-01-01"], &[1.0]);
    archive::write_daily_partition(old, &config.cache_root, "2026-01-01").unwrap();
    let recent = price_frame(&["u2"], &["2026-07-27"], &[2.0]);
    archive::write_daily_partition(recent, &config.cache_root, "2026-07-27").unwrap();

    let today = chrono::NaiveDate::from_ymd_opt(2026, 7, 27).unwrap();
    archive::prune_old_partitions(&config.cache_root, today).unwrap();

    let loaded = archive::load_window(&config.cache_root).unwrap().collect().unwrap();
    assert_eq!(loaded.height(), 1);
    let uuid = loaded.column("uuid").unwrap().str().unwrap().get(0).unwrap();
    assert_eq!(uuid, "u2");
}

#[test]
fn load_window_on_empty_cache_returns_empty_frame() {
    let (_tmp, config) = common::temp_config();
    let loaded = archive::load_window(&config.cache_root).unwrap().collect().unwrap();
    assert_eq!(loaded.height(), 0);
}

#[test]
fn migrate_legacy_archive_is_a_noop_without_a_legacy_file() {
    let (_tmp, config) = common::temp_config();
    archive::migrate_legacy_archive(&config.cache_root).unwrap();
    let loaded = archive::load_window(&config.cache_root).unwrap().collect().unwrap();
    assert_eq!(loaded.height(), 0);
}

#[test]
fn migrate_legacy_archive_splits_rows_into_date_partitions() {
    let (_tmp, config) = common::temp_config();
    std::fs::create_dir_all(&config.cache_root).unwrap();

    let mut legacy = price_frame(&["u1", "u2", "u3"], &["2026-07-26", "2026-07-26", "2026-07-27"], &[1.0, 2.0, 3.0])
        .collect()
        .unwrap();
    cardatlas::parquet_io::write_parquet_atomic(&mut legacy, &cardatlas::config::legacy_price_archive_path(&config.cache_root)).unwrap();

    archive::migrate_legacy_archive(&config.cache_root).unwrap();

    assert!(!cardatlas::config::legacy_price_archive_path(&config.cache_root).exists());
    assert!(cardatlas::config::price_partition_path(&config.cache_root, "2026-07-26").exists());
    assert!(cardatlas::config::price_partition_path(&config.cache_root, "2026-07-27").exists());

    let loaded = archive::load_window(&config.cache_root).unwrap().collect().unwrap();
    assert_eq!(loaded.height(), 3);
}

#[test]
fn migrate_legacy_archive_is_idempotent_on_second_call() {
    let (_tmp, config) = common::temp_config();
    std::fs::create_dir_all(&config.cache_root).unwrap();

    let mut legacy = price_frame(&["u1"], &["2026-07-26"], &[1.0]).collect().unwrap();
    cardatlas::parquet_io::write_parquet_atomic(&mut legacy, &cardatlas::config::legacy_price_archive_path(&config.cache_root)).unwrap();

    archive::migrate_legacy_archive(&config.cache_root).unwrap();
    archive::migrate_legacy_archive(&config.cache_root).unwrap();

    let loaded = archive::load_window(&config.cache_root).unwrap().collect().unwrap();
    assert_eq!(loaded.height(), 1, "second call must not duplicate the already-migrated row");
}
