//! Price Engine (component E): fetch, normalize, and archive a daily price
//! frame, then stream it out in the formats downstream consumers expect.

pub mod archive;
pub mod providers;
pub mod writers;

use crate::config::BuildConfig;
use crate::error::Result;
use crate::lookups::IdBridges;
use polars::prelude::*;
use providers::{BridgeKind, PriceProvider};

/// Fetch every provider's raw rows, resolve native IDs to MTGJSON UUIDs via
/// the matching bridge, and concatenate into the canonical flat schema.
/// A provider whose `fetch` errors contributes an empty frame
/// with a logged warning rather than aborting the whole build.
pub fn fetch_all(providers: &[Box<dyn PriceProvider>], bridges: &IdBridges, date: &str) -> Result<LazyFrame> {
    let mut frames = Vec::with_capacity(providers.len());

    for provider in providers {
        let raw = match provider.fetch() {
            Ok(df) => df,
            Err(err) => {
                tracing::warn!(provider = provider.name(), error = %err, "price provider fetch failed; continuing without it");
                continue;
            }
        };

        let bridge = match provider.bridge() {
            BridgeKind::TcgplayerProductId => &bridges.tcgplayer_product_id,
            BridgeKind::TcgplayerEtchedProductId => &bridges.tcgplayer_etched_product_id,
            BridgeKind::MtgoId => &bridges.mtgo_id,
            BridgeKind::ScryfallId => &bridges.scryfall_id,
        };
        let native_id_col = bridge_native_column(provider.bridge());

        let normalized = raw
            .lazy()
            .join(
                bridge.clone().rename([native_id_col], ["nativeId"], true),
                [col("nativeId")],
                [col("nativeId")],
                JoinArgs::new(JoinType::Inner),
            )
            .select([
                col("uuid"),
                lit(date).alias("date"),
                lit(provider.source()).alias("source"),
                lit(provider.name()).alias("provider"),
                col("priceType"),
                col("finish"),
                col("price"),
                lit(provider.currency()).alias("currency"),
            ]);
        frames.push(normalized);
    }

    if frames.is_empty() {
        return Ok(archive::empty_price_frame());
    }
    Ok(concat(frames, UnionArgs::default())?)
}

fn bridge_native_column(kind: BridgeKind) -> &'static str {
    match kind {
        BridgeKind::TcgplayerProductId => "tcgplayerProductId",
        BridgeKind::TcgplayerEtchedProductId => "tcgplayerEtchedProductId",
        BridgeKind::MtgoId => "mtgoId",
        BridgeKind::ScryfallId => "scryfallId",
    }
}

/// Runs the full daily build sequence: migrate any legacy single-file price
/// archive into the partitioned layout, sync down any partitions the shared
/// object store has that this cache root doesn't, fetch today's prices,
/// archive them, sync the new partition back up, prune, and return the
/// retention-window lazy scan ready for the output writers. The object
/// store itself is an external collaborator (its real network client is
/// out of scope), so `object_store` is `None` for a purely local build.
pub fn run_daily_build(
    config: &BuildConfig,
    providers: &[Box<dyn PriceProvider>],
    bridges: &IdBridges,
    today: chrono::NaiveDate,
    object_store: Option<&dyn archive::ObjectStoreClient>,
) -> Result<LazyFrame> {
    archive::migrate_legacy_archive(&config.cache_root)?;

    let date_str = today.format("%Y-%m-%d").to_string();

    if let Some(client) = object_store {
        archive::sync_down(&config.cache_root, client, today)?;
    }

    let todays_frame = fetch_all(providers, bridges, &date_str)?;
    archive::write_daily_partition(todays_frame, &config.cache_root, &date_str)?;

    if let Some(client) = object_store {
        archive::sync_up(&config.cache_root, client, std::slice::from_ref(&date_str))?;
    }

    archive::prune_old_partitions(&config.cache_root, today)?;
    archive::load_window(&config.cache_root)
}
