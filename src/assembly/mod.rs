//! Assembly & Output (component D): composes the flat, per-face rows the
//! card pipeline partitioned by set into the nested public object shape
//! (`MtgSet`, `CardAtomic`), then streams that shape out in every format
//! downstream consumers expect.
//!
//! Every writer here reads partitions lazily and assembles one set (or one
//! hex-prefix price group, over in [`crate::price::writers`]) at a time —
//! the combined `AllPrintings`-style JSON can exceed a gigabyte once every
//! set is included, so the full nested map is never held in memory at once.

pub mod flatten;

use crate::cache::SourceCache;
use crate::config;
use crate::error::{CardatlasError, Result};
use crate::models::{CardAtomic, CardSet, CardToken, Deck, MtgSet, SealedProduct, SetList};
use crate::models::sub::{BoosterConfig, Meta};
use crate::parquet_io;
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;

/// Bounded parallelism for per-set file writes.
const SET_FILE_WORKERS: usize = 30;

/// Lists every set code the pipeline has written a card partition for,
/// sorted lexicographically so every streaming writer below visits sets in
/// a stable, deterministic order.
pub fn discover_set_codes(cache_root: &Path) -> Result<Vec<String>> {
    let dir = cache_root.join("cards");
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut codes = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(code) = name.to_string_lossy().strip_prefix("setCode=") {
            codes.push(code.to_string());
        }
    }
    codes.sort();
    Ok(codes)
}

pub(crate) fn cards_for_set(cache_root: &Path, set_code: &str) -> Result<Vec<CardSet>> {
    let path = config::cards_partition_path(cache_root, set_code);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut df = parquet_io::scan_parquet(&path)?.collect()?;
    parquet_io::dataframe_to_vec(&mut df)
}

fn tokens_for_set(cache_root: &Path, set_code: &str) -> Result<Vec<CardToken>> {
    let path = config::tokens_partition_path(cache_root, set_code);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut df = parquet_io::scan_parquet(&path)?.collect()?;
    parquet_io::dataframe_to_vec(&mut df)
}

fn set_metadata_row(cache: &SourceCache, set_code: &str) -> Result<Option<SetList>> {
    let mut df = cache
        .set_metadata()?
        .filter(col("code").eq(lit(set_code)))
        .collect()?;
    if df.height() == 0 {
        return Ok(None);
    }
    let mut rows: Vec<SetList> = parquet_io::dataframe_to_vec(&mut df)?;
    Ok(rows.pop())
}

fn decks_for_set(cache: &SourceCache, set_code: &str) -> Result<Vec<Deck>> {
    let mut df = cache
        .deck_lists()?
        .filter(col("setCode").eq(lit(set_code)))
        .collect()?;
    parquet_io::dataframe_to_vec(&mut df)
}

fn sealed_products_for_set(cache: &SourceCache, set_code: &str) -> Result<Vec<SealedProduct>> {
    let mut df = cache
        .sealed_products()?
        .filter(col("setCode").eq(lit(set_code)))
        .collect()?;
    parquet_io::dataframe_to_vec(&mut df)
}

/// `booster_configs` carries one row per `(setCode, boosterName)`. A set
/// with no configured boosters (promo sets, most tokens-only sets) yields
/// `None`, matching the `Option<HashMap<...>>` shape on [`MtgSet::booster`].
fn booster_configs_for_set(cache: &SourceCache, set_code: &str) -> Result<Option<HashMap<String, BoosterConfig>>> {
    let mut df = cache
        .booster_configs()?
        .filter(col("setCode").eq(lit(set_code)))
        .collect()?;
    if df.height() == 0 {
        return Ok(None);
    }
    let names: Vec<String> = match df.column("boosterName") {
        Ok(series) => series
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or("default").to_string())
            .collect(),
        Err(_) => (0..df.height()).map(|i| format!("default{i}")).collect(),
    };
    let configs: Vec<BoosterConfig> = parquet_io::dataframe_to_vec(&mut df)?;
    Ok(Some(names.into_iter().zip(configs).collect()))
}

/// A face counts toward `totalSetSize` but not `baseSetSize` (spec's
/// "booster-fun" bonus printings: showcase/extended-art/borderless treatments
/// introduced after the cutoff date) when the identifiers lookup's own
/// marketplace data tagged it with the `"boosterfun"` promo type.
fn is_booster_fun_card(card: &CardSet) -> bool {
    card.promo_types
        .as_ref()
        .is_some_and(|types| types.iter().any(|t| t == "boosterfun"))
}

/// Counts the real `baseSetSize` for sets released on or after
/// [`config::BOOSTER_FUN_CUTOFF_DATE`]: the number of card faces (not
/// tokens) that aren't tagged booster-fun, enforcing spec invariant 6
/// (`baseSetSize` equals the count of non-booster-fun faces for sets after
/// the cutoff) against the cards this run actually wrote, rather than
/// trusting the source metadata's own `baseSetSize` column unchecked. Sets
/// released before the cutoff predate the booster-fun distinction entirely,
/// so the source's own value is kept as-is.
fn compute_base_set_size(meta_release_date: &str, meta_base_set_size: i64, cards: &[CardSet]) -> i64 {
    if meta_release_date < config::BOOSTER_FUN_CUTOFF_DATE {
        return meta_base_set_size;
    }
    cards.iter().filter(|c| !is_booster_fun_card(c)).count() as i64
}

/// Assembles the full nested object for one set: set metadata plus its
/// cards, tokens, decks, sealed products, and booster configs. Returns
/// `None` if the set has
/// no metadata row (the caller's set-code list came from card partitions,
/// which can't happen in practice, but a source/partition mismatch across
/// runs shouldn't panic).
pub fn assemble_set(cache: &SourceCache, cache_root: &Path, set_code: &str) -> Result<Option<MtgSet>> {
    let Some(meta) = set_metadata_row(cache, set_code)? else {
        return Ok(None);
    };

    let cards = cards_for_set(cache_root, set_code)?;
    let base_set_size = compute_base_set_size(&meta.release_date, meta.base_set_size, &cards);
    if base_set_size > meta.total_set_size {
        tracing::warn!(
            set_code,
            base_set_size,
            total_set_size = meta.total_set_size,
            "computed baseSetSize exceeds totalSetSize; source metadata disagrees with the written partition"
        );
    }

    Ok(Some(MtgSet {
        code: meta.code,
        name: meta.name,
        type_field: meta.type_field,
        release_date: meta.release_date,
        base_set_size,
        total_set_size: meta.total_set_size,
        keyrune_code: meta.keyrune_code,
        translations: meta.translations,
        block: meta.block,
        parent_code: meta.parent_code,
        mtgo_code: meta.mtgo_code,
        token_set_code: meta.token_set_code,
        mcm_id: meta.mcm_id,
        mcm_id_extras: meta.mcm_id_extras,
        mcm_name: meta.mcm_name,
        tcgplayer_group_id: meta.tcgplayer_group_id,
        cardsphere_set_id: meta.cardsphere_set_id,
        is_foil_only: meta.is_foil_only,
        is_non_foil_only: meta.is_non_foil_only,
        is_online_only: meta.is_online_only,
        is_paper_only: meta.is_paper_only,
        is_foreign_only: meta.is_foreign_only,
        is_partial_preview: meta.is_partial_preview,
        languages: meta.languages,
        cards,
        tokens: tokens_for_set(cache_root, set_code)?,
        booster: booster_configs_for_set(cache, set_code)?,
        decks: decks_for_set(cache, set_code)?,
        sealed_product: sealed_products_for_set(cache, set_code)?,
    }))
}

/// Streams the combined set map (`{meta, data: {setCode: MtgSet, ...}}`)
/// to `out`, one set assembled, serialized, and dropped before the next is
/// read — the whole point being that the full map of every set's cards
/// never sits resident in memory at once.
pub fn write_all_printings_json<W: Write>(
    cache: &SourceCache,
    cache_root: &Path,
    meta: &Meta,
    mut out: W,
) -> Result<()> {
    write!(out, "{{\"meta\":{},\"data\":{{", serde_json::to_string(meta)?)?;

    let mut wrote_any = false;
    for set_code in discover_set_codes(cache_root)? {
        let Some(set) = assemble_set(cache, cache_root, &set_code)? else {
            continue;
        };
        if wrote_any {
            write!(out, ",")?;
        }
        wrote_any = true;
        write!(out, "{}:{}", serde_json::to_string(&set_code)?, serde_json::to_string(&set)?)?;
        tracing::info!(set_code, "wrote set into combined output");
    }

    write!(out, "}}}}")?;
    Ok(())
}

/// Writes one `AllSetFiles/<CODE>.json` per set via a bounded worker
/// pool, each a standalone `{meta, data}` document.
pub fn write_per_set_files(cache: &SourceCache, cache_root: &Path, output_root: &Path, meta: &Meta) -> Result<()> {
    let dest_dir = output_root.join("AllSetFiles");
    std::fs::create_dir_all(&dest_dir)?;

    let codes = discover_set_codes(cache_root)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(SET_FILE_WORKERS)
        .build()
        .map_err(|e| CardatlasError::InvalidArgument(format!("set-file writer thread pool: {e}")))?;

    let results: Vec<Result<()>> = pool.install(|| {
        codes
            .par_iter()
            .map(|set_code| {
                let Some(set) = assemble_set(cache, cache_root, set_code)? else {
                    return Ok(());
                };
                let path = dest_dir.join(format!("{set_code}.json"));
                let file = std::fs::File::create(&path)?;
                serde_json::to_writer(file, &serde_json::json!({"meta": meta, "data": set}))?;
                Ok(())
            })
            .collect()
    });

    for result in results {
        result?;
    }
    Ok(())
}

/// Writes `SetList.json`: every set's metadata, no cards, sorted by code.
pub fn write_set_list_json(cache: &SourceCache, cache_root: &Path, output_root: &Path, meta: &Meta) -> Result<()> {
    let mut list = Vec::new();
    for set_code in discover_set_codes(cache_root)? {
        if let Some(row) = set_metadata_row(cache, &set_code)? {
            list.push(row);
        }
    }
    let path = output_root.join("SetList.json");
    let file = std::fs::File::create(&path)?;
    serde_json::to_writer(file, &serde_json::json!({"meta": meta, "data": list}))?;
    Ok(())
}

/// Builds the oracle-level projection of one printing. Every printing of
/// the same card shares these fields in practice; picking the earliest
/// printing (by set release date) as canonical just gives a deterministic
/// choice among otherwise-identical candidates.
fn atomic_from_printing(card: &CardSet) -> CardAtomic {
    CardAtomic {
        name: card.name.clone(),
        ascii_name: card.ascii_name.clone(),
        face_name: card.face_name.clone(),
        type_field: card.type_field.clone(),
        types: card.types.clone(),
        subtypes: card.subtypes.clone(),
        supertypes: card.supertypes.clone(),
        colors: card.colors.clone(),
        color_identity: card.color_identity.clone(),
        color_indicator: card.color_indicator.clone(),
        produced_mana: card.produced_mana.clone(),
        mana_cost: card.mana_cost.clone(),
        text: card.text.clone(),
        layout: card.layout.clone(),
        side: card.side.clone(),
        power: card.power.clone(),
        toughness: card.toughness.clone(),
        loyalty: card.loyalty.clone(),
        keywords: card.keywords.clone(),
        identifiers: card.identifiers.clone(),
        is_funny: card.is_funny,
        edhrec_saltiness: card.edhrec_saltiness,
        subsets: card.subsets.clone(),
        converted_mana_cost: card.converted_mana_cost,
        mana_value: card.mana_value,
        face_converted_mana_cost: card.face_converted_mana_cost,
        face_mana_value: card.face_mana_value,
        defense: card.defense.clone(),
        hand: card.hand.clone(),
        life: card.life.clone(),
        edhrec_rank: card.edhrec_rank,
        foreign_data: card.foreign_data.clone(),
        legalities: card.legalities.clone(),
        leadership_skills: card.leadership_skills.clone(),
        rulings: card.rulings.clone(),
        has_alternative_deck_limit: card.has_alternative_deck_limit,
        is_reserved: card.is_reserved,
        is_game_changer: card.is_game_changer,
        printings: None,
        purchase_urls: card.purchase_urls.clone(),
        related_cards: card.related_cards.clone(),
        first_printing: None,
    }
}

/// Writes `AtomicCards.json`: every distinct card name across every set,
/// oracle-level fields only, with `printings` listing every set it appears
/// in and `firstPrinting` naming the earliest one.
///
/// Grouping key is the per-face `name` column the pipeline already carries.
/// Split/adventure/MDFC cards whose public "atomic name" combines both
/// faces (e.g. "Fire // Ice") would need that combination computed upstream
/// of this step; this pass groups each face under its own name, matching
/// what the partitions actually contain.
pub fn write_atomic_cards_json(cache: &SourceCache, cache_root: &Path, output_root: &Path, meta: &Meta) -> Result<()> {
    let release_dates = set_release_dates(cache)?;

    let mut by_name: BTreeMap<String, Vec<(String, CardSet)>> = BTreeMap::new();
    for set_code in discover_set_codes(cache_root)? {
        for card in cards_for_set(cache_root, &set_code)? {
            by_name.entry(card.name.clone()).or_default().push((set_code.clone(), card));
        }
    }

    let mut data: BTreeMap<String, CardAtomic> = BTreeMap::new();
    for (name, mut printings) in by_name {
        printings.sort_by(|a, b| {
            let da = release_dates.get(&a.0).map(String::as_str).unwrap_or("");
            let db = release_dates.get(&b.0).map(String::as_str).unwrap_or("");
            da.cmp(db).then_with(|| a.0.cmp(&b.0))
        });

        let mut set_codes: Vec<String> = printings.iter().map(|(code, _)| code.clone()).collect();
        set_codes.sort();
        set_codes.dedup();

        let Some((first_set, canonical)) = printings.first() else { continue };
        let mut atomic = atomic_from_printing(canonical);
        atomic.printings = Some(set_codes);
        atomic.first_printing = Some(first_set.clone());
        data.insert(name, atomic);
    }

    let path = output_root.join("AtomicCards.json");
    let file = std::fs::File::create(&path)?;
    serde_json::to_writer(file, &serde_json::json!({"meta": meta, "data": data}))?;
    Ok(())
}

fn set_release_dates(cache: &SourceCache) -> Result<HashMap<String, String>> {
    let df = cache
        .set_metadata()?
        .select([col("code"), col("releaseDate")])
        .collect()?;
    let codes = df.column("code")?.str()?.clone();
    let dates = df.column("releaseDate")?.str()?.clone();

    let mut map = HashMap::new();
    for i in 0..df.height() {
        if let (Some(code), Some(date)) = (codes.get(i), dates.get(i)) {
            map.insert(code.to_string(), date.to_string());
        }
    }
    Ok(map)
}

/// Runs every nested/per-set output against an already-built card
/// partition tree: the combined streaming JSON, per-set files, the set
/// list, and atomic cards. Relational/columnar writers live in
/// [`flatten`] and are invoked separately since they operate over the full
/// card collection rather than per-set.
pub fn write_all_outputs(cache: &SourceCache, cache_root: &Path, output_root: &Path, meta: &Meta) -> Result<()> {
    std::fs::create_dir_all(output_root)?;

    tracing::info!("streaming combined AllPrintings.json");
    let combined_path = output_root.join("AllPrintings.json");
    let file = std::fs::File::create(&combined_path)?;
    write_all_printings_json(cache, cache_root, meta, file)?;

    tracing::info!("writing per-set files");
    write_per_set_files(cache, cache_root, output_root, meta)?;

    tracing::info!("writing SetList.json");
    write_set_list_json(cache, cache_root, output_root, meta)?;

    tracing::info!("writing AtomicCards.json");
    write_atomic_cards_json(cache, cache_root, output_root, meta)?;

    flatten::write_relational_outputs(cache, cache_root, output_root, meta)?;
    Ok(())
}
