//! Stage 13: sink. Dedupe to the default language per face, merge
//! foil/non-foil twins, compute `variations`, split card rows from token
//! rows, and partition-write one parquet file per set code.

use crate::config;
use crate::error::Result;
use crate::parquet_io;
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;

pub fn write_partitions(lf: LazyFrame, cache_root: &Path) -> Result<()> {
    let lf = dedupe_to_default_language(lf);
    let lf = merge_foil_nonfoil_twins(lf);
    let lf = parquet_io::checkpoint_with(
        lf,
        &cache_root.join("checkpoints/stage13.parquet"),
        compute_variations,
    )?;
    let df = lf.drop(["_trackingUuid"]).collect()?;

    let set_codes = unique_set_codes(&df)?;
    for set_code in set_codes {
        let for_set = df
            .clone()
            .lazy()
            .filter(col("setCode").eq(lit(set_code.clone())));

        let mut cards = for_set
            .clone()
            .filter(col("types").list().contains(lit("Token")).not())
            .collect()?;
        let mut tokens = for_set
            .filter(col("types").list().contains(lit("Token")))
            .collect()?;

        if cards.height() > 0 {
            parquet_io::write_parquet_atomic(&mut cards, &config::cards_partition_path(cache_root, &set_code))?;
        }
        if tokens.height() > 0 {
            parquet_io::write_parquet_atomic(&mut tokens, &config::tokens_partition_path(cache_root, &set_code))?;
        }
    }

    Ok(())
}

fn unique_set_codes(df: &DataFrame) -> Result<Vec<String>> {
    let codes = df.column("setCode")?.str()?;
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for code in codes.into_iter().flatten() {
        if seen.insert(code.to_string()) {
            out.push(code.to_string());
        }
    }
    out.sort();
    Ok(out)
}

/// English is the canonical face row; non-English-only orphans (kept by
/// stage 1 for cards with no English printing in scope) pass through
/// unchanged.
fn dedupe_to_default_language(lf: LazyFrame) -> LazyFrame {
    let english = lf.clone().filter(col("language").eq(lit("English")));
    // Stage 1 only keeps a non-English row when its oracle has no English
    // printing in scope, so these are already unique per oracle — nothing
    // left to dedupe.
    let orphans = lf.filter(col("language").neq(lit("English")));
    concat([english, orphans], UnionArgs::default()).unwrap()
}

/// Source data sometimes carries separate rows for the same physical face
/// differing only in which finish they were scraped under. Group back down
/// to one row per `(setCode, number, name, side)` and union the `finishes`
/// lists rather than keeping duplicate rows.
fn merge_foil_nonfoil_twins(lf: LazyFrame) -> LazyFrame {
    lf.group_by([col("setCode"), col("number"), col("name"), col("side")])
        .agg([
            col("finishes").explode().unique().sort(SortOptions::default()).alias("finishes"),
            col("*").exclude(["finishes"]).first(),
        ])
}

/// `variations`: other UUIDs sharing `(setCode, name)`, excluding the row's
/// own UUID. Mirrors [`super::relationships::strip_self_references`] since
/// the same self-inclusive grouping problem applies here.
fn compute_variations(mut df: DataFrame) -> Result<DataFrame> {
    let set_codes = df.column("setCode")?.str()?.clone();
    let names = df.column("name")?.str()?.clone();
    let uuids = df.column("uuid")?.str()?.clone();

    use std::collections::HashMap;
    let mut groups: HashMap<(String, String), Vec<String>> = HashMap::new();
    for i in 0..df.height() {
        let key = (
            set_codes.get(i).unwrap_or("").to_string(),
            names.get(i).unwrap_or("").to_string(),
        );
        groups.entry(key).or_default().push(uuids.get(i).unwrap_or("").to_string());
    }

    let mut variations_out = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let key = (
            set_codes.get(i).unwrap_or("").to_string(),
            names.get(i).unwrap_or("").to_string(),
        );
        let own = uuids.get(i).unwrap_or("");
        let mut siblings: Vec<String> = groups
            .get(&key)
            .map(|v| v.iter().filter(|u| u.as_str() != own).cloned().collect())
            .unwrap_or_default();
        siblings.sort();
        variations_out.push(Series::new("".into(), &siblings));
    }

    df.with_column(Series::new("variations".into(), variations_out))?;
    Ok(df)
}
