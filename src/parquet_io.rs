//! Shared parquet read/write helpers (component G). Every stage that
//! materializes a checkpoint or a source goes through these two functions so
//! the "zstd-compressed, atomic write, reopen as lazy scan" discipline is
//! applied uniformly instead of re-implemented per call site.

use crate::error::Result;
use polars::prelude::*;
use std::fs;
use std::path::Path;

/// Write `df` to `dest` as zstd-compressed parquet via a temp file + rename,
/// so a crash mid-write never leaves a corrupt partition behind.
pub fn write_parquet_atomic(df: &mut DataFrame, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = dest.with_extension("parquet.tmp");
    {
        let file = fs::File::create(&tmp)?;
        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Zstd(None))
            .finish(df)?;
    }
    fs::rename(&tmp, dest)?;
    Ok(())
}

/// Reopen a materialized parquet file as a lazy scan. This is the "checkpoint"
/// half of the materialize-then-relaze pattern: the plan that follows only
/// ever sees the pointer plus whichever columns downstream stages touch.
pub fn scan_parquet(path: &Path) -> Result<LazyFrame> {
    Ok(LazyFrame::scan_parquet(path, ScanArgsParquet::default())?)
}

/// Checkpoint a lazy plan in place: collect it once, write it to `dest`, and
/// hand back a fresh lazy scan over the result. Used at every checkpoint
/// boundary in the card pipeline (stages 3, 5, 8, 10) so the query optimizer
/// never sees a plan with more than a few joins in it at a time.
pub fn checkpoint(lf: LazyFrame, dest: &Path) -> Result<LazyFrame> {
    let mut df = lf.collect()?;
    write_parquet_atomic(&mut df, dest)?;
    scan_parquet(dest)
}

/// Same as [`checkpoint`], but runs `transform` on the materialized frame
/// before writing it back out. Every stage that needs a true per-row pass
/// (UUID minting, type-line parsing, anything that can't be expressed as a
/// columnar `Expr`) rides along on the checkpoint that already has to
/// collect the plan, rather than forcing an extra collect of its own.
pub fn checkpoint_with<F>(lf: LazyFrame, dest: &Path, transform: F) -> Result<LazyFrame>
where
    F: FnOnce(DataFrame) -> Result<DataFrame>,
{
    let df = lf.collect()?;
    let mut df = transform(df)?;
    write_parquet_atomic(&mut df, dest)?;
    scan_parquet(dest)
}

/// Materializes a frame's rows into `T` via a JSON round-trip: Polars writes
/// each row as a JSON object (struct-typed columns become nested objects
/// for free), and `serde_json` deserializes straight into the target type.
/// Used by assembly (component D) to turn the pipeline's columnar output
/// back into the nested card/set/deck models the writers serialize.
pub fn dataframe_to_vec<T: serde::de::DeserializeOwned>(df: &mut DataFrame) -> Result<Vec<T>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }
    let mut buf = Vec::new();
    JsonWriter::new(&mut buf).with_json_format(JsonFormat::Json).finish(df)?;
    Ok(serde_json::from_slice(&buf)?)
}
