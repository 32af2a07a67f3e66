//! Stage 6 (row-wise half): UUID assignment. Prefers a cached UUID carried
//! through from the identifiers lookup; otherwise mints a deterministic v5
//! UUID over the canonical face key. Also stamps a secondary v4 UUID used
//! purely for this build's identifier-tracking report.

use crate::error::Result;
use crate::uuid_gen;
use polars::prelude::*;

pub fn assign_uuids(mut df: DataFrame) -> Result<DataFrame> {
    let scryfall_ids = df.column("scryfallId")?.str()?.clone();
    let sides = df.column("side")?.str()?.clone();
    let names = df.column("name")?.str()?.clone();
    let face_names = if df.get_column_names().iter().any(|n| n.as_str() == "faceName") {
        Some(df.column("faceName")?.str()?.clone())
    } else {
        None
    };
    let cached_uuids = if df.get_column_names().iter().any(|n| n.as_str() == "cachedUuid") {
        Some(df.column("cachedUuid")?.str()?.clone())
    } else {
        None
    };

    let mut uuids = Vec::with_capacity(df.height());
    let mut tracking_ids = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        if let Some(cached) = cached_uuids.as_ref().and_then(|c| c.get(i)) {
            uuids.push(cached.to_string());
        } else {
            let uuid = uuid_gen::face_uuid(
                scryfall_ids.get(i).unwrap_or(""),
                sides.get(i),
                names.get(i).unwrap_or(""),
                face_names.as_ref().and_then(|f| f.get(i)),
            );
            uuids.push(uuid.to_string());
        }
        tracking_ids.push(uuid_gen::tracking_uuid().to_string());
    }

    df.with_column(Series::new("uuid".into(), uuids))?;
    df.with_column(Series::new("_trackingUuid".into(), tracking_ids))?;
    Ok(df)
}
