//! Stage 7: derived fields. Duel-deck side is already attached by the
//! set+number lookup join in stage 4; this stage adds the official-database
//! page ID join, the other derived field named in the stage table.

use crate::cache::SourceCache;
use polars::prelude::*;

pub fn official_db_page_ids(cache: &SourceCache, lf: LazyFrame) -> LazyFrame {
    let Ok(page_ids) = cache.official_db_page_ids() else {
        return lf;
    };
    lf.join(
        page_ids,
        [col("scryfallId")],
        [col("scryfallId")],
        JoinArgs::new(JoinType::Left),
    )
}
