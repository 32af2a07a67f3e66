//! Stages 1-3: load + filter, per-face transforms, checkpoint 1.

use crate::cache::SourceCache;
use crate::error::Result;
use crate::mana;
use crate::typeline;
use polars::prelude::*;

/// Stage 1: filter card bulk to requested sets. Language policy: keep every
/// English printing, plus any non-English printing whose oracle has no
/// English printing in scope (so a foreign-only promo isn't dropped).
pub fn load_and_filter(
    cache: &SourceCache,
    set_codes: &[String],
    face_id_allowlist: Option<&[String]>,
) -> Result<LazyFrame> {
    let requested = Series::new("setCode".into(), set_codes);
    let mut lf = cache.card_bulk()?.filter(col("setCode").is_in(lit(requested)));

    if let Some(ids) = face_id_allowlist {
        let allow = Series::new("scryfallId".into(), ids);
        lf = lf.filter(col("scryfallId").is_in(lit(allow)));
    }

    let english = lf.clone().filter(col("language").eq(lit("English")));
    let oracles_with_english = english
        .clone()
        .select([col("oracleId")])
        .unique(None, UniqueKeepStrategy::First);
    let non_english_orphans = lf
        .filter(col("language").neq(lit("English")))
        .join(
            oracles_with_english,
            [col("oracleId")],
            [col("oracleId")],
            JoinArgs::new(JoinType::Anti),
        );

    Ok(concat([english, non_english_orphans], UnionArgs::default())?)
}

/// Stage 2 (columnar half): explode multi-faced cards, pull basic fields out
/// of the per-face struct where present, compute mana value and color
/// extraction as pure vectorized expressions.
pub fn per_face_columnar_transforms(lf: LazyFrame) -> LazyFrame {
    let single_faced = lf.clone().filter(col("faces").is_null());

    let multi_faced = lf
        .filter(col("faces").is_not_null())
        .explode(["faces"])
        .with_columns([
            col("faces").struct_().field_by_name("name").alias("name"),
            col("faces").struct_().field_by_name("manaCost").alias("manaCost"),
            col("faces").struct_().field_by_name("text").alias("text"),
            col("faces").struct_().field_by_name("power").alias("power"),
            col("faces").struct_().field_by_name("toughness").alias("toughness"),
            col("faces").struct_().field_by_name("loyalty").alias("loyalty"),
            col("faces").struct_().field_by_name("typeLine").alias("typeLine"),
            col("faces").struct_().field_by_name("side").alias("side"),
            col("faces")
                .struct_()
                .field_by_name("flavorText")
                .alias("flavorText"),
        ])
        .drop(["faces"]);

    concat([single_faced, multi_faced], UnionArgs::default())
        .unwrap()
        .with_columns([
            mana::mana_value_expr("manaCost"),
            mana::colors_expr("manaCost"),
            // Aftermath is a split layout where the second half is cast from
            // the graveyard; detectable from the layout tag alone.
            when(col("layout").eq(lit("aftermath")))
                .then(lit(true))
                .otherwise(lit(false))
                .alias("isAftermath"),
        ])
        .with_column(mana::color_identity_expr("manaCost", "text", "colorIndicator"))
}

/// Stage 2 (row-wise half, runs on the checkpoint-1 collect): type-line
/// parse, ASCII folding, finish ordering. Everything here needs per-row
/// string work that doesn't reduce to a single columnar `Expr`.
pub fn per_face_row_transforms(mut df: DataFrame) -> Result<DataFrame> {
    let type_lines = df.column("typeLine")?.str()?.clone();
    let names = df.column("name")?.str()?.clone();
    let finishes_col = df.column("finishes")?.list()?.clone();

    let mut supertypes_out = Vec::with_capacity(df.height());
    let mut types_out = Vec::with_capacity(df.height());
    let mut subtypes_out = Vec::with_capacity(df.height());
    let mut ascii_names_out = Vec::with_capacity(df.height());
    let mut type_field_out = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let line = type_lines.get(i).unwrap_or("").to_string();
        let (supertypes, types, subtypes) = typeline::parse_card_types(&line);
        supertypes_out.push(Series::new("".into(), &supertypes));
        types_out.push(Series::new("".into(), &types));
        subtypes_out.push(Series::new("".into(), &subtypes));
        type_field_out.push(line);

        let name = names.get(i).unwrap_or("");
        ascii_names_out.push(typeline::ascii_fold(name));
    }

    let mut sorted_finishes_out = Vec::with_capacity(df.height());
    for i in 0..finishes_col.len() {
        let series = finishes_col.get_as_series(i).unwrap_or_else(|| Series::new_empty("".into(), &DataType::String));
        let values: Vec<String> = series
            .str()
            .map(|ca| ca.into_iter().filter_map(|s| s.map(|s| s.to_string())).collect())
            .unwrap_or_default();
        let sorted = typeline::sort_finishes(values);
        sorted_finishes_out.push(Series::new("".into(), &sorted));
    }

    df.with_column(Series::new("supertypes".into(), supertypes_out))?;
    df.with_column(Series::new("types".into(), types_out))?;
    df.with_column(Series::new("subtypes".into(), subtypes_out))?;
    df.with_column(Series::new("type".into(), type_field_out))?;
    df.with_column(Series::new("asciiName".into(), ascii_names_out))?;
    df.with_column(Series::new("finishes".into(), sorted_finishes_out))?;

    Ok(df)
}
