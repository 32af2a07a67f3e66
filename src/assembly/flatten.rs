//! Relational/columnar output: flattens the nested [`CardSet`] shape into
//! one wide `cards` table plus a `foreign_data` child table keyed by card
//! UUID (`identifiers.scryfallId` hoists to `scryfallId`,
//! `legalities.standard` becomes `legalities_standard`, `foreignData[]`
//! becomes a child table), then writes SQLite, a portable SQL dump,
//! PostgreSQL-COPY, CSV, and the two Parquet modes (nested, mirroring the
//! JSON struct shape, and normalized, mirroring the relational tables).

use super::discover_set_codes;
use crate::cache::SourceCache;
use crate::error::Result;
use crate::models::{CardSet, Meta};
use polars::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// One flattened row plus however many `foreignData` child rows it produced.
struct FlatCard {
    row: BTreeMap<String, Value>,
    foreign_rows: Vec<BTreeMap<String, Value>>,
}

const LIST_COLUMNS: &[&str] = &[
    "types", "subtypes", "supertypes", "colors", "colorIdentity", "colorIndicator",
    "producedMana", "keywords", "subsets", "artistIds", "frameEffects", "availability",
    "boosterTypes", "finishes", "promoTypes", "attractionLights", "otherFaceIds",
    "cardParts", "printings", "originalPrintings", "rebalancedPrintings", "variations",
];

/// Flattens one card. `identifiers` fields are hoisted to the top level
/// un-prefixed (`scryfallId`, `mtgoId`, ...); `legalities` fields get a
/// `legalities_` prefix; list-valued columns are joined with `,` so every
/// target (SQLite/CSV/SQL dump) gets a plain scalar cell; anything else
/// that's still an object or array at this point (rulings, purchaseUrls,
/// relatedCards, sourceProducts, leadershipSkills) is kept as a JSON text
/// column rather than flattened further.
fn flatten_card(card: &CardSet) -> Result<FlatCard> {
    let value = serde_json::to_value(card)?;
    let Value::Object(obj) = value else {
        return Ok(FlatCard { row: BTreeMap::new(), foreign_rows: Vec::new() });
    };

    let mut row = BTreeMap::new();
    let mut foreign_rows = Vec::new();

    for (key, val) in obj {
        match key.as_str() {
            "identifiers" => {
                if let Value::Object(map) = val {
                    for (k, v) in map {
                        row.insert(k, v);
                    }
                }
            }
            "legalities" => {
                if let Value::Object(map) = val {
                    for (k, v) in map {
                        row.insert(format!("legalities_{k}"), v);
                    }
                }
            }
            "foreignData" => {
                if let Value::Array(items) = val {
                    for item in items {
                        if let Value::Object(mut map) = item {
                            map.insert("cardUuid".to_string(), Value::String(card.uuid.clone()));
                            foreign_rows.push(map.into_iter().collect());
                        }
                    }
                }
            }
            _ if LIST_COLUMNS.contains(&key.as_str()) => {
                let joined = match val {
                    Value::Array(items) => items
                        .iter()
                        .map(value_to_text)
                        .collect::<Vec<_>>()
                        .join(","),
                    other => value_to_text(&other),
                };
                row.insert(key, Value::String(joined));
            }
            _ => {
                row.insert(key, val);
            }
        }
    }

    Ok(FlatCard { row, foreign_rows })
}

fn value_to_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn all_cards(cache_root: &Path) -> Result<Vec<CardSet>> {
    let mut cards = Vec::new();
    for set_code in discover_set_codes(cache_root)? {
        let path = crate::config::cards_partition_path(cache_root, &set_code);
        if !path.exists() {
            continue;
        }
        let mut df = crate::parquet_io::scan_parquet(&path)?.collect()?;
        cards.extend(crate::parquet_io::dataframe_to_vec::<CardSet>(&mut df)?);
    }
    Ok(cards)
}

fn json_to_sql_literal(v: &Value) -> String {
    match v {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "1".to_string() } else { "0".to_string() },
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        other => format!("'{}'", other.to_string().replace('\'', "''")),
    }
}

fn json_to_rusqlite(v: &Value) -> rusqlite::types::Value {
    match v {
        Value::Null => rusqlite::types::Value::Null,
        Value::Bool(b) => rusqlite::types::Value::Integer(if *b { 1 } else { 0 }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                rusqlite::types::Value::Integer(i)
            } else {
                rusqlite::types::Value::Real(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => rusqlite::types::Value::Text(s.clone()),
        other => rusqlite::types::Value::Text(other.to_string()),
    }
}

fn csv_cell(v: &Value) -> String {
    let text = value_to_text(v);
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text
    }
}

/// Writes the flattened `cards` and `foreign_data` tables (indexes on
/// `uuid`, `name`, `setCode`) in SQLite, SQL-dump, PostgreSQL-COPY, CSV,
/// and both Parquet forms, under `output_root`.
pub fn write_relational_outputs(_cache: &SourceCache, cache_root: &Path, output_root: &Path, _meta: &Meta) -> Result<()> {
    let cards = all_cards(cache_root)?;
    let mut flat = Vec::with_capacity(cards.len());
    for card in &cards {
        flat.push(flatten_card(card)?);
    }

    let columns = union_columns(flat.iter().map(|f| &f.row));
    let foreign_columns = union_columns(flat.iter().flat_map(|f| f.foreign_rows.iter()));

    write_sqlite(&flat, &columns, &foreign_columns, &output_root.join("AllPrintings.sqlite"))?;
    write_sql_dump(&flat, &columns, &foreign_columns, &output_root.join("AllPrintings.sql"))?;
    write_psql(&flat, &columns, &foreign_columns, &output_root.join("AllPrintings.psql"))?;
    write_csv(&flat, &columns, &output_root.join("cards.csv"))?;
    write_foreign_csv(&flat, &foreign_columns, &output_root.join("foreign_data.csv"))?;
    write_parquet_normalized(&flat, &columns, &foreign_columns, output_root)?;
    write_parquet_nested(cache_root, output_root)?;
    Ok(())
}

fn union_columns<'a>(rows: impl Iterator<Item = &'a BTreeMap<String, Value>>) -> Vec<String> {
    let mut set = std::collections::BTreeSet::new();
    for row in rows {
        for key in row.keys() {
            set.insert(key.clone());
        }
    }
    set.into_iter().collect()
}

fn write_sqlite(flat: &[FlatCard], columns: &[String], foreign_columns: &[String], dest: &Path) -> Result<()> {
    if dest.exists() {
        std::fs::remove_file(dest)?;
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut conn = rusqlite::Connection::open(dest)?;

    let cards_cols = columns.iter().map(|c| format!("\"{c}\" TEXT")).collect::<Vec<_>>().join(", ");
    conn.execute_batch(&format!(
        "CREATE TABLE cards ({cards_cols});
         CREATE INDEX idx_cards_uuid ON cards(\"uuid\");
         CREATE INDEX idx_cards_name ON cards(\"name\");
         CREATE INDEX idx_cards_setCode ON cards(\"setCode\");"
    ))?;

    if !foreign_columns.is_empty() {
        let foreign_cols = foreign_columns.iter().map(|c| format!("\"{c}\" TEXT")).collect::<Vec<_>>().join(", ");
        conn.execute_batch(&format!(
            "CREATE TABLE foreign_data ({foreign_cols});
             CREATE INDEX idx_foreign_cardUuid ON foreign_data(\"cardUuid\");"
        ))?;
    }

    let tx = conn.transaction()?;
    {
        let placeholders = columns.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let col_list = columns.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(", ");
        let mut stmt = tx.prepare(&format!("INSERT INTO cards ({col_list}) VALUES ({placeholders})"))?;
        for card in flat {
            let params: Vec<rusqlite::types::Value> =
                columns.iter().map(|c| card.row.get(c).map(json_to_rusqlite).unwrap_or(rusqlite::types::Value::Null)).collect();
            stmt.execute(rusqlite::params_from_iter(params))?;
        }

        if !foreign_columns.is_empty() {
            let placeholders = foreign_columns.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
            let col_list = foreign_columns.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(", ");
            let mut fstmt = tx.prepare(&format!("INSERT INTO foreign_data ({col_list}) VALUES ({placeholders})"))?;
            for card in flat {
                for frow in &card.foreign_rows {
                    let params: Vec<rusqlite::types::Value> = foreign_columns
                        .iter()
                        .map(|c| frow.get(c).map(json_to_rusqlite).unwrap_or(rusqlite::types::Value::Null))
                        .collect();
                    fstmt.execute(rusqlite::params_from_iter(params))?;
                }
            }
        }
    }
    tx.commit()?;
    Ok(())
}

fn write_sql_dump(flat: &[FlatCard], columns: &[String], foreign_columns: &[String], dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = std::fs::File::create(dest)?;

    let cards_cols = columns.iter().map(|c| format!("\"{c}\" TEXT")).collect::<Vec<_>>().join(",\n    ");
    writeln!(out, "CREATE TABLE cards (\n    {cards_cols}\n);")?;
    writeln!(out, "CREATE INDEX idx_cards_uuid ON cards(\"uuid\");")?;
    writeln!(out, "CREATE INDEX idx_cards_name ON cards(\"name\");")?;
    writeln!(out, "CREATE INDEX idx_cards_setCode ON cards(\"setCode\");")?;

    let col_list = columns.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(", ");
    for batch in flat.chunks(10_000) {
        let values: Vec<String> = batch
            .iter()
            .map(|card| {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|c| card.row.get(c).map(json_to_sql_literal).unwrap_or_else(|| "NULL".to_string()))
                    .collect();
                format!("({})", cells.join(", "))
            })
            .collect();
        writeln!(out, "INSERT INTO cards ({col_list}) VALUES\n{};", values.join(",\n"))?;
    }

    if !foreign_columns.is_empty() {
        let foreign_cols = foreign_columns.iter().map(|c| format!("\"{c}\" TEXT")).collect::<Vec<_>>().join(",\n    ");
        writeln!(out, "CREATE TABLE foreign_data (\n    {foreign_cols}\n);")?;
        writeln!(out, "CREATE INDEX idx_foreign_cardUuid ON foreign_data(\"cardUuid\");")?;

        let col_list = foreign_columns.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(", ");
        let all_foreign_rows: Vec<&BTreeMap<String, Value>> = flat.iter().flat_map(|c| c.foreign_rows.iter()).collect();
        for batch in all_foreign_rows.chunks(10_000) {
            let values: Vec<String> = batch
                .iter()
                .map(|frow| {
                    let cells: Vec<String> = foreign_columns
                        .iter()
                        .map(|c| frow.get(c).map(json_to_sql_literal).unwrap_or_else(|| "NULL".to_string()))
                        .collect();
                    format!("({})", cells.join(", "))
                })
                .collect();
            writeln!(out, "INSERT INTO foreign_data ({col_list}) VALUES\n{};", values.join(",\n"))?;
        }
    }
    Ok(())
}

/// PostgreSQL `COPY ... FROM stdin` dump, same table shape as
/// [`write_sql_dump`] but in the tab-delimited COPY text format
/// ([`crate::price::writers::write_psql`] does the same thing for prices).
fn write_psql(flat: &[FlatCard], columns: &[String], foreign_columns: &[String], dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = std::fs::File::create(dest)?;

    let cards_cols = columns.iter().map(|c| format!("\"{c}\" TEXT")).collect::<Vec<_>>().join(",\n    ");
    writeln!(out, "CREATE TABLE cards (\n    {cards_cols}\n);")?;
    writeln!(out, "CREATE INDEX idx_cards_uuid ON cards(\"uuid\");")?;
    writeln!(out, "CREATE INDEX idx_cards_name ON cards(\"name\");")?;
    writeln!(out, "CREATE INDEX idx_cards_setCode ON cards(\"setCode\");")?;
    let col_list = columns.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(", ");
    writeln!(out, "COPY cards ({col_list}) FROM stdin;")?;
    for card in flat {
        let cells: Vec<String> = columns.iter().map(|c| psql_copy_cell(card.row.get(c))).collect();
        writeln!(out, "{}", cells.join("\t"))?;
    }
    writeln!(out, "\\.")?;

    if !foreign_columns.is_empty() {
        let foreign_cols = foreign_columns.iter().map(|c| format!("\"{c}\" TEXT")).collect::<Vec<_>>().join(",\n    ");
        writeln!(out, "CREATE TABLE foreign_data (\n    {foreign_cols}\n);")?;
        writeln!(out, "CREATE INDEX idx_foreign_cardUuid ON foreign_data(\"cardUuid\");")?;
        let col_list = foreign_columns.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(", ");
        writeln!(out, "COPY foreign_data ({col_list}) FROM stdin;")?;
        for card in flat {
            for frow in &card.foreign_rows {
                let cells: Vec<String> = foreign_columns.iter().map(|c| psql_copy_cell(frow.get(c))).collect();
                writeln!(out, "{}", cells.join("\t"))?;
            }
        }
        writeln!(out, "\\.")?;
    }
    Ok(())
}

/// COPY text format escapes backslash, tab, and newline; an absent or
/// `null` value is the literal `\N`.
fn psql_copy_cell(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => "\\N".to_string(),
        Some(other) => value_to_text(other).replace('\\', "\\\\").replace('\t', "\\t").replace('\n', "\\n"),
    }
}

/// Normalized Parquet mode: `cards.parquet` and `foreign_data.parquet`,
/// the same two tables as the SQLite/SQL/CSV writers above but columnar.
/// Every cell is text, matching the TEXT-typed columns those writers use,
/// since the flattened rows are a heterogeneous mix of scalars and
/// comma-joined lists by this point.
fn write_parquet_normalized(flat: &[FlatCard], columns: &[String], foreign_columns: &[String], output_root: &Path) -> Result<()> {
    let mut df = rows_to_text_dataframe(flat.iter().map(|f| &f.row), columns)?;
    crate::parquet_io::write_parquet_atomic(&mut df, &output_root.join("cards.parquet"))?;

    if !foreign_columns.is_empty() {
        let mut fdf = rows_to_text_dataframe(flat.iter().flat_map(|f| f.foreign_rows.iter()), foreign_columns)?;
        crate::parquet_io::write_parquet_atomic(&mut fdf, &output_root.join("foreign_data.parquet"))?;
    }
    Ok(())
}

fn rows_to_text_dataframe<'a>(rows: impl Iterator<Item = &'a BTreeMap<String, Value>> + Clone, columns: &[String]) -> Result<DataFrame> {
    let mut series = Vec::with_capacity(columns.len());
    for column in columns {
        let values: Vec<Option<String>> = rows
            .clone()
            .map(|row| match row.get(column) {
                None | Some(Value::Null) => None,
                Some(other) => Some(value_to_text(other)),
            })
            .collect();
        series.push(Series::new(column.as_str().into(), values).into());
    }
    Ok(DataFrame::new(series)?)
}

/// Nested Parquet mode: one combined file with every set's cards
/// concatenated, struct-typed columns (`identifiers`, `legalities`,
/// `foreignData`, ...) left intact rather than flattened, mirroring the
/// shape `AllPrintings.json` streams.
fn write_parquet_nested(cache_root: &Path, output_root: &Path) -> Result<()> {
    let set_codes = discover_set_codes(cache_root)?;
    let mut frames = Vec::new();
    for set_code in &set_codes {
        let path = crate::config::cards_partition_path(cache_root, set_code);
        if path.exists() {
            frames.push(crate::parquet_io::scan_parquet(&path)?);
        }
    }
    if frames.is_empty() {
        return Ok(());
    }
    let mut df = concat(frames, UnionArgs::default())?.collect()?;
    crate::parquet_io::write_parquet_atomic(&mut df, &output_root.join("AllPrintings.parquet"))?;
    Ok(())
}

fn write_csv(flat: &[FlatCard], columns: &[String], dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = std::fs::File::create(dest)?;
    writeln!(out, "{}", columns.join(","))?;
    for card in flat {
        let cells: Vec<String> = columns.iter().map(|c| card.row.get(c).map(csv_cell).unwrap_or_default()).collect();
        writeln!(out, "{}", cells.join(","))?;
    }
    Ok(())
}

fn write_foreign_csv(flat: &[FlatCard], columns: &[String], dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = std::fs::File::create(dest)?;
    writeln!(out, "{}", columns.join(","))?;
    for card in flat {
        for frow in &card.foreign_rows {
            let cells: Vec<String> = columns.iter().map(|c| frow.get(c).map(csv_cell).unwrap_or_default()).collect();
            writeln!(out, "{}", cells.join(","))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> CardSet {
        let json = serde_json::json!({
            "name": "Lightning Bolt",
            "asciiName": null,
            "faceName": null,
            "type": "Instant",
            "types": ["Instant"],
            "subtypes": [],
            "supertypes": [],
            "colors": ["R"],
            "colorIdentity": ["R"],
            "colorIndicator": null,
            "producedMana": null,
            "manaCost": "{R}",
            "text": "Lightning Bolt deals 3 damage to any target.",
            "layout": "normal",
            "side": null,
            "power": null,
            "toughness": null,
            "loyalty": null,
            "keywords": null,
            "identifiers": {"scryfallId": "abc123", "mtgoId": "4321"},
            "isFunny": null,
            "edhrecSaltiness": null,
            "subsets": null,
            "convertedManaCost": 1.0,
            "manaValue": 1.0,
            "faceConvertedManaCost": null,
            "faceManaValue": null,
            "defense": null,
            "hand": null,
            "life": null,
            "edhrecRank": null,
            "foreignData": [{"language": "German", "name": "Blitzschlag"}],
            "legalities": {"standard": "Legal", "vintage": "Legal"},
            "leadershipSkills": null,
            "rulings": null,
            "hasAlternativeDeckLimit": null,
            "isReserved": null,
            "isGameChanger": null,
            "printings": ["LEA"],
            "purchaseUrls": null,
            "relatedCards": null,
            "uuid": "u1",
            "setCode": "LEA",
            "number": "161",
            "artist": null,
            "artistIds": null,
            "borderColor": null,
            "frameVersion": null,
            "frameEffects": null,
            "watermark": null,
            "signature": null,
            "securityStamp": null,
            "flavorText": null,
            "flavorName": null,
            "faceFlavorName": null,
            "originalText": null,
            "originalType": null,
            "printedName": null,
            "printedText": null,
            "printedType": null,
            "facePrintedName": null,
            "availability": ["paper"],
            "boosterTypes": null,
            "finishes": ["nonfoil"],
            "promoTypes": null,
            "attractionLights": null,
            "isFullArt": null,
            "isOnlineOnly": null,
            "isOversized": null,
            "isPromo": null,
            "isReprint": null,
            "isTextless": null,
            "otherFaceIds": null,
            "cardParts": null,
            "language": "English",
            "sourceProducts": null,
            "rarity": "common",
            "duelDeck": null,
            "isRebalanced": null,
            "originalPrintings": null,
            "rebalancedPrintings": null,
            "originalReleaseDate": null,
            "isAlternative": null,
            "isStorySpotlight": null,
            "isTimeshifted": null,
            "hasContentWarning": null,
            "variations": null,
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn flattens_identifiers_without_prefix_and_legalities_with_prefix() {
        let flat = flatten_card(&sample_card()).unwrap();
        assert_eq!(flat.row.get("scryfallId"), Some(&Value::String("abc123".to_string())));
        assert_eq!(flat.row.get("legalities_standard"), Some(&Value::String("Legal".to_string())));
        assert!(flat.row.get("identifiers").is_none());
        assert!(flat.row.get("legalities").is_none());
    }

    #[test]
    fn foreign_data_becomes_child_rows_tagged_with_card_uuid() {
        let flat = flatten_card(&sample_card()).unwrap();
        assert_eq!(flat.foreign_rows.len(), 1);
        assert_eq!(flat.foreign_rows[0].get("cardUuid"), Some(&Value::String("u1".to_string())));
    }

    #[test]
    fn list_columns_join_with_comma() {
        let flat = flatten_card(&sample_card()).unwrap();
        assert_eq!(flat.row.get("types"), Some(&Value::String("Instant".to_string())));
    }
}
