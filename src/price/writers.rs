//! Price Engine output writers: `AllPrices.{json,sqlite,sql,
//! psql,csv}` over the 90-day window and `AllPricesToday.{...}` over just
//! today, off the same flat `(uuid, date, source, provider, price_type,
//! finish, price, currency)` schema.
//!
//! The JSON writer is the one that needs care: a full 90-day snapshot across
//! every tracked UUID is north of 500 MB of nested-dict JSON, too big to
//! hold as one in-memory `serde_json::Value` tree. It's
//! split by hex prefix of the UUID into 16 groups; each group is collected,
//! sorted, folded into the nested shape, and written to the stream before
//! the next group is even materialized, so no more than one group's rows
//! are ever resident at once.

use crate::error::Result;
use crate::models::sub::Meta;
use polars::prelude::*;
use std::io::Write;
use std::path::Path;

/// Sort key for the nested fold and for the relational writers, so two runs
/// over the same input produce byte-identical output.
const SORT_KEYS: [&str; 6] = ["uuid", "source", "provider", "priceType", "finish", "date"];

const HEX_PREFIXES: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
];

/// Streams the nested JSON shape for `lf` to `out`, one UUID-prefix group at
/// a time. `meta` is written first so every file opens `{"meta":...,"data":
/// {` so `meta` always precedes `data` in the file.
pub fn write_nested_json<W: Write>(lf: LazyFrame, meta: &Meta, mut out: W) -> Result<()> {
    write!(out, "{{\"meta\":{},\"data\":{{", serde_json::to_string(meta)?)?;

    let mut wrote_any = false;
    for prefix in HEX_PREFIXES {
        let group = lf
            .clone()
            .filter(col("uuid").str().starts_with(lit(prefix.to_string())))
            .sort(SORT_KEYS, SortMultipleOptions::default())
            .collect()?;

        if group.height() == 0 {
            continue;
        }

        for (uuid, value) in fold_group(&group)? {
            if wrote_any {
                write!(out, ",")?;
            }
            wrote_any = true;
            write!(out, "{}:{}", serde_json::to_string(&uuid)?, serde_json::to_string(&value)?)?;
        }
        // `group` and its row-groups are dropped here before the next
        // prefix is collected, the whole reason for the prefix split.
    }

    write!(out, "}}}}")?;
    Ok(())
}

/// Folds one already-sorted, already-collected hex-prefix group into
/// `uuid -> source -> provider -> price_type -> finish -> date -> price`,
/// with `currency` riding alongside `price_type` at the provider level
/// A `BTreeMap` key, not a `HashMap`, so the
/// per-uuid object serializes with the same key order on every run.
fn fold_group(df: &DataFrame) -> Result<std::collections::BTreeMap<String, serde_json::Value>> {
    use serde_json::{Map, Value};
    use std::collections::BTreeMap;

    let uuid = df.column("uuid")?.str()?;
    let source = df.column("source")?.str()?;
    let provider = df.column("provider")?.str()?;
    let price_type = df.column("priceType")?.str()?;
    let finish = df.column("finish")?.str()?;
    let date = df.column("date")?.str()?;
    let price = df.column("price")?.f64()?;
    let currency = df.column("currency")?.str()?;

    let mut out: BTreeMap<String, Value> = BTreeMap::new();

    for i in 0..df.height() {
        let (Some(uuid), Some(source), Some(provider), Some(price_type), Some(finish), Some(date), Some(price), Some(currency)) = (
            uuid.get(i),
            source.get(i),
            provider.get(i),
            price_type.get(i),
            finish.get(i),
            date.get(i),
            price.get(i),
            currency.get(i),
        ) else {
            continue;
        };

        let uuid_entry = out
            .entry(uuid.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let source_entry = uuid_entry.as_object_mut().unwrap()
            .entry(source.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let provider_entry = source_entry.as_object_mut().unwrap()
            .entry(provider.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let provider_obj = provider_entry.as_object_mut().unwrap();
        provider_obj
            .entry("currency".to_string())
            .or_insert_with(|| Value::String(currency.to_string()));
        let price_type_entry = provider_obj
            .entry(price_type.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let finish_entry = price_type_entry.as_object_mut().unwrap()
            .entry(finish.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        finish_entry
            .as_object_mut()
            .unwrap()
            .insert(date.to_string(), serde_json::json!(price));
    }

    Ok(out)
}

/// Writes the flat relational `prices` table as CSV, sorted so repeat
/// builds diff cleanly.
pub fn write_csv(lf: LazyFrame, dest: &Path) -> Result<()> {
    let mut df = lf.sort(SORT_KEYS, SortMultipleOptions::default()).collect()?;
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(dest)?;
    CsvWriter::new(file).finish(&mut df)?;
    Ok(())
}

/// Writes the flat `prices` table to a fresh SQLite database at `dest`,
/// with indexes on `uuid`, `date`, `provider`.
pub fn write_sqlite(lf: LazyFrame, dest: &Path) -> Result<()> {
    let df = lf.sort(SORT_KEYS, SortMultipleOptions::default()).collect()?;
    if dest.exists() {
        std::fs::remove_file(dest)?;
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut conn = rusqlite::Connection::open(dest)?;
    conn.execute_batch(
        "CREATE TABLE prices (
            uuid TEXT NOT NULL,
            date TEXT NOT NULL,
            source TEXT NOT NULL,
            provider TEXT NOT NULL,
            priceType TEXT NOT NULL,
            finish TEXT NOT NULL,
            price REAL NOT NULL,
            currency TEXT NOT NULL
        );
        CREATE INDEX idx_prices_uuid ON prices(uuid);
        CREATE INDEX idx_prices_date ON prices(date);
        CREATE INDEX idx_prices_provider ON prices(provider);",
    )?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO prices (uuid, date, source, provider, priceType, finish, price, currency)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for row in price_rows(&df)? {
            stmt.execute(rusqlite::params![
                row.uuid, row.date, row.source, row.provider, row.price_type, row.finish, row.price, row.currency
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Writes a portable SQL dump (`CREATE TABLE` + indexes + batched `INSERT`s
/// of 10,000 rows at a time) usable against SQLite,
/// Postgres, or MySQL with no provider-specific syntax.
pub fn write_sql_dump(lf: LazyFrame, dest: &Path) -> Result<()> {
    let df = lf.sort(SORT_KEYS, SortMultipleOptions::default()).collect()?;
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = std::fs::File::create(dest)?;

    writeln!(
        out,
        "CREATE TABLE prices (\n    uuid TEXT NOT NULL,\n    date TEXT NOT NULL,\n    source TEXT NOT NULL,\n    provider TEXT NOT NULL,\n    priceType TEXT NOT NULL,\n    finish TEXT NOT NULL,\n    price REAL NOT NULL,\n    currency TEXT NOT NULL\n);"
    )?;
    writeln!(out, "CREATE INDEX idx_prices_uuid ON prices(uuid);")?;
    writeln!(out, "CREATE INDEX idx_prices_date ON prices(date);")?;
    writeln!(out, "CREATE INDEX idx_prices_provider ON prices(provider);")?;

    for batch in price_rows(&df)?.chunks(10_000) {
        let values: Vec<String> = batch
            .iter()
            .map(|r| {
                format!(
                    "({}, {}, {}, {}, {}, {}, {}, {})",
                    sql_literal(&r.uuid),
                    sql_literal(&r.date),
                    sql_literal(&r.source),
                    sql_literal(&r.provider),
                    sql_literal(&r.price_type),
                    sql_literal(&r.finish),
                    r.price,
                    sql_literal(&r.currency),
                )
            })
            .collect();
        writeln!(
            out,
            "INSERT INTO prices (uuid, date, source, provider, priceType, finish, price, currency) VALUES\n{};",
            values.join(",\n")
        )?;
    }
    Ok(())
}

/// PostgreSQL COPY-format dump: same table/index preamble, then one
/// tab-separated `COPY ... FROM stdin` block.
pub fn write_psql(lf: LazyFrame, dest: &Path) -> Result<()> {
    let df = lf.sort(SORT_KEYS, SortMultipleOptions::default()).collect()?;
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = std::fs::File::create(dest)?;

    writeln!(
        out,
        "CREATE TABLE prices (\n    uuid TEXT NOT NULL,\n    date DATE NOT NULL,\n    source TEXT NOT NULL,\n    provider TEXT NOT NULL,\n    priceType TEXT NOT NULL,\n    finish TEXT NOT NULL,\n    price DOUBLE PRECISION NOT NULL,\n    currency TEXT NOT NULL\n);"
    )?;
    writeln!(out, "CREATE INDEX idx_prices_uuid ON prices(uuid);")?;
    writeln!(out, "CREATE INDEX idx_prices_date ON prices(date);")?;
    writeln!(out, "CREATE INDEX idx_prices_provider ON prices(provider);")?;
    writeln!(out, "COPY prices (uuid, date, source, provider, priceType, finish, price, currency) FROM stdin;")?;
    for row in price_rows(&df)? {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.uuid, row.date, row.source, row.provider, row.price_type, row.finish, row.price, row.currency
        )?;
    }
    writeln!(out, "\\.")?;
    Ok(())
}

fn sql_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

struct FlatPriceRow {
    uuid: String,
    date: String,
    source: String,
    provider: String,
    price_type: String,
    finish: String,
    price: f64,
    currency: String,
}

fn price_rows(df: &DataFrame) -> Result<Vec<FlatPriceRow>> {
    let uuid = df.column("uuid")?.str()?;
    let date = df.column("date")?.str()?;
    let source = df.column("source")?.str()?;
    let provider = df.column("provider")?.str()?;
    let price_type = df.column("priceType")?.str()?;
    let finish = df.column("finish")?.str()?;
    let price = df.column("price")?.f64()?;
    let currency = df.column("currency")?.str()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(FlatPriceRow {
            uuid: uuid.get(i).unwrap_or("").to_string(),
            date: date.get(i).unwrap_or("").to_string(),
            source: source.get(i).unwrap_or("").to_string(),
            provider: provider.get(i).unwrap_or("").to_string(),
            price_type: price_type.get(i).unwrap_or("").to_string(),
            finish: finish.get(i).unwrap_or("").to_string(),
            price: price.get(i).unwrap_or(0.0),
            currency: currency.get(i).unwrap_or("").to_string(),
        });
    }
    Ok(rows)
}

/// Writes every declared format for both `AllPrices` (the full retention
/// window) and `AllPricesToday` (today's rows only) under `output_root`.
pub fn write_all_outputs(window: LazyFrame, today: LazyFrame, meta: &Meta, output_root: &Path) -> Result<()> {
    std::fs::create_dir_all(output_root)?;

    for (stem, lf) in [("AllPrices", window), ("AllPricesToday", today)] {
        tracing::info!(stem, "streaming price snapshot");
        let json_path = output_root.join(format!("{stem}.json"));
        let file = std::fs::File::create(&json_path)?;
        write_nested_json(lf.clone(), meta, file)?;

        write_csv(lf.clone(), &output_root.join(format!("{stem}.csv")))?;
        write_sqlite(lf.clone(), &output_root.join(format!("{stem}.sqlite")))?;
        write_sql_dump(lf.clone(), &output_root.join(format!("{stem}.sql")))?;
        write_psql(lf, &output_root.join(format!("{stem}.psql")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> LazyFrame {
        df![
            "uuid" => ["u1", "u1", "u2"],
            "date" => ["2024-02-07", "2024-02-07", "2024-02-07"],
            "source" => ["paper", "paper", "paper"],
            "provider" => ["tcgplayer", "cardmarket", "tcgplayer"],
            "priceType" => ["retail", "retail", "retail"],
            "finish" => ["normal", "normal", "normal"],
            "price" => [1.50, 1.20, 3.00],
            "currency" => ["USD", "EUR", "USD"],
        ]
        .unwrap()
        .lazy()
    }

    #[test]
    fn nested_json_matches_end_to_end_scenario_path() {
        let meta = Meta { date: "2024-02-07".to_string(), version: "5.0.0".to_string() };
        let mut buf = Vec::new();
        write_nested_json(sample_frame(), &meta, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(
            value["data"]["u1"]["paper"]["tcgplayer"]["retail"]["normal"]["2024-02-07"],
            1.50
        );
        assert_eq!(value["data"]["u1"]["paper"]["cardmarket"]["currency"], "EUR");
    }

    #[test]
    fn nested_json_orders_meta_before_data() {
        let meta = Meta { date: "2024-02-07".to_string(), version: "5.0.0".to_string() };
        let mut buf = Vec::new();
        write_nested_json(sample_frame(), &meta, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.find("\"meta\"").unwrap() < text.find("\"data\"").unwrap());
    }

    #[test]
    fn sql_dump_escapes_single_quotes() {
        assert_eq!(sql_literal("O'Brien"), "'O''Brien'");
    }
}
