//! Result-row conversion.
//!
//! Converts driver rows into JSON objects keyed by column name, in the
//! order the database produced the columns. Decoding is driven by the
//! column's declared type name with a generic ladder as fallback; cells
//! that cannot be decoded degrade to JSON null instead of failing the
//! whole request.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Value};
use sqlx::mysql::MySqlRow;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo};

/// Maps a successful decode to JSON, a SQL NULL to JSON null, and a
/// decode error to `None` so the caller can try the next candidate type.
fn decoded<T>(
    cell: Result<Option<T>, sqlx::Error>,
    convert: impl FnOnce(T) -> Value,
) -> Option<Value> {
    match cell {
        Ok(Some(v)) => Some(convert(v)),
        Ok(None) => Some(Value::Null),
        Err(_) => None,
    }
}

fn display<T: ToString>(v: T) -> Value {
    Value::String(v.to_string())
}

/// Converts a MySQL row into an ordered column -> value object.
pub fn mysql_row_to_object(row: &MySqlRow) -> Map<String, Value> {
    let mut object = Map::new();
    for col in row.columns() {
        let idx = col.ordinal();
        let value = mysql_cell(row, idx, col.type_info().name())
            .unwrap_or_else(|| mysql_fallback(row, idx));
        object.insert(col.name().to_string(), value);
    }
    object
}

fn mysql_cell(row: &MySqlRow, idx: usize, type_name: &str) -> Option<Value> {
    match type_name {
        "BOOLEAN" => decoded(row.try_get::<Option<bool>, _>(idx), Value::from),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            decoded(row.try_get::<Option<i64>, _>(idx), Value::from)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => decoded(row.try_get::<Option<u64>, _>(idx), Value::from),
        "FLOAT" => decoded(row.try_get::<Option<f32>, _>(idx), |v| Value::from(v as f64)),
        "DOUBLE" => decoded(row.try_get::<Option<f64>, _>(idx), Value::from),
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" => {
            decoded(row.try_get::<Option<String>, _>(idx), Value::String)
        }
        "DATE" => decoded(row.try_get::<Option<NaiveDate>, _>(idx), display),
        "TIME" => decoded(row.try_get::<Option<NaiveTime>, _>(idx), display),
        "DATETIME" => decoded(row.try_get::<Option<NaiveDateTime>, _>(idx), display),
        "TIMESTAMP" => decoded(row.try_get::<Option<DateTime<Utc>>, _>(idx), |v| {
            Value::String(v.to_rfc3339())
        }),
        _ => None,
    }
}

fn mysql_fallback(row: &MySqlRow, idx: usize) -> Value {
    decoded(row.try_get::<Option<i64>, _>(idx), Value::from)
        .or_else(|| decoded(row.try_get::<Option<u64>, _>(idx), Value::from))
        .or_else(|| decoded(row.try_get::<Option<f64>, _>(idx), Value::from))
        .or_else(|| decoded(row.try_get::<Option<bool>, _>(idx), Value::from))
        .or_else(|| decoded(row.try_get::<Option<String>, _>(idx), Value::String))
        .unwrap_or(Value::Null)
}

/// Converts a PostgreSQL row into an ordered column -> value object.
pub fn pg_row_to_object(row: &PgRow) -> Map<String, Value> {
    let mut object = Map::new();
    for col in row.columns() {
        let idx = col.ordinal();
        let value =
            pg_cell(row, idx, col.type_info().name()).unwrap_or_else(|| pg_fallback(row, idx));
        object.insert(col.name().to_string(), value);
    }
    object
}

fn pg_cell(row: &PgRow, idx: usize, type_name: &str) -> Option<Value> {
    match type_name {
        "BOOL" => decoded(row.try_get::<Option<bool>, _>(idx), Value::from),
        "INT2" => decoded(row.try_get::<Option<i16>, _>(idx), |v| Value::from(i64::from(v))),
        "INT4" => decoded(row.try_get::<Option<i32>, _>(idx), |v| Value::from(i64::from(v))),
        "INT8" => decoded(row.try_get::<Option<i64>, _>(idx), Value::from),
        "FLOAT4" => decoded(row.try_get::<Option<f32>, _>(idx), |v| Value::from(v as f64)),
        "FLOAT8" => decoded(row.try_get::<Option<f64>, _>(idx), Value::from),
        "VARCHAR" | "TEXT" | "BPCHAR" | "NAME" => {
            decoded(row.try_get::<Option<String>, _>(idx), Value::String)
        }
        "UUID" => decoded(row.try_get::<Option<uuid::Uuid>, _>(idx), display),
        "DATE" => decoded(row.try_get::<Option<NaiveDate>, _>(idx), display),
        "TIME" => decoded(row.try_get::<Option<NaiveTime>, _>(idx), display),
        "TIMESTAMP" => decoded(row.try_get::<Option<NaiveDateTime>, _>(idx), display),
        "TIMESTAMPTZ" => decoded(row.try_get::<Option<DateTime<Utc>>, _>(idx), |v| {
            Value::String(v.to_rfc3339())
        }),
        _ => None,
    }
}

fn pg_fallback(row: &PgRow, idx: usize) -> Value {
    decoded(row.try_get::<Option<i64>, _>(idx), Value::from)
        .or_else(|| decoded(row.try_get::<Option<f64>, _>(idx), Value::from))
        .or_else(|| decoded(row.try_get::<Option<bool>, _>(idx), Value::from))
        .or_else(|| decoded(row.try_get::<Option<String>, _>(idx), Value::String))
        .unwrap_or(Value::Null)
}

/// Converts a SQLite row into an ordered column -> value object.
///
/// SQLite typing is dynamic; the declared type is only a hint, so the
/// fallback ladder does most of the work.
pub fn sqlite_row_to_object(row: &SqliteRow) -> Map<String, Value> {
    let mut object = Map::new();
    for col in row.columns() {
        let idx = col.ordinal();
        let value = sqlite_cell(row, idx, col.type_info().name())
            .unwrap_or_else(|| sqlite_fallback(row, idx));
        object.insert(col.name().to_string(), value);
    }
    object
}

fn sqlite_cell(row: &SqliteRow, idx: usize, type_name: &str) -> Option<Value> {
    match type_name {
        "BOOLEAN" => decoded(row.try_get::<Option<bool>, _>(idx), Value::from),
        "INTEGER" => decoded(row.try_get::<Option<i64>, _>(idx), Value::from),
        "REAL" => decoded(row.try_get::<Option<f64>, _>(idx), Value::from),
        "TEXT" => decoded(row.try_get::<Option<String>, _>(idx), Value::String),
        "DATE" | "TIME" | "DATETIME" => {
            decoded(row.try_get::<Option<String>, _>(idx), Value::String)
        }
        _ => None,
    }
}

fn sqlite_fallback(row: &SqliteRow, idx: usize) -> Value {
    decoded(row.try_get::<Option<i64>, _>(idx), Value::from)
        .or_else(|| decoded(row.try_get::<Option<f64>, _>(idx), Value::from))
        .or_else(|| decoded(row.try_get::<Option<bool>, _>(idx), Value::from))
        .or_else(|| decoded(row.try_get::<Option<String>, _>(idx), Value::String))
        .unwrap_or(Value::Null)
}
