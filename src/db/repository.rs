use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Number, Value};
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, MySqlPool, Row, TypeInfo, ValueRef};
use tracing::debug;

use crate::db::query::{SqlArg, Statement};
use crate::error::AppError;
use crate::models::Record;

/// Where statements get executed.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Run a read statement and reshape every row into a [`Record`].
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Record>, AppError>;

    /// Run a write statement, returning the number of affected rows.
    async fn execute(&self, statement: &Statement) -> Result<u64, AppError>;
}

pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn bind_all<'q>(statement: &'q Statement) -> Query<'q, MySql, MySqlArguments> {
    statement
        .args
        .iter()
        .fold(sqlx::query(&statement.sql), |query, arg| match arg {
            SqlArg::Int(v) => query.bind(*v),
            SqlArg::NullableInt(v) => query.bind(*v),
            SqlArg::Float(v) => query.bind(*v),
            SqlArg::Text(v) => query.bind(v.clone()),
        })
}

#[async_trait]
impl Catalog for MySqlCatalog {
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Record>, AppError> {
        let mut conn = self.pool.acquire().await?;
        debug!(sql = %statement.sql, args = ?statement.args, "fetch");

        let rows = bind_all(statement).fetch_all(&mut *conn).await?;
        let records = rows
            .iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, AppError> {
        let mut conn = self.pool.acquire().await?;
        debug!(sql = %statement.sql, args = ?statement.args, "execute");

        let result = bind_all(statement).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }
}

/// Keys come from the result metadata, in column order.
fn row_to_record(row: &MySqlRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

#[derive(Debug, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Signed,
    Unsigned,
    Float,
    Double,
    Decimal,
    Date,
    Time,
    DateTime,
    Timestamp,
    Json,
    Bytes,
    Text,
}

fn column_kind(type_name: &str) -> ColumnKind {
    match type_name {
        "BOOLEAN" => ColumnKind::Bool,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => ColumnKind::Signed,
        "YEAR" => ColumnKind::Unsigned,
        t if t.ends_with(" UNSIGNED") => ColumnKind::Unsigned,
        "FLOAT" => ColumnKind::Float,
        "DOUBLE" => ColumnKind::Double,
        "DECIMAL" => ColumnKind::Decimal,
        "DATE" => ColumnKind::Date,
        "TIME" => ColumnKind::Time,
        "DATETIME" => ColumnKind::DateTime,
        "TIMESTAMP" => ColumnKind::Timestamp,
        "JSON" => ColumnKind::Json,
        "BIT" | "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => ColumnKind::Bytes,
        _ => ColumnKind::Text,
    }
}

fn decode_column(row: &MySqlRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match column_kind(type_name) {
        ColumnKind::Bool => Value::Bool(row.try_get::<bool, _>(idx)?),
        ColumnKind::Signed => Value::from(row.try_get::<i64, _>(idx)?),
        ColumnKind::Unsigned => Value::from(row.try_get_unchecked::<u64, _>(idx)?),
        ColumnKind::Float => float_value(f64::from(row.try_get::<f32, _>(idx)?)),
        ColumnKind::Double => float_value(row.try_get::<f64, _>(idx)?),
        // DECIMAL travels as text on the wire.
        ColumnKind::Decimal => decimal_value(row.try_get_unchecked::<String, _>(idx)?),
        ColumnKind::Date => Value::String(row.try_get::<NaiveDate, _>(idx)?.to_string()),
        ColumnKind::Time => Value::String(row.try_get::<NaiveTime, _>(idx)?.to_string()),
        ColumnKind::DateTime => Value::String(
            row.try_get::<NaiveDateTime, _>(idx)?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        ColumnKind::Timestamp => Value::String(row.try_get::<DateTime<Utc>, _>(idx)?.to_rfc3339()),
        ColumnKind::Json => {
            let raw = row.try_get_unchecked::<String, _>(idx)?;
            serde_json::from_str(&raw).unwrap_or(Value::String(raw))
        }
        ColumnKind::Bytes => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx)?;
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        ColumnKind::Text => Value::String(row.try_get_unchecked::<String, _>(idx)?),
    };
    Ok(value)
}

fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn decimal_value(raw: String) -> Value {
    match raw.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(raw),
    }
}

/// In-memory catalog that serves canned rows and records every statement.
///
/// Rows are keyed by the procedure or view a statement reads from.
#[derive(Default)]
pub struct MemoryCatalog {
    sources: HashMap<String, Vec<Record>>,
    affected: u64,
    log: Mutex<Vec<Statement>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, source: &str, rows: Vec<Record>) -> Self {
        self.sources.insert(source.to_string(), rows);
        self
    }

    pub fn with_affected(mut self, affected: u64) -> Self {
        self.affected = affected;
        self
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn record(&self, statement: &Statement) {
        if let Ok(mut log) = self.log.lock() {
            log.push(statement.clone());
        }
    }
}

/// Name of the procedure or view a statement reads from.
fn source_of(sql: &str) -> &str {
    let rest = sql
        .strip_prefix("CALL ")
        .or_else(|| sql.strip_prefix("SELECT * FROM "))
        .unwrap_or(sql);
    rest.split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or(rest)
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Record>, AppError> {
        self.record(statement);
        Ok(self
            .sources
            .get(source_of(&statement.sql))
            .cloned()
            .unwrap_or_default())
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, AppError> {
        self.record(statement);
        Ok(self.affected)
    }
}
