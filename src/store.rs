//! Embedded DuckDB store for seeded rows.
//!
//! The connection is acquired once at the start of a run and released when
//! the store is dropped, on success and failure paths alike. Each entity
//! batch is inserted inside its own transaction so a mid-batch failure
//! never leaves a partially committed table.

use std::path::PathBuf;

use duckdb::types::Value;
use duckdb::{params_from_iter, Connection};

use crate::error::SeedError;
use crate::generator::{RowBatch, SqlValue};
use crate::schema::{create_table_sql, Dialect, Schema};

/// Where the store lives
#[derive(Debug, Clone, Default)]
pub enum StoreTarget {
    #[default]
    InMemory,
    File(PathBuf),
}

/// A single open connection to the seeding target
pub struct SeedStore {
    conn: Connection,
}

impl SeedStore {
    pub fn open(target: &StoreTarget) -> Result<Self, SeedError> {
        let conn = match target {
            StoreTarget::InMemory => Connection::open_in_memory(),
            StoreTarget::File(path) => Connection::open(path),
        }
        .map_err(SeedError::Connection)?;
        Ok(Self { conn })
    }

    /// Apply the idempotent DDL for every table, dependencies first.
    ///
    /// Safe to call on a database that already has the tables.
    pub fn ensure_schema(&self, schema: &Schema) -> Result<(), SeedError> {
        for table in schema.tables_in_order() {
            self.conn
                .execute_batch(&create_table_sql(table, Dialect::DuckDb))
                .map_err(SeedError::Schema)?;
        }
        Ok(())
    }

    /// Insert a whole entity batch transactionally.
    ///
    /// Returns the number of rows inserted. On any row failure the
    /// transaction is rolled back and the failing iteration index is
    /// reported.
    pub fn insert_batch(&mut self, batch: &RowBatch) -> Result<usize, SeedError> {
        if batch.rows.is_empty() {
            return Ok(0);
        }
        self.conn
            .execute_batch("BEGIN TRANSACTION;")
            .map_err(|e| persistence(batch, 0, e))?;
        match self.insert_rows(batch) {
            Ok(inserted) => {
                self.conn
                    .execute_batch("COMMIT;")
                    .map_err(|e| persistence(batch, batch.rows.len(), e))?;
                Ok(inserted)
            }
            Err(err) => {
                // Best effort; the insert error is what matters
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }

    fn insert_rows(&self, batch: &RowBatch) -> Result<usize, SeedError> {
        let sql = insert_sql(batch);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| persistence(batch, 0, e))?;
        for (index, row) in batch.rows.iter().enumerate() {
            stmt.execute(params_from_iter(row.iter().map(bind_value)))
                .map_err(|e| persistence(batch, index, e))?;
        }
        Ok(batch.rows.len())
    }

    /// Run a scalar query, e.g. a COUNT or an FK anti-join check
    pub fn query_scalar(&self, sql: &str) -> Result<i64, duckdb::Error> {
        self.conn.query_row(sql, [], |row| row.get(0))
    }

    /// Run a query returning a single text value
    pub fn query_string(&self, sql: &str) -> Result<String, duckdb::Error> {
        self.conn.query_row(sql, [], |row| row.get(0))
    }

    pub fn count_rows(&self, table: &str) -> Result<i64, duckdb::Error> {
        self.query_scalar(&format!("SELECT COUNT(*) FROM \"{}\"", table))
    }
}

fn persistence(batch: &RowBatch, index: usize, source: duckdb::Error) -> SeedError {
    SeedError::Persistence {
        entity: batch.entity,
        index,
        source,
    }
}

fn insert_sql(batch: &RowBatch) -> String {
    let columns: Vec<String> = batch
        .columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect();
    let placeholders = vec!["?"; batch.columns.len()].join(", ");
    format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        batch.entity.table_name(),
        columns.join(", "),
        placeholders
    )
}

// DuckDB casts VARCHAR params to the column type, which covers the UUID and
// TIMESTAMP columns here.
fn bind_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Timestamp(t) => Value::Text(t.format("%Y-%m-%d %H:%M:%S").to_string()),
    }
}
