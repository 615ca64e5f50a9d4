//! SQL script rendering for seed runs.
//!
//! Writes the same deterministic run the store would execute as a plain SQL
//! script, so the seed data can be applied to an external PostgreSQL
//! database instead of the embedded store.

use std::io::Write;

use anyhow::Result;

use crate::generator::{Row, RowBatch, SeedRun};
use crate::schema::{create_table_sql, Dialect, Schema};

/// Rows per rendered INSERT statement
const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub dialect: Dialect,
    pub include_schema: bool,
    pub include_data: bool,
    /// Rows per multi-row INSERT statement
    pub batch_size: usize,
}

impl RenderConfig {
    pub fn postgres() -> Self {
        Self {
            dialect: Dialect::Postgres,
            include_schema: true,
            include_data: true,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn duckdb() -> Self {
        Self {
            dialect: Dialect::DuckDb,
            ..Self::postgres()
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::postgres()
    }
}

/// Renders a schema and generated run to SQL text
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn render<W: Write>(&self, writer: &mut W, schema: &Schema, run: &SeedRun) -> Result<()> {
        writeln!(writer, "-- identity-verification seed script")?;
        writeln!(
            writer,
            "-- dialect: {}",
            match self.config.dialect {
                Dialect::Postgres => "postgresql",
                Dialect::DuckDb => "duckdb",
            }
        )?;
        writeln!(writer)?;

        if self.config.include_schema {
            for table in schema.tables_in_order() {
                writeln!(writer, "{}", create_table_sql(table, self.config.dialect))?;
                writeln!(writer)?;
            }
        }

        if self.config.include_data {
            for batch in &run.batches {
                if batch.rows.is_empty() {
                    continue;
                }
                writeln!(
                    writer,
                    "-- {} ({} rows)",
                    batch.entity.table_name(),
                    batch.rows.len()
                )?;
                for chunk in batch.rows.chunks(self.config.batch_size.max(1)) {
                    writeln!(writer, "{}", insert_statement(batch, chunk))?;
                }
                writeln!(writer)?;
            }
        }

        Ok(())
    }

    pub fn render_to_string(&self, schema: &Schema, run: &SeedRun) -> Result<String> {
        let mut buf = Vec::new();
        self.render(&mut buf, schema, run)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Build one multi-row INSERT statement for a chunk of a batch
fn insert_statement(batch: &RowBatch, rows: &[Row]) -> String {
    let columns: Vec<String> = batch
        .columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect();
    let mut sql = format!(
        "INSERT INTO \"{}\" ({}) VALUES",
        batch.entity.table_name(),
        columns.join(", ")
    );
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        sql.push_str("\n(");
        for (j, value) in row.iter().enumerate() {
            if j > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&value.to_sql_literal());
        }
        sql.push(')');
    }
    sql.push(';');
    sql
}
