//! Error taxonomy for schema bootstrap and seeding.

use crate::schema::EntityKind;

/// Errors surfaced by the store and the seeding pipeline.
///
/// Everything propagates to the top level; nothing is retried. A
/// `Persistence` failure rolls back the current entity batch, but entity
/// types committed earlier in the run stay committed.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The database could not be opened at all.
    #[error("cannot open database: {0}")]
    Connection(#[source] duckdb::Error),

    /// DDL application failed; seeding never started.
    #[error("schema setup failed: {0}")]
    Schema(#[source] duckdb::Error),

    /// A child generator was invoked with no eligible parent rows.
    #[error("cannot generate {entity} rows: no {parent} rows to reference")]
    Precondition {
        entity: EntityKind,
        parent: EntityKind,
    },

    /// A single row insert failed, aborting the entity batch.
    #[error("insert into {entity} failed at row {index}: {source}")]
    Persistence {
        entity: EntityKind,
        index: usize,
        #[source]
        source: duckdb::Error,
    },
}
