use std::path::PathBuf;

use crate::schema::identity_schema;
use crate::store::{SeedStore, StoreTarget};

pub fn run(database: Option<PathBuf>, quiet: bool) -> anyhow::Result<()> {
    let target = super::resolve_target(database);
    if matches!(target, StoreTarget::InMemory) && !quiet {
        eprintln!("note: no database path given; initializing an in-memory store that is discarded at exit");
    }

    let store = SeedStore::open(&target)?;
    let schema = identity_schema();
    store.ensure_schema(&schema)?;

    if !quiet {
        println!("Schema ready: {} tables", schema.tables.len());
    }
    Ok(())
}
