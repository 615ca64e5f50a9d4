use std::path::PathBuf;

use chrono::Utc;
use schemars::JsonSchema;
use serde::Serialize;

use crate::generator::{SeedConfig, SeedSummary, Seeder, TargetCounts};
use crate::schema::identity_schema;
use crate::store::{SeedStore, StoreTarget};

/// JSON output for a completed seed run
#[derive(Serialize, JsonSchema)]
pub(crate) struct SeedJsonOutput {
    database: String,
    seed: u64,
    rows: SeedSummary,
}

pub fn run(
    database: Option<PathBuf>,
    counts: TargetCounts,
    seed: u64,
    progress: bool,
    json: bool,
) -> anyhow::Result<()> {
    let target = super::resolve_target(database);
    let database_label = match &target {
        StoreTarget::InMemory => ":memory:".to_string(),
        StoreTarget::File(path) => path.display().to_string(),
    };
    if matches!(target, StoreTarget::InMemory) && !json {
        eprintln!("note: no database path given; seeding an in-memory store that is discarded at exit");
    }

    let mut store = SeedStore::open(&target)?;
    store.ensure_schema(&identity_schema())?;

    let config = SeedConfig {
        seed,
        counts,
        anchor: Utc::now().naive_utc(),
        progress,
    };
    let summary = Seeder::new(&config).run(&mut store)?;

    if json {
        let output = SeedJsonOutput {
            database: database_label,
            seed,
            rows: summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Seeded {} into {}", summary, database_label);
    }
    Ok(())
}
