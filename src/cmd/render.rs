use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use chrono::Utc;

use crate::generator::{SeedConfig, Seeder, TargetCounts};
use crate::render::{RenderConfig, Renderer};
use crate::schema::{identity_schema, Dialect};

pub fn run(
    output: Option<PathBuf>,
    dialect: String,
    counts: TargetCounts,
    seed: u64,
    schema_only: bool,
    data_only: bool,
) -> anyhow::Result<()> {
    let dialect: Dialect = dialect.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let config = SeedConfig {
        seed,
        counts,
        anchor: Utc::now().naive_utc(),
        progress: false,
    };
    let run = Seeder::new(&config).collect()?;
    let schema = identity_schema();

    let renderer = Renderer::new(RenderConfig {
        dialect,
        include_schema: !data_only,
        include_data: !schema_only,
        ..RenderConfig::postgres()
    });

    if let Some(ref path) = output {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        renderer.render(&mut writer, &schema, &run)?;
        writer.flush()?;
        eprintln!(
            "Generated {} rows to {}",
            run.batches.iter().map(|b| b.rows.len()).sum::<usize>(),
            path.display()
        );
    } else {
        let stdout = io::stdout();
        renderer.render(&mut stdout.lock(), &schema, &run)?;
    }

    Ok(())
}
