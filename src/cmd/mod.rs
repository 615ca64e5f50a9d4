mod init;
mod render;
mod seed;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use crate::generator::TargetCounts;
use crate::store::StoreTarget;

#[derive(Parser)]
#[command(name = "identity-seeder")]
#[command(version)]
#[command(
    about = "Bootstrap and seed the identity-verification schema with synthetic data",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the seven identity tables if they do not already exist
    Init {
        /// DuckDB database file (falls back to SEEDER_DATABASE, then in-memory)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Suppress the confirmation line
        #[arg(short, long)]
        quiet: bool,
    },

    /// Ensure the schema, then insert synthetic rows across all tables
    Seed {
        /// DuckDB database file (falls back to SEEDER_DATABASE, then in-memory)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Rows per table
        #[arg(short, long, default_value = "500")]
        count: usize,

        /// Override the user row count
        #[arg(long)]
        users: Option<usize>,

        /// Override the identity row count
        #[arg(long)]
        identities: Option<usize>,

        /// Override the participant entity row count
        #[arg(long)]
        entities: Option<usize>,

        /// Override the verification row count
        #[arg(long)]
        verifications: Option<usize>,

        /// Override the smart contract row count
        #[arg(long)]
        contracts: Option<usize>,

        /// Override the transaction row count
        #[arg(long)]
        transactions: Option<usize>,

        /// Override the IPFS storage row count
        #[arg(long)]
        storage: Option<usize>,

        /// Random seed for reproducibility
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Show progress during seeding
        #[arg(short, long)]
        progress: bool,

        /// Output the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a seed run as a SQL script instead of executing it
    Render {
        /// Output SQL file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target dialect: postgres or duckdb
        #[arg(long, default_value = "postgres")]
        dialect: String,

        /// Rows per table
        #[arg(short, long, default_value = "500")]
        count: usize,

        /// Override the user row count
        #[arg(long)]
        users: Option<usize>,

        /// Override the identity row count
        #[arg(long)]
        identities: Option<usize>,

        /// Override the participant entity row count
        #[arg(long)]
        entities: Option<usize>,

        /// Override the verification row count
        #[arg(long)]
        verifications: Option<usize>,

        /// Override the smart contract row count
        #[arg(long)]
        contracts: Option<usize>,

        /// Override the transaction row count
        #[arg(long)]
        transactions: Option<usize>,

        /// Override the IPFS storage row count
        #[arg(long)]
        storage: Option<usize>,

        /// Random seed for reproducibility
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Only emit CREATE TABLE statements
        #[arg(long, conflicts_with = "data_only")]
        schema_only: bool,

        /// Only emit INSERT statements
        #[arg(long, conflicts_with = "schema_only")]
        data_only: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { database, quiet } => init::run(database, quiet),
        Commands::Seed {
            database,
            count,
            users,
            identities,
            entities,
            verifications,
            contracts,
            transactions,
            storage,
            seed,
            progress,
            json,
        } => {
            let counts = resolve_counts(
                count,
                users,
                identities,
                entities,
                verifications,
                contracts,
                transactions,
                storage,
            );
            seed::run(database, counts, seed, progress, json)
        }
        Commands::Render {
            output,
            dialect,
            count,
            users,
            identities,
            entities,
            verifications,
            contracts,
            transactions,
            storage,
            seed,
            schema_only,
            data_only,
        } => {
            let counts = resolve_counts(
                count,
                users,
                identities,
                entities,
                verifications,
                contracts,
                transactions,
                storage,
            );
            render::run(output, dialect, counts, seed, schema_only, data_only)
        }
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "identity-seeder",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

/// Apply per-table overrides on top of the uniform count
#[allow(clippy::too_many_arguments)]
fn resolve_counts(
    count: usize,
    users: Option<usize>,
    identities: Option<usize>,
    entities: Option<usize>,
    verifications: Option<usize>,
    contracts: Option<usize>,
    transactions: Option<usize>,
    storage: Option<usize>,
) -> TargetCounts {
    let base = TargetCounts::uniform(count);
    TargetCounts {
        users: users.unwrap_or(base.users),
        identities: identities.unwrap_or(base.identities),
        entities: entities.unwrap_or(base.entities),
        verifications: verifications.unwrap_or(base.verifications),
        contracts: contracts.unwrap_or(base.contracts),
        transactions: transactions.unwrap_or(base.transactions),
        storage: storage.unwrap_or(base.storage),
    }
}

/// Resolve the store target: explicit flag, then environment, then memory
pub(crate) fn resolve_target(database: Option<PathBuf>) -> StoreTarget {
    match database.or_else(|| std::env::var("SEEDER_DATABASE").ok().map(PathBuf::from)) {
        Some(path) => StoreTarget::File(path),
        None => StoreTarget::InMemory,
    }
}
