//! Tests for SQL script rendering of seed runs.

use chrono::{NaiveDate, NaiveDateTime};
use identity_seeder::generator::{SeedConfig, Seeder, TargetCounts};
use identity_seeder::render::{RenderConfig, Renderer};
use identity_seeder::schema::{identity_schema, Dialect};

fn anchor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn config(seed: u64, count: usize) -> SeedConfig {
    SeedConfig {
        seed,
        counts: TargetCounts::uniform(count),
        anchor: anchor(),
        progress: false,
    }
}

fn render(seed: u64, count: usize, render_config: RenderConfig) -> String {
    let run = Seeder::new(&config(seed, count)).collect().unwrap();
    Renderer::new(render_config)
        .render_to_string(&identity_schema(), &run)
        .unwrap()
}

#[test]
fn test_script_contains_schema_and_data() {
    let script = render(42, 10, RenderConfig::postgres());

    assert!(script.contains("CREATE TABLE IF NOT EXISTS \"users\""));
    assert!(script.contains("CREATE TABLE IF NOT EXISTS \"ipfs_storage\""));
    assert!(script.contains("INSERT INTO \"users\""));
    assert!(script.contains("INSERT INTO \"transaction\""));
    assert!(script.contains("ON DELETE CASCADE"));
}

#[test]
fn test_schema_only_and_data_only() {
    let schema_only = render(
        42,
        10,
        RenderConfig {
            include_data: false,
            ..RenderConfig::postgres()
        },
    );
    assert!(schema_only.contains("CREATE TABLE IF NOT EXISTS"));
    assert!(!schema_only.contains("INSERT INTO"));

    let data_only = render(
        42,
        10,
        RenderConfig {
            include_schema: false,
            ..RenderConfig::postgres()
        },
    );
    assert!(!data_only.contains("CREATE TABLE"));
    assert!(data_only.contains("INSERT INTO \"users\""));
}

#[test]
fn test_duckdb_dialect_omits_cascade() {
    let script = render(42, 5, RenderConfig::duckdb());
    assert!(script.contains("REFERENCES \"users\"(\"user_id\")"));
    assert!(!script.contains("ON DELETE CASCADE"));
}

#[test]
fn test_rendering_is_deterministic() {
    let a = render(42, 25, RenderConfig::postgres());
    let b = render(42, 25, RenderConfig::postgres());
    assert_eq!(a, b);

    let c = render(7, 25, RenderConfig::postgres());
    assert_ne!(a, c);
}

#[test]
fn test_pending_verifications_render_null_completion() {
    // Enough rows to make a pending verification statistically certain
    let script = render(42, 60, RenderConfig::postgres());
    let insert = script
        .split("INSERT INTO \"verification\"")
        .nth(1)
        .expect("verification insert present");
    assert!(insert.contains("NULL, 'pending'"));
}

#[test]
fn test_rendered_duckdb_script_executes() {
    let script = render(42, 8, RenderConfig::duckdb());

    let conn = duckdb::Connection::open_in_memory().unwrap();
    conn.execute_batch(&script).unwrap();

    let users: i64 = conn
        .query_row("SELECT COUNT(*) FROM \"users\"", [], |row| row.get(0))
        .unwrap();
    assert_eq!(users, 8);

    let orphans: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM \"transaction\" t \
             LEFT JOIN \"smart_contract\" s ON t.\"contract_address\" = s.\"contract_address\" \
             WHERE s.\"contract_address\" IS NULL",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphans, 0);
}

#[test]
fn test_chunked_inserts_respect_batch_size() {
    let script = render(
        42,
        25,
        RenderConfig {
            batch_size: 10,
            include_schema: false,
            ..RenderConfig::postgres()
        },
    );
    // 25 rows at 10 per statement -> 3 INSERTs for the users table
    let users_inserts = script.matches("INSERT INTO \"users\"").count();
    assert_eq!(users_inserts, 3);
}
