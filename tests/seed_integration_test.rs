//! End-to-end seeding tests against the embedded DuckDB store.

use chrono::{NaiveDate, NaiveDateTime};
use identity_seeder::error::SeedError;
use identity_seeder::generator::{RowBatch, SeedConfig, SeedSummary, Seeder, SqlValue, TargetCounts};
use identity_seeder::schema::{identity_schema, EntityKind};
use identity_seeder::store::{SeedStore, StoreTarget};
use tempfile::TempDir;

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

fn seeded_store(seed: u64, count: usize) -> (SeedStore, SeedSummary) {
    let mut store = SeedStore::open(&StoreTarget::InMemory).unwrap();
    store.ensure_schema(&identity_schema()).unwrap();
    let summary = Seeder::new(&config(seed, count)).run(&mut store).unwrap();
    (store, summary)
}

/// Anti-join: child rows whose FK resolves to no parent row
fn orphan_count(store: &SeedStore, child: &str, fk: &str, parent: &str, pk: &str) -> i64 {
    let sql = format!(
        "SELECT COUNT(*) FROM \"{child}\" c LEFT JOIN \"{parent}\" p \
         ON c.\"{fk}\" = p.\"{pk}\" WHERE p.\"{pk}\" IS NULL"
    );
    store.query_scalar(&sql).unwrap()
}

#[test]
fn test_full_run_at_500_rows_per_table() {
    let (store, summary) = seeded_store(12345, 500);

    assert_eq!(summary.users, 500);
    assert_eq!(summary.identities, 500);
    assert_eq!(summary.entities, 500);
    assert_eq!(summary.verifications, 500);
    assert_eq!(summary.contracts, 500);
    assert_eq!(summary.transactions, 500);
    assert_eq!(summary.storage, 500);

    for kind in EntityKind::ALL {
        assert_eq!(store.count_rows(kind.table_name()).unwrap(), 500);
    }

    // Zero cross-entity FK violations
    assert_eq!(orphan_count(&store, "identity", "user_id", "users", "user_id"), 0);
    assert_eq!(
        orphan_count(&store, "verification", "identity_id", "identity", "identity_id"),
        0
    );
    assert_eq!(
        orphan_count(&store, "verification", "verifier_entity_id", "entity", "entity_id"),
        0
    );
    assert_eq!(
        orphan_count(&store, "smart_contract", "entity_id", "entity", "entity_id"),
        0
    );
    assert_eq!(
        orphan_count(
            &store,
            "transaction",
            "contract_address",
            "smart_contract",
            "contract_address"
        ),
        0
    );
    assert_eq!(orphan_count(&store, "transaction", "user_id", "users", "user_id"), 0);
    assert_eq!(
        orphan_count(
            &store,
            "transaction",
            "verification_id",
            "verification",
            "verification_id"
        ),
        0
    );
    assert_eq!(orphan_count(&store, "ipfs_storage", "user_id", "users", "user_id"), 0);
}

#[test]
fn test_persisted_invariants_hold() {
    let (store, _) = seeded_store(7, 200);

    let stale = store
        .query_scalar("SELECT COUNT(*) FROM \"identity\" WHERE \"last_updated\" < \"creation_date\"")
        .unwrap();
    assert_eq!(stale, 0);

    let pending_with_completion = store
        .query_scalar(
            "SELECT COUNT(*) FROM \"verification\" \
             WHERE \"status\" = 'pending' AND \"completion_date\" IS NOT NULL",
        )
        .unwrap();
    assert_eq!(pending_with_completion, 0);

    let decided_without_completion = store
        .query_scalar(
            "SELECT COUNT(*) FROM \"verification\" \
             WHERE \"status\" IN ('approved', 'rejected') AND \"completion_date\" IS NULL",
        )
        .unwrap();
    assert_eq!(decided_without_completion, 0);

    let completed_early = store
        .query_scalar(
            "SELECT COUNT(*) FROM \"verification\" WHERE \"completion_date\" < \"request_date\"",
        )
        .unwrap();
    assert_eq!(completed_early, 0);
}

#[test]
fn test_schema_init_is_idempotent_before_seeding() {
    let mut store = SeedStore::open(&StoreTarget::InMemory).unwrap();
    let schema = identity_schema();
    store.ensure_schema(&schema).unwrap();
    store.ensure_schema(&schema).unwrap();

    let summary = Seeder::new(&config(1, 10)).run(&mut store).unwrap();
    assert_eq!(summary.total(), 70);
}

#[test]
fn test_seed_into_file_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("seeded.duckdb");
    let target = StoreTarget::File(db_path.clone());

    {
        let mut store = SeedStore::open(&target).unwrap();
        store.ensure_schema(&identity_schema()).unwrap();
        Seeder::new(&config(99, 25)).run(&mut store).unwrap();
    }

    let reopened = SeedStore::open(&target).unwrap();
    assert_eq!(reopened.count_rows("users").unwrap(), 25);
    assert_eq!(reopened.count_rows("transaction").unwrap(), 25);
}

#[test]
fn test_check_constraint_rejects_bad_status() {
    let mut store = SeedStore::open(&StoreTarget::InMemory).unwrap();
    store.ensure_schema(&identity_schema()).unwrap();

    let batch = RowBatch {
        entity: EntityKind::User,
        columns: &["user_id", "public_key", "registration_date", "status"],
        rows: vec![vec![
            SqlValue::Text("f00dbabe-0000-4000-8000-000000000001".to_string()),
            SqlValue::Text("aabbccddeeff00112233".to_string()),
            SqlValue::Timestamp(anchor()),
            SqlValue::Text("bogus".to_string()),
        ]],
        ids: vec![],
    };

    match store.insert_batch(&batch) {
        Err(SeedError::Persistence { entity, index, .. }) => {
            assert_eq!(entity, EntityKind::User);
            assert_eq!(index, 0);
        }
        other => panic!("expected persistence error, got {:?}", other),
    }
    assert_eq!(store.count_rows("users").unwrap(), 0);
}

#[test]
fn test_failed_batch_rolls_back_entirely() {
    let mut store = SeedStore::open(&StoreTarget::InMemory).unwrap();
    store.ensure_schema(&identity_schema()).unwrap();

    let good = |id: &str, key: &str| {
        vec![
            SqlValue::Text(id.to_string()),
            SqlValue::Text(key.to_string()),
            SqlValue::Timestamp(anchor()),
            SqlValue::Text("active".to_string()),
        ]
    };
    let batch = RowBatch {
        entity: EntityKind::User,
        columns: &["user_id", "public_key", "registration_date", "status"],
        rows: vec![
            good("f00dbabe-0000-4000-8000-000000000001", "aa00000000000000000001"),
            // duplicate primary key
            good("f00dbabe-0000-4000-8000-000000000001", "aa00000000000000000002"),
        ],
        ids: vec![],
    };

    match store.insert_batch(&batch) {
        Err(SeedError::Persistence { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected persistence error, got {:?}", other),
    }
    // first row must not survive the failed batch
    assert_eq!(store.count_rows("users").unwrap(), 0);
}

#[test]
fn test_identical_seed_produces_identical_databases() {
    let (store_a, _) = seeded_store(42, 50);
    let (store_b, _) = seeded_store(42, 50);

    for kind in EntityKind::ALL {
        let checksum = format!(
            "SELECT COUNT(DISTINCT \"{pk}\") FROM \"{table}\"",
            pk = pk_column(kind),
            table = kind.table_name()
        );
        assert_eq!(
            store_a.query_scalar(&checksum).unwrap(),
            store_b.query_scalar(&checksum).unwrap()
        );
    }

    // spot-check one table's full content
    let keys = "SELECT MIN(\"public_key\") || MAX(\"public_key\") FROM \"users\"";
    let a: String = query_string(&store_a, keys);
    let b: String = query_string(&store_b, keys);
    assert_eq!(a, b);
}

fn pk_column(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::User => "user_id",
        EntityKind::Identity => "identity_id",
        EntityKind::Entity => "entity_id",
        EntityKind::Verification => "verification_id",
        EntityKind::SmartContract => "contract_address",
        EntityKind::Transaction => "transaction_id",
        EntityKind::IpfsStorage => "content_id",
    }
}

fn query_string(store: &SeedStore, sql: &str) -> String {
    store.query_string(sql).unwrap()
}
