//! Dependency-ordered synthetic row generation for the identity schema.
//!
//! Produces deterministic, FK-consistent rows for all seven tables. Each
//! per-entity builder follows the same contract: take a target count plus
//! the identifier sequences of its prerequisite entities, draw field values
//! from the locale faker, and return the batch together with the ordered
//! identifiers it created.

use std::collections::HashSet;
use std::fmt;
use std::time::Instant;

use chrono::{Duration, NaiveDateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use schemars::JsonSchema;
use serde::Serialize;

use crate::error::SeedError;
use crate::faker::FieldFaker;
use crate::schema::{self, EntityKind};
use crate::store::SeedStore;

/// Rows to create per table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCounts {
    pub users: usize,
    pub identities: usize,
    pub entities: usize,
    pub verifications: usize,
    pub contracts: usize,
    pub transactions: usize,
    pub storage: usize,
}

impl TargetCounts {
    /// Same count for every table
    pub fn uniform(count: usize) -> Self {
        Self {
            users: count,
            identities: count,
            entities: count,
            verifications: count,
            contracts: count,
            transactions: count,
            storage: count,
        }
    }

    pub fn total(&self) -> usize {
        self.users
            + self.identities
            + self.entities
            + self.verifications
            + self.contracts
            + self.transactions
            + self.storage
    }
}

impl Default for TargetCounts {
    fn default() -> Self {
        Self::uniform(500)
    }
}

/// Explicit configuration for one seeding run; no module-level state
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    pub counts: TargetCounts,
    /// Upper bound for generated timestamps; history extends one year back
    pub anchor: NaiveDateTime,
    /// Show a progress bar while batches are persisted
    pub progress: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            counts: TargetCounts::default(),
            anchor: Utc::now().naive_utc(),
            progress: false,
        }
    }
}

/// A generated SQL value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    /// Format for an INSERT statement (both supported dialects)
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            SqlValue::Timestamp(t) => format!("'{}'", t.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// A row of generated values
pub type Row = Vec<SqlValue>;

/// Generated rows for a single table, plus the identifiers they introduce
#[derive(Debug, Clone, PartialEq)]
pub struct RowBatch {
    pub entity: EntityKind,
    pub columns: &'static [&'static str],
    pub rows: Vec<Row>,
    /// Surrogate identifiers in insertion order (contract addresses for
    /// smart contracts, UUIDs elsewhere)
    pub ids: Vec<String>,
}

/// A complete generated run, one batch per table in dependency order
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRun {
    pub batches: Vec<RowBatch>,
}

/// Per-entity row counts of a completed run
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SeedSummary {
    pub users: usize,
    pub identities: usize,
    pub entities: usize,
    pub verifications: usize,
    pub contracts: usize,
    pub transactions: usize,
    pub storage: usize,
    pub duration_secs: f64,
}

impl SeedSummary {
    pub fn total(&self) -> usize {
        self.users
            + self.identities
            + self.entities
            + self.verifications
            + self.contracts
            + self.transactions
            + self.storage
    }
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows across 7 tables in {:.2}s",
            self.total(),
            self.duration_secs
        )
    }
}

/// Main data generator and orchestrator
pub struct Seeder {
    faker: FieldFaker<ChaCha8Rng>,
    counts: TargetCounts,
    anchor: NaiveDateTime,
    progress: bool,
    // Seen-sets backing the uniqueness guarantees; collisions retry
    ids: HashSet<String>,
    public_keys: HashSet<String>,
    content_hashes: HashSet<String>,
    contract_addresses: HashSet<String>,
    proof_references: HashSet<String>,
}

impl Seeder {
    pub fn new(config: &SeedConfig) -> Self {
        Self {
            faker: FieldFaker::new(ChaCha8Rng::seed_from_u64(config.seed)),
            counts: config.counts,
            anchor: config.anchor,
            progress: config.progress,
            ids: HashSet::new(),
            public_keys: HashSet::new(),
            content_hashes: HashSet::new(),
            contract_addresses: HashSet::new(),
            proof_references: HashSet::new(),
        }
    }

    fn history_start(&self) -> NaiveDateTime {
        self.anchor - Duration::days(365)
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let candidate = self.faker.uuid();
            if self.ids.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn unique_public_key(&mut self) -> String {
        loop {
            let candidate = self.faker.hex_string(20);
            if self.public_keys.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn unique_content_hash(&mut self) -> String {
        loop {
            let candidate = self.faker.sha256_digest();
            if self.content_hashes.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn unique_contract_address(&mut self) -> String {
        loop {
            let candidate = format!("0x{}", self.faker.hex_string(40));
            if self.contract_addresses.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn unique_proof_reference(&mut self) -> String {
        loop {
            let candidate = self.faker.hex_string(20);
            if self.proof_references.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn require_parents(
        entity: EntityKind,
        parent: EntityKind,
        parents: &[String],
        count: usize,
    ) -> Result<(), SeedError> {
        if count > 0 && parents.is_empty() {
            return Err(SeedError::Precondition { entity, parent });
        }
        Ok(())
    }

    pub fn users(&mut self, count: usize) -> RowBatch {
        let start = self.history_start();
        let mut rows = Vec::with_capacity(count);
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.fresh_id();
            let public_key = self.unique_public_key();
            let registered = self.faker.datetime_between(start, self.anchor);
            let status = *self.faker.pick(schema::USER_STATUSES);
            rows.push(vec![
                SqlValue::Text(id.clone()),
                SqlValue::Text(public_key),
                SqlValue::Timestamp(registered),
                SqlValue::Text(status.to_string()),
            ]);
            ids.push(id);
        }
        RowBatch {
            entity: EntityKind::User,
            columns: &["user_id", "public_key", "registration_date", "status"],
            rows,
            ids,
        }
    }

    pub fn identities(&mut self, count: usize, user_ids: &[String]) -> Result<RowBatch, SeedError> {
        Self::require_parents(EntityKind::Identity, EntityKind::User, user_ids, count)?;
        let start = self.history_start();
        let mut rows = Vec::with_capacity(count);
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.fresh_id();
            let user_id = self.faker.pick(user_ids).clone();
            let ipfs_hash = self.unique_content_hash();
            let creation = self.faker.datetime_between(start, self.anchor);
            // Never before creation; may extend past the anchor
            let last_updated = creation + Duration::days(self.faker.int_range(0, 365));
            let status = *self.faker.pick(schema::IDENTITY_STATUSES);
            rows.push(vec![
                SqlValue::Text(id.clone()),
                SqlValue::Text(user_id),
                SqlValue::Text(ipfs_hash),
                SqlValue::Timestamp(creation),
                SqlValue::Timestamp(last_updated),
                SqlValue::Text(status.to_string()),
            ]);
            ids.push(id);
        }
        Ok(RowBatch {
            entity: EntityKind::Identity,
            columns: &[
                "identity_id",
                "user_id",
                "ipfs_hash",
                "creation_date",
                "last_updated",
                "status",
            ],
            rows,
            ids,
        })
    }

    pub fn entities(&mut self, count: usize) -> RowBatch {
        let start = self.history_start();
        let mut rows = Vec::with_capacity(count);
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.fresh_id();
            let name = self.faker.company_name();
            let public_key = self.unique_public_key();
            let entity_type = *self.faker.pick(schema::ENTITY_TYPES);
            let registered = self.faker.datetime_between(start, self.anchor);
            let status = *self.faker.pick(schema::ENTITY_STATUSES);
            rows.push(vec![
                SqlValue::Text(id.clone()),
                SqlValue::Text(name),
                SqlValue::Text(public_key),
                SqlValue::Text(entity_type.to_string()),
                SqlValue::Timestamp(registered),
                SqlValue::Text(status.to_string()),
            ]);
            ids.push(id);
        }
        RowBatch {
            entity: EntityKind::Entity,
            columns: &[
                "entity_id",
                "name",
                "public_key",
                "entity_type",
                "registration_date",
                "status",
            ],
            rows,
            ids,
        }
    }

    pub fn verifications(
        &mut self,
        count: usize,
        identity_ids: &[String],
        entity_ids: &[String],
    ) -> Result<RowBatch, SeedError> {
        Self::require_parents(
            EntityKind::Verification,
            EntityKind::Identity,
            identity_ids,
            count,
        )?;
        Self::require_parents(
            EntityKind::Verification,
            EntityKind::Entity,
            entity_ids,
            count,
        )?;
        let start = self.history_start();
        let mut rows = Vec::with_capacity(count);
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.fresh_id();
            let identity_id = self.faker.pick(identity_ids).clone();
            let verifier_id = self.faker.pick(entity_ids).clone();
            let requested = self.faker.datetime_between(start, self.anchor);
            let status = *self.faker.pick(schema::VERIFICATION_STATUSES);
            // Completion only exists once the request has been decided
            let completed = if status == "pending" {
                SqlValue::Null
            } else {
                SqlValue::Timestamp(self.faker.datetime_between(requested, self.anchor))
            };
            let proof_reference = self.unique_proof_reference();
            rows.push(vec![
                SqlValue::Text(id.clone()),
                SqlValue::Text(identity_id),
                SqlValue::Text(verifier_id),
                SqlValue::Timestamp(requested),
                completed,
                SqlValue::Text(status.to_string()),
                SqlValue::Text(proof_reference),
            ]);
            ids.push(id);
        }
        Ok(RowBatch {
            entity: EntityKind::Verification,
            columns: &[
                "verification_id",
                "identity_id",
                "verifier_entity_id",
                "request_date",
                "completion_date",
                "status",
                "proof_reference",
            ],
            rows,
            ids,
        })
    }

    pub fn smart_contracts(
        &mut self,
        count: usize,
        entity_ids: &[String],
    ) -> Result<RowBatch, SeedError> {
        Self::require_parents(
            EntityKind::SmartContract,
            EntityKind::Entity,
            entity_ids,
            count,
        )?;
        let start = self.history_start();
        let mut rows = Vec::with_capacity(count);
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let address = self.unique_contract_address();
            let entity_id = self.faker.pick(entity_ids).clone();
            let contract_type = *self.faker.pick(schema::CONTRACT_TYPES);
            let deployed = self.faker.datetime_between(start, self.anchor);
            let version = self.faker.version();
            let status = *self.faker.pick(schema::CONTRACT_STATUSES);
            rows.push(vec![
                SqlValue::Text(address.clone()),
                SqlValue::Text(entity_id),
                SqlValue::Text(contract_type.to_string()),
                SqlValue::Timestamp(deployed),
                SqlValue::Text(version),
                SqlValue::Text(status.to_string()),
            ]);
            ids.push(address);
        }
        Ok(RowBatch {
            entity: EntityKind::SmartContract,
            columns: &[
                "contract_address",
                "entity_id",
                "contract_type",
                "deployment_date",
                "version",
                "status",
            ],
            rows,
            ids,
        })
    }

    pub fn transactions(
        &mut self,
        count: usize,
        user_ids: &[String],
        contract_addresses: &[String],
        verification_ids: &[String],
    ) -> Result<RowBatch, SeedError> {
        Self::require_parents(EntityKind::Transaction, EntityKind::User, user_ids, count)?;
        Self::require_parents(
            EntityKind::Transaction,
            EntityKind::SmartContract,
            contract_addresses,
            count,
        )?;
        Self::require_parents(
            EntityKind::Transaction,
            EntityKind::Verification,
            verification_ids,
            count,
        )?;
        let start = self.history_start();
        let mut rows = Vec::with_capacity(count);
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.fresh_id();
            // Contract, user, and verification are sampled independently;
            // the schema carries no constraint tying them together.
            let contract = self.faker.pick(contract_addresses).clone();
            let user_id = self.faker.pick(user_ids).clone();
            let verification_id = self.faker.pick(verification_ids).clone();
            let date = self.faker.datetime_between(start, self.anchor);
            let tx_type = *self.faker.pick(schema::TRANSACTION_TYPES);
            let status = *self.faker.pick(schema::TRANSACTION_STATUSES);
            rows.push(vec![
                SqlValue::Text(id.clone()),
                SqlValue::Text(contract),
                SqlValue::Text(user_id),
                SqlValue::Text(verification_id),
                SqlValue::Timestamp(date),
                SqlValue::Text(tx_type.to_string()),
                SqlValue::Text(status.to_string()),
            ]);
            ids.push(id);
        }
        Ok(RowBatch {
            entity: EntityKind::Transaction,
            columns: &[
                "transaction_id",
                "contract_address",
                "user_id",
                "verification_id",
                "transaction_date",
                "transaction_type",
                "status",
            ],
            rows,
            ids,
        })
    }

    pub fn ipfs_storage(
        &mut self,
        count: usize,
        user_ids: &[String],
    ) -> Result<RowBatch, SeedError> {
        Self::require_parents(EntityKind::IpfsStorage, EntityKind::User, user_ids, count)?;
        let start = self.history_start();
        let mut rows = Vec::with_capacity(count);
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.fresh_id();
            let user_id = self.faker.pick(user_ids).clone();
            let ipfs_hash = self.unique_content_hash();
            let stored = self.faker.datetime_between(start, self.anchor);
            let content_type = *self.faker.pick(schema::CONTENT_TYPES);
            let encryption = *self.faker.pick(schema::ENCRYPTION_STATUSES);
            rows.push(vec![
                SqlValue::Text(id.clone()),
                SqlValue::Text(user_id),
                SqlValue::Text(ipfs_hash),
                SqlValue::Timestamp(stored),
                SqlValue::Text(content_type.to_string()),
                SqlValue::Text(encryption.to_string()),
            ]);
            ids.push(id);
        }
        Ok(RowBatch {
            entity: EntityKind::IpfsStorage,
            columns: &[
                "content_id",
                "user_id",
                "ipfs_hash",
                "storage_date",
                "content_type",
                "encryption_status",
            ],
            rows,
            ids,
        })
    }

    /// Generate all seven batches without touching a store.
    ///
    /// Used by script rendering; the same precondition rules apply.
    pub fn collect(mut self) -> Result<SeedRun, SeedError> {
        let counts = self.counts;
        let users = self.users(counts.users);
        let identities = self.identities(counts.identities, &users.ids)?;
        let entities = self.entities(counts.entities);
        let verifications =
            self.verifications(counts.verifications, &identities.ids, &entities.ids)?;
        let contracts = self.smart_contracts(counts.contracts, &entities.ids)?;
        let transactions = self.transactions(
            counts.transactions,
            &users.ids,
            &contracts.ids,
            &verifications.ids,
        )?;
        let storage = self.ipfs_storage(counts.storage, &users.ids)?;
        Ok(SeedRun {
            batches: vec![
                users,
                identities,
                entities,
                verifications,
                contracts,
                transactions,
                storage,
            ],
        })
    }

    /// Run the full pipeline against a store, one committed batch per table.
    ///
    /// Stops at the first failure; earlier batches stay committed.
    pub fn run(mut self, store: &mut SeedStore) -> Result<SeedSummary, SeedError> {
        let started = Instant::now();
        let counts = self.counts;

        let bar = if self.progress {
            let pb = ProgressBar::new(counts.total() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%)",
                    )
                    .unwrap()
                    .progress_chars("=>-"),
            );
            Some(pb)
        } else {
            None
        };

        let persist = |store: &mut SeedStore, batch: &RowBatch| -> Result<usize, SeedError> {
            let inserted = store.insert_batch(batch)?;
            if let Some(ref pb) = bar {
                pb.inc(inserted as u64);
            }
            Ok(inserted)
        };

        let users = self.users(counts.users);
        persist(store, &users)?;

        let identities = self.identities(counts.identities, &users.ids)?;
        persist(store, &identities)?;

        let entities = self.entities(counts.entities);
        persist(store, &entities)?;

        let verifications =
            self.verifications(counts.verifications, &identities.ids, &entities.ids)?;
        persist(store, &verifications)?;

        let contracts = self.smart_contracts(counts.contracts, &entities.ids)?;
        persist(store, &contracts)?;

        let transactions = self.transactions(
            counts.transactions,
            &users.ids,
            &contracts.ids,
            &verifications.ids,
        )?;
        persist(store, &transactions)?;

        let storage = self.ipfs_storage(counts.storage, &users.ids)?;
        persist(store, &storage)?;

        if let Some(pb) = bar {
            pb.finish_with_message("Seeding complete");
        }

        Ok(SeedSummary {
            users: users.ids.len(),
            identities: identities.ids.len(),
            entities: entities.ids.len(),
            verifications: verifications.ids.len(),
            contracts: contracts.ids.len(),
            transactions: transactions.ids.len(),
            storage: storage.ids.len(),
            duration_secs: started.elapsed().as_secs_f64(),
        })
    }
}
