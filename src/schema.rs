//! Schema model for the identity-verification tables.
//!
//! Provides a dialect-agnostic way to define the seven-table schema and
//! render it as idempotent `CREATE TABLE IF NOT EXISTS` DDL for PostgreSQL
//! or the embedded DuckDB store.

use std::collections::HashMap;
use std::fmt;

/// Target SQL dialect for rendered DDL and INSERT statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    DuckDb,
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "duckdb" => Ok(Dialect::DuckDb),
            _ => Err(format!("Unknown dialect: {}. Use postgres or duckdb", s)),
        }
    }
}

/// SQL column types used by the identity schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Uuid,
    Text,
    Timestamp,
}

impl SqlType {
    /// Type spelling; identical across both supported dialects
    pub fn to_sql(&self, _dialect: Dialect) -> &'static str {
        match self {
            SqlType::Uuid => "UUID",
            SqlType::Text => "TEXT",
            SqlType::Timestamp => "TIMESTAMP",
        }
    }
}

/// Foreign key constraint (always single-column, `ON DELETE CASCADE`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub to_table: String,
    pub to_column: String,
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub sql_type: SqlType,
    pub not_null: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub default: Option<String>,
    pub check_in: Option<&'static [&'static str]>,
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            not_null: false,
            primary_key: false,
            unique: false,
            default: None,
            check_in: None,
            foreign_key: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restrict the column to a fixed value domain via a CHECK constraint
    pub fn check_in(mut self, domain: &'static [&'static str]) -> Self {
        self.check_in = Some(domain);
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKey {
            to_table: table.into(),
            to_column: column.into(),
        });
        self
    }
}

/// Table definition
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, col: Column) -> Self {
        self.columns.push(col);
        self
    }

    /// Get the primary key column name (assumes single-column PK)
    pub fn primary_key_column(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .map(|c| c.name.as_str())
    }

    /// Get all foreign key relationships as (column, fk) pairs
    pub fn foreign_keys(&self) -> Vec<(&str, &ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|c| c.foreign_key.as_ref().map(|fk| (c.name.as_str(), fk)))
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

/// Complete schema definition
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub tables: Vec<Table>,
    table_index: HashMap<String, usize>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: Table) -> Self {
        let idx = self.tables.len();
        self.table_index.insert(table.name.clone(), idx);
        self.tables.push(table);
        self
    }

    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.table_index.get(name).map(|&idx| &self.tables[idx])
    }

    /// Get tables in topological order (FK dependencies first)
    pub fn tables_in_order(&self) -> Vec<&Table> {
        let mut visited = vec![false; self.tables.len()];
        let mut result = Vec::with_capacity(self.tables.len());

        fn visit<'a>(
            idx: usize,
            tables: &'a [Table],
            table_index: &HashMap<String, usize>,
            visited: &mut [bool],
            result: &mut Vec<&'a Table>,
        ) {
            if visited[idx] {
                return;
            }
            visited[idx] = true;

            for (_, fk) in tables[idx].foreign_keys() {
                if let Some(&dep_idx) = table_index.get(&fk.to_table) {
                    visit(dep_idx, tables, table_index, visited, result);
                }
            }

            result.push(&tables[idx]);
        }

        for idx in 0..self.tables.len() {
            visit(
                idx,
                &self.tables,
                &self.table_index,
                &mut visited,
                &mut result,
            );
        }

        result
    }
}

/// Render the idempotent CREATE TABLE statement for one table.
///
/// DuckDB rejects cascading FK actions, so `ON DELETE CASCADE` is only
/// emitted for PostgreSQL. Identifiers are always double-quoted; quoted
/// lowercase is equivalent to unquoted lowercase in both dialects.
pub fn create_table_sql(table: &Table, dialect: Dialect) -> String {
    let mut lines = Vec::with_capacity(table.columns.len());
    for col in &table.columns {
        let mut line = format!("    \"{}\" {}", col.name, col.sql_type.to_sql(dialect));
        if col.primary_key {
            line.push_str(" PRIMARY KEY");
        }
        if let Some(domain) = col.check_in {
            let values: Vec<String> = domain.iter().map(|v| format!("'{}'", v)).collect();
            line.push_str(&format!(
                " CHECK (\"{}\" IN ({}))",
                col.name,
                values.join(", ")
            ));
        }
        if col.not_null && !col.primary_key {
            line.push_str(" NOT NULL");
        }
        if col.unique && !col.primary_key {
            line.push_str(" UNIQUE");
        }
        if let Some(ref default) = col.default {
            line.push_str(&format!(" DEFAULT {}", default));
        }
        if let Some(ref fk) = col.foreign_key {
            line.push_str(&format!(
                " REFERENCES \"{}\"(\"{}\")",
                fk.to_table, fk.to_column
            ));
            if dialect == Dialect::Postgres {
                line.push_str(" ON DELETE CASCADE");
            }
        }
        lines.push(line);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" (\n{}\n);",
        table.name,
        lines.join(",\n")
    )
}

pub const USER_STATUSES: &[&str] = &["active", "suspended", "deleted"];
pub const IDENTITY_STATUSES: &[&str] = &["pending", "verified", "revoked"];
pub const ENTITY_TYPES: &[&str] = &["issuer", "verifier", "regulator"];
pub const ENTITY_STATUSES: &[&str] = &["active", "inactive"];
pub const VERIFICATION_STATUSES: &[&str] = &["pending", "approved", "rejected"];
pub const CONTRACT_TYPES: &[&str] = &["identity", "verification", "transaction"];
pub const CONTRACT_STATUSES: &[&str] = &["active", "deprecated"];
pub const TRANSACTION_TYPES: &[&str] = &[
    "identity_registration",
    "verification_request",
    "credential_issue",
];
pub const TRANSACTION_STATUSES: &[&str] = &["pending", "completed", "failed"];
pub const CONTENT_TYPES: &[&str] = &["identity", "credential"];
pub const ENCRYPTION_STATUSES: &[&str] = &["encrypted", "public"];

/// The seven entity types, in referential dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Identity,
    Entity,
    Verification,
    SmartContract,
    Transaction,
    IpfsStorage,
}

impl EntityKind {
    /// Insertion order: parents before children
    pub const ALL: [EntityKind; 7] = [
        EntityKind::User,
        EntityKind::Identity,
        EntityKind::Entity,
        EntityKind::Verification,
        EntityKind::SmartContract,
        EntityKind::Transaction,
        EntityKind::IpfsStorage,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Identity => "identity",
            EntityKind::Entity => "entity",
            EntityKind::Verification => "verification",
            EntityKind::SmartContract => "smart_contract",
            EntityKind::Transaction => "transaction",
            EntityKind::IpfsStorage => "ipfs_storage",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// The durable seven-table layout of the identity-verification system.
pub fn identity_schema() -> Schema {
    Schema::new()
        .table(
            Table::new("users")
                .column(
                    Column::new("user_id", SqlType::Uuid)
                        .primary_key()
                        .default("gen_random_uuid()"),
                )
                .column(Column::new("public_key", SqlType::Text).not_null().unique())
                .column(Column::new("registration_date", SqlType::Timestamp).default("NOW()"))
                .column(
                    Column::new("status", SqlType::Text)
                        .check_in(USER_STATUSES)
                        .not_null(),
                ),
        )
        .table(
            Table::new("identity")
                .column(
                    Column::new("identity_id", SqlType::Uuid)
                        .primary_key()
                        .default("gen_random_uuid()"),
                )
                .column(Column::new("user_id", SqlType::Uuid).references("users", "user_id"))
                .column(Column::new("ipfs_hash", SqlType::Text).not_null().unique())
                .column(Column::new("creation_date", SqlType::Timestamp).default("NOW()"))
                .column(Column::new("last_updated", SqlType::Timestamp).default("NOW()"))
                .column(
                    Column::new("status", SqlType::Text)
                        .check_in(IDENTITY_STATUSES)
                        .not_null(),
                ),
        )
        .table(
            Table::new("entity")
                .column(
                    Column::new("entity_id", SqlType::Uuid)
                        .primary_key()
                        .default("gen_random_uuid()"),
                )
                .column(Column::new("name", SqlType::Text).not_null())
                .column(Column::new("public_key", SqlType::Text).not_null().unique())
                .column(
                    Column::new("entity_type", SqlType::Text)
                        .check_in(ENTITY_TYPES)
                        .not_null(),
                )
                .column(Column::new("registration_date", SqlType::Timestamp).default("NOW()"))
                .column(
                    Column::new("status", SqlType::Text)
                        .check_in(ENTITY_STATUSES)
                        .not_null(),
                ),
        )
        .table(
            Table::new("verification")
                .column(
                    Column::new("verification_id", SqlType::Uuid)
                        .primary_key()
                        .default("gen_random_uuid()"),
                )
                .column(
                    Column::new("identity_id", SqlType::Uuid).references("identity", "identity_id"),
                )
                .column(
                    Column::new("verifier_entity_id", SqlType::Uuid)
                        .references("entity", "entity_id"),
                )
                .column(Column::new("request_date", SqlType::Timestamp).default("NOW()"))
                .column(Column::new("completion_date", SqlType::Timestamp))
                .column(
                    Column::new("status", SqlType::Text)
                        .check_in(VERIFICATION_STATUSES)
                        .not_null(),
                )
                .column(Column::new("proof_reference", SqlType::Text).unique()),
        )
        .table(
            Table::new("smart_contract")
                .column(Column::new("contract_address", SqlType::Text).primary_key())
                .column(Column::new("entity_id", SqlType::Uuid).references("entity", "entity_id"))
                .column(
                    Column::new("contract_type", SqlType::Text)
                        .check_in(CONTRACT_TYPES)
                        .not_null(),
                )
                .column(Column::new("deployment_date", SqlType::Timestamp).default("NOW()"))
                .column(Column::new("version", SqlType::Text).not_null())
                .column(
                    Column::new("status", SqlType::Text)
                        .check_in(CONTRACT_STATUSES)
                        .not_null(),
                ),
        )
        .table(
            Table::new("transaction")
                .column(
                    Column::new("transaction_id", SqlType::Uuid)
                        .primary_key()
                        .default("gen_random_uuid()"),
                )
                .column(
                    Column::new("contract_address", SqlType::Text)
                        .references("smart_contract", "contract_address"),
                )
                .column(Column::new("user_id", SqlType::Uuid).references("users", "user_id"))
                .column(
                    Column::new("verification_id", SqlType::Uuid)
                        .references("verification", "verification_id"),
                )
                .column(Column::new("transaction_date", SqlType::Timestamp).default("NOW()"))
                .column(
                    Column::new("transaction_type", SqlType::Text)
                        .check_in(TRANSACTION_TYPES)
                        .not_null(),
                )
                .column(
                    Column::new("status", SqlType::Text)
                        .check_in(TRANSACTION_STATUSES)
                        .not_null(),
                ),
        )
        .table(
            Table::new("ipfs_storage")
                .column(
                    Column::new("content_id", SqlType::Uuid)
                        .primary_key()
                        .default("gen_random_uuid()"),
                )
                .column(Column::new("user_id", SqlType::Uuid).references("users", "user_id"))
                .column(Column::new("ipfs_hash", SqlType::Text).not_null().unique())
                .column(Column::new("storage_date", SqlType::Timestamp).default("NOW()"))
                .column(
                    Column::new("content_type", SqlType::Text)
                        .check_in(CONTENT_TYPES)
                        .not_null(),
                )
                .column(
                    Column::new("encryption_status", SqlType::Text)
                        .check_in(ENCRYPTION_STATUSES)
                        .not_null(),
                ),
        )
}
