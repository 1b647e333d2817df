use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::Result;

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "TRACKER_DB_PATH";
/// Environment variable overriding the busy timeout (ms).
pub const BUSY_TIMEOUT_ENV: &str = "TRACKER_BUSY_TIMEOUT_MS";
/// Database file used when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "tracker.db";
/// Default busy timeout (ms).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Name of the table holding parcels.
pub const PARCEL_TABLE: &str = "parcel";

/// Schema definition for the SQLite database
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }
    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }

    /// Render every table and index as one idempotent DDL batch.
    pub fn to_sql(&self) -> String {
        let mut statements = Vec::new();
        for table in &self.tables {
            statements.push(table.create_sql());
            statements.extend(table.index_sql());
        }
        statements.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }
    pub fn with_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }
    pub fn with_index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(ColumnDefinition::to_sql).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.name,
            columns.join(", ")
        )
    }

    pub fn index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|index| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {}({});",
                    index.name,
                    self.name,
                    index.columns.join(", ")
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            constraints: Vec::new(),
        }
    }
    pub fn with_constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type.as_sql());
        for constraint in &self.constraints {
            sql.push(' ');
            sql.push_str(constraint.as_sql());
        }
        sql
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataType {
    Integer,
    Text,
}

impl DataType {
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnConstraint {
    PrimaryKey,
    /// Only valid after `PrimaryKey` on an INTEGER column.
    AutoIncrement,
    NotNull,
}

impl ColumnConstraint {
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::PrimaryKey => "PRIMARY KEY",
            Self::AutoIncrement => "AUTOINCREMENT",
            Self::NotNull => "NOT NULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    pub name: String,
    pub columns: Vec<String>,
}

impl IndexDefinition {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// The `parcel` table: one row per shipment.
pub fn parcel_schema() -> Schema {
    use ColumnConstraint::*;

    Schema::new().add_table(
        TableDefinition::new(PARCEL_TABLE)
            .with_column(
                ColumnDefinition::new("number", DataType::Integer)
                    .with_constraint(PrimaryKey)
                    .with_constraint(AutoIncrement),
            )
            .with_column(ColumnDefinition::new("client", DataType::Integer).with_constraint(NotNull))
            .with_column(ColumnDefinition::new("status", DataType::Text).with_constraint(NotNull))
            .with_column(ColumnDefinition::new("address", DataType::Text).with_constraint(NotNull))
            .with_column(ColumnDefinition::new("created_at", DataType::Text).with_constraint(NotNull))
            .with_index(IndexDefinition::new("idx_parcel_client", &["client"])),
    )
}

/// SQLite store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Path to the SQLite database file
    pub db_path: String,
    /// How long a statement waits on a locked database (ms)
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Schema created on open
    #[serde(skip, default = "parcel_schema")]
    pub schema: Schema,
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

impl SqliteConfig {
    /// Config for the parcel schema at `db_path`.
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            schema: parcel_schema(),
        }
    }

    /// Read `TRACKER_DB_PATH` and `TRACKER_BUSY_TIMEOUT_MS`, falling back to defaults.
    pub fn from_env() -> Self {
        let db_path = std::env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        let mut config = Self::new(db_path);
        if let Ok(raw) = std::env::var(BUSY_TIMEOUT_ENV) {
            match raw.parse() {
                Ok(ms) => config.busy_timeout_ms = ms,
                Err(_) => warn!(value = %raw, "ignoring invalid {}", BUSY_TIMEOUT_ENV),
            }
        }
        config
    }

    pub fn with_busy_timeout(mut self, ms: u64) -> Self {
        self.busy_timeout_ms = ms;
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }
}

/// Open the configured database and make sure its schema exists.
pub fn open_connection(config: &SqliteConfig) -> Result<Connection> {
    info!(path = %config.db_path, "opening sqlite database");
    let conn = Connection::open(&config.db_path)?;
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    initialize_schema(&conn, &config.schema)?;
    Ok(conn)
}

/// Create any missing tables and indexes.
pub fn initialize_schema(conn: &Connection, schema: &Schema) -> Result<()> {
    conn.execute_batch(&schema.to_sql())?;
    info!(tables = schema.tables.len(), "schema ready");
    Ok(())
}
