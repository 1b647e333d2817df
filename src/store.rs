//! Data access for the `parcel` table.
//!
//! Every operation is a single parameterized statement. The store keeps no
//! state besides the connection and imposes no status rules.

use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::error::{Error, Result};
use crate::parcel::Parcel;
use crate::sqlite::{self, SqliteConfig};

const INSERT_PARCEL: &str =
    "INSERT INTO parcel (client, status, address, created_at) VALUES (?1, ?2, ?3, ?4)";

const SELECT_PARCEL: &str =
    "SELECT number, client, status, address, created_at FROM parcel WHERE number = ?1";

const SELECT_BY_CLIENT: &str = r#"
SELECT number, client, status, address, created_at
FROM parcel
WHERE client = ?1
ORDER BY number
"#;

const UPDATE_ADDRESS: &str = "UPDATE parcel SET address = ?1 WHERE number = ?2";
const UPDATE_STATUS: &str = "UPDATE parcel SET status = ?1 WHERE number = ?2";
const DELETE_PARCEL: &str = "DELETE FROM parcel WHERE number = ?1";

/// Parcel storage over a SQLite connection.
pub struct ParcelStore {
    conn: Connection,
}

impl ParcelStore {
    /// Wrap a connection whose `parcel` table already exists.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open the configured database, creating the table if needed.
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        Ok(Self::new(sqlite::open_connection(config)?))
    }

    /// Private in-memory database with the parcel schema.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        sqlite::initialize_schema(&conn, &sqlite::parcel_schema())?;
        Ok(Self::new(conn))
    }

    /// The wrapped connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert a parcel and return its assigned number. `parcel.number` is ignored.
    pub fn add(&self, parcel: &Parcel) -> Result<i64> {
        self.conn.execute(
            INSERT_PARCEL,
            params![parcel.client, parcel.status, parcel.address, parcel.created_at],
        )?;
        let number = self.conn.last_insert_rowid();
        debug!(number, client = parcel.client, "parcel added");
        Ok(number)
    }

    /// Fetch one parcel; a missing row is `Error::NotFound`.
    pub fn get(&self, number: i64) -> Result<Parcel> {
        self.conn
            .query_row(SELECT_PARCEL, [number], parcel_from_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::NotFound(number),
                other => Error::Storage(other),
            })
    }

    /// Replace the address of a parcel, whatever its status.
    pub fn set_address(&self, number: i64, address: &str) -> Result<()> {
        let changed = self.conn.execute(UPDATE_ADDRESS, params![address, number])?;
        debug!(number, changed, "parcel address updated");
        Ok(())
    }

    /// Any status string is accepted here.
    pub fn set_status(&self, number: i64, status: &str) -> Result<()> {
        let changed = self.conn.execute(UPDATE_STATUS, params![status, number])?;
        debug!(number, status, changed, "parcel status updated");
        Ok(())
    }

    /// Remove a parcel. Deleting a missing number is not an error.
    pub fn delete(&self, number: i64) -> Result<()> {
        let changed = self.conn.execute(DELETE_PARCEL, [number])?;
        debug!(number, changed, "parcel deleted");
        Ok(())
    }

    /// All parcels of `client`, in ascending number order.
    pub fn get_by_client(&self, client: i64) -> Result<Vec<Parcel>> {
        let mut stmt = self.conn.prepare(SELECT_BY_CLIENT)?;
        let rows = stmt.query_map([client], parcel_from_row)?;
        let mut parcels = Vec::new();
        for row in rows {
            parcels.push(row?);
        }
        debug!(client, count = parcels.len(), "parcels fetched by client");
        Ok(parcels)
    }
}

fn parcel_from_row(row: &Row<'_>) -> rusqlite::Result<Parcel> {
    Ok(Parcel {
        number: row.get(0)?,
        client: row.get(1)?,
        status: row.get(2)?,
        address: row.get(3)?,
        created_at: row.get(4)?,
    })
}
