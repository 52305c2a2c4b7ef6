//! The record store: missions, pilots, and drones in one `SQLite` database.
//!
//! Every write addresses a row by its primary id — there is no positional
//! row addressing anywhere, so a concurrent insert can never shift a write
//! onto the wrong record. The engine never sees this module; it reads the
//! [`Snapshot`]s produced here and hands decisions back.

mod assignment;
mod drone;
mod mission;
mod pilot;

use std::{fs, io, path::PathBuf};

use jiff::Timestamp;
use rusqlite::Connection;

use crate::engine::Snapshot;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("mission not found: {0}")]
    MissionNotFound(String),

    #[error("pilot not found: {0}")]
    PilotNotFound(String),

    #[error("drone not found: {0}")]
    DroneNotFound(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// `SQLite`-backed storage for the three entity tables.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (creating if needed) the database at the given directory root.
    ///
    /// The database file is `<root>/ops.sqlite`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let conn = Connection::open(root.join("ops.sqlite"))?;
        let storage = Self { conn };
        storage.init_schema()?;
        Ok(storage)
    }

    /// An in-memory database, for tests.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Returns the default storage root: `~/.sortie/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".sortie"))
    }

    /// Reads all three tables into an immutable, timestamped snapshot.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            missions: self.list_missions()?,
            pilots: self.list_pilots()?,
            drones: self.list_drones()?,
            loaded_at: Timestamp::now(),
        })
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS missions (
                 project_id         TEXT PRIMARY KEY,
                 location           TEXT NOT NULL,
                 start_date         TEXT,
                 end_date           TEXT,
                 budget             TEXT,
                 priority           TEXT NOT NULL,
                 required_certs     TEXT NOT NULL,
                 required_skills    TEXT NOT NULL,
                 weather_forecast   TEXT NOT NULL,
                 current_assignment TEXT NOT NULL DEFAULT ''
             );
             CREATE TABLE IF NOT EXISTS pilots (
                 pilot_id           TEXT PRIMARY KEY,
                 location           TEXT NOT NULL,
                 status             TEXT NOT NULL,
                 certifications     TEXT NOT NULL,
                 skills             TEXT NOT NULL,
                 daily_rate         TEXT,
                 current_assignment TEXT NOT NULL DEFAULT ''
             );
             CREATE TABLE IF NOT EXISTS drones (
                 drone_id           TEXT PRIMARY KEY,
                 location           TEXT NOT NULL,
                 status             TEXT NOT NULL,
                 capabilities       TEXT NOT NULL,
                 weather_resistance TEXT NOT NULL,
                 maintenance_due    TEXT,
                 current_assignment TEXT NOT NULL DEFAULT ''
             );",
        )?;
        Ok(())
    }
}

/// Parses an optional ISO date column, surfacing garbage as corruption.
fn parse_date_column(value: Option<String>, column: &str) -> Result<Option<jiff::civil::Date>> {
    match value {
        None => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|e| StorageError::Corrupt(format!("invalid {column}: {e}"))),
    }
}

/// Parses an optional decimal column, surfacing garbage as corruption.
fn parse_money_column(
    value: Option<String>,
    column: &str,
) -> Result<Option<rust_decimal::Decimal>> {
    match value {
        None => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|e| StorageError::Corrupt(format!("invalid {column}: {e}"))),
    }
}
