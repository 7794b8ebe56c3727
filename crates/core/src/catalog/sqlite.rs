//! SQLite-backed set store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{SetRecord, SetStore, StoreError, StoreStats};

/// SQLite-backed set store.
///
/// Every statement runs in autocommit mode, so each upsert is durable on its
/// own and an interrupted run keeps everything written before it stopped.
pub struct SqliteSetStore {
    conn: Mutex<Connection>,
}

impl SqliteSetStore {
    /// Open (or create) the database file and its `sets` table.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        debug!("Opened set store at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        // Column names match databases written by earlier versions of the job.
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sets (
                set_id INTEGER PRIMARY KEY,
                set_number TEXT,
                name TEXT,
                theme TEXT,
                subtheme TEXT,
                year INTEGER,
                pieces INTEGER,
                used_price REAL,
                new_price REAL,
                upc TEXT,
                item_number_na TEXT,
                image_url TEXT,
                thumbnail_url TEXT,
                UNIQUE(set_number)
            );
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Internal("set store connection lock poisoned".to_string()))
    }

    /// Get a set by its set number.
    pub fn get(&self, set_number: &str) -> Result<Option<SetRecord>, StoreError> {
        let conn = self.conn()?;

        conn.query_row(
            "SELECT set_id, set_number, name, theme, subtheme, year, pieces, used_price,
                    new_price, upc, item_number_na, image_url, thumbnail_url
             FROM sets WHERE set_number = ?",
            params![set_number],
            Self::row_to_record,
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Convert a row to a SetRecord.
    ///
    /// Text columns may be NULL in rows written by older tooling; they read
    /// back as empty strings.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<SetRecord> {
        Ok(SetRecord {
            set_id: row.get(0)?,
            set_number: row.get(1)?,
            name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            theme: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            subtheme: row.get(4)?,
            year: row.get(5)?,
            piece_count: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
            used_price: row.get(7)?,
            new_price: row.get(8)?,
            upc: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
            item_number_region: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
            image_url: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
            thumbnail_url: row.get::<_, Option<String>>(12)?.unwrap_or_default(),
        })
    }
}

impl SetStore for SqliteSetStore {
    fn upsert(&self, record: &SetRecord) -> Result<(), StoreError> {
        let conn = self.conn()?;

        // OR REPLACE deletes any row conflicting on set_id or set_number
        // before inserting, so the new row fully replaces the old one.
        conn.execute(
            "INSERT OR REPLACE INTO sets
                (set_id, set_number, name, theme, subtheme, year, pieces,
                 used_price, new_price, upc, item_number_na, image_url, thumbnail_url)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                record.set_id,
                &record.set_number,
                &record.name,
                &record.theme,
                &record.subtheme,
                record.year,
                record.piece_count,
                record.used_price,
                record.new_price,
                &record.upc,
                &record.item_number_region,
                &record.image_url,
                &record.thumbnail_url,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        let conn = self.conn()?;

        let total_sets: u64 = conn
            .query_row("SELECT COUNT(*) FROM sets", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let total_themes: u64 = conn
            .query_row("SELECT COUNT(DISTINCT theme) FROM sets", [], |row| {
                row.get(0)
            })
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(StoreStats {
            total_sets,
            total_themes,
        })
    }

    fn finalize(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;

        conn.execute_batch("PRAGMA optimize;")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        debug!("Set store finalized");
        Ok(())
    }
}
