//! Set catalog - the local SQLite copy of Brickset sets.
//!
//! Records are keyed by their set number. Every write is a full replace, so
//! re-running an ingestion converges on the latest data the API returned.

mod sqlite;
mod types;

pub use sqlite::SqliteSetStore;
pub use types::*;

/// Trait for set storage.
pub trait SetStore: Send + Sync {
    /// Insert a set, or replace every field of the existing row with the
    /// same set number (or set ID).
    ///
    /// Duplicates are the normal case across runs and never an error. A
    /// failure only concerns this record.
    fn upsert(&self, record: &SetRecord) -> Result<(), StoreError>;

    /// Get store statistics, computed from the current contents.
    fn stats(&self) -> Result<StoreStats, StoreError>;

    /// Flush pending state at the end of a run.
    fn finalize(&self) -> Result<(), StoreError>;
}
