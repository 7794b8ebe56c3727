//! Set store with injectable write failures.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::recorders::lock;
use crate::catalog::{SetRecord, SetStore, SqliteSetStore, StoreError, StoreStats};

/// In-memory SQLite store that refuses writes for chosen set numbers.
///
/// Everything else is delegated to a real [`SqliteSetStore`], so stats
/// reflect exactly the records that were accepted.
#[derive(Clone)]
pub struct FailingSetStore {
    inner: Arc<SqliteSetStore>,
    fail_on: Arc<Mutex<HashSet<String>>>,
    rejected: Arc<Mutex<Vec<String>>>,
    fail_stats: Arc<Mutex<bool>>,
    finalize_calls: Arc<Mutex<usize>>,
}

impl FailingSetStore {
    pub fn new() -> Result<Self, StoreError> {
        Ok(Self {
            inner: Arc::new(SqliteSetStore::in_memory()?),
            fail_on: Arc::default(),
            rejected: Arc::default(),
            fail_stats: Arc::default(),
            finalize_calls: Arc::default(),
        })
    }

    /// Make every upsert of `set_number` fail.
    pub fn fail_on(&self, set_number: &str) {
        lock(&self.fail_on).insert(set_number.to_string());
    }

    /// Make `stats` fail.
    pub fn fail_stats(&self) {
        *lock(&self.fail_stats) = true;
    }

    pub fn finalize_calls(&self) -> usize {
        *lock(&self.finalize_calls)
    }

    /// Set numbers whose upsert was refused, in order.
    pub fn rejected(&self) -> Vec<String> {
        lock(&self.rejected).clone()
    }

    /// The underlying store.
    pub fn inner(&self) -> &SqliteSetStore {
        &self.inner
    }
}

impl SetStore for FailingSetStore {
    fn upsert(&self, record: &SetRecord) -> Result<(), StoreError> {
        if lock(&self.fail_on).contains(&record.set_number) {
            lock(&self.rejected).push(record.set_number.clone());
            return Err(StoreError::Database(format!(
                "injected write failure for {}",
                record.set_number
            )));
        }
        self.inner.upsert(record)
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        if *lock(&self.fail_stats) {
            return Err(StoreError::Database("injected stats failure".to_string()));
        }
        self.inner.stats()
    }

    fn finalize(&self) -> Result<(), StoreError> {
        *lock(&self.finalize_calls) += 1;
        self.inner.finalize()
    }
}
