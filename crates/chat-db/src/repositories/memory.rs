//! Append-only in-memory collection

use chat_core::{RecordId, Stored};
use parking_lot::RwLock;
use std::convert::Infallible;

/// Append-only record store
///
/// Records are never updated or removed, so the record id doubles as the
/// position in the backing vector.
#[derive(Debug)]
pub struct MemoryCollection<T> {
    records: RwLock<Vec<Stored<T>>>,
}

impl<T: Clone> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Store a record and return its stored form
    pub fn append(&self, record: T) -> Stored<T> {
        self.append_checked::<Infallible, _>(record, |_| Ok(()))
            .unwrap_or_else(|never| match never {})
    }

    /// Store a record if `check` accepts the current contents
    ///
    /// The check and the insert happen under the same write lock.
    pub fn append_checked<E, F>(&self, record: T, check: F) -> Result<Stored<T>, E>
    where
        F: FnOnce(&[Stored<T>]) -> Result<(), E>,
    {
        let mut records = self.records.write();
        check(&records)?;

        let stored = Stored::new(RecordId::new(records.len() as u64), record);
        records.push(stored.clone());
        Ok(stored)
    }

    /// Snapshot of all records in append order
    pub fn list(&self) -> Vec<Stored<T>> {
        self.records.read().clone()
    }

    pub fn get(&self, id: RecordId) -> Option<Stored<T>> {
        let index = usize::try_from(id.into_inner()).ok()?;
        self.records.read().get(index).cloned()
    }

    /// Last record matching `predicate`
    pub fn find_last<P>(&self, predicate: P) -> Option<Stored<T>>
    where
        P: Fn(&T) -> bool,
    {
        self.records
            .read()
            .iter()
            .rev()
            .find(|stored| predicate(&stored.record))
            .cloned()
    }

    /// First record matching `predicate`
    pub fn find_first<P>(&self, predicate: P) -> Option<Stored<T>>
    where
        P: Fn(&T) -> bool,
    {
        self.records
            .read()
            .iter()
            .find(|stored| predicate(&stored.record))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl<T: Clone> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}
