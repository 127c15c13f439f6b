//! Named, integer-keyed in-memory store.
//!
//! # Responsibility
//! - Provide add/insert/remove/lookup over a single named key space.
//! - Expose point-in-time key/value reads in a canonical order.
//!
//! # Invariants
//! - `name` is non-blank and fixed for the store lifetime.
//! - Failed writes leave the store unchanged.
//! - `keys()` and `values()` enumerate in ascending key order, so the i-th key
//!   always belongs to the i-th value.
//!
//! # Concurrency
//! The store is not synchronized. Mutation takes `&mut self`; hosts that share
//! a store across threads wrap it in `Mutex`/`RwLock`.

use crate::paging::{paginate, Page, PageError, PageResult, PageSource};
use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Integer identifier used by every keyed store.
pub type StoreKey = i64;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by keyed store writes and construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    InvalidArgument(String),
    DuplicateKey(StoreKey),
    KeyNotFound(StoreKey),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::DuplicateKey(key) => write!(f, "key already exists: {key}"),
            Self::KeyNotFound(key) => write!(f, "key not found: {key}"),
        }
    }
}

impl Error for StoreError {}

/// In-memory mapping from [`StoreKey`] to `T`, bound to a name.
#[derive(Debug, Clone)]
pub struct KeyedStore<T> {
    name: String,
    entries: BTreeMap<StoreKey, T>,
}

impl<T> KeyedStore<T> {
    /// Creates an empty store bound to `name`.
    ///
    /// # Errors
    /// - `InvalidArgument` when `name` is empty or whitespace-only.
    pub fn new(name: impl Into<String>) -> StoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StoreError::InvalidArgument(
                "store name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            name,
            entries: BTreeMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a new entry.
    ///
    /// # Errors
    /// - `DuplicateKey` when `key` is already present. The existing value is
    ///   kept and `value` is dropped.
    pub fn add(&mut self, key: StoreKey, value: T) -> StoreResult<()> {
        if self.entries.contains_key(&key) {
            debug!(
                "event=store_add module=store status=error store={} key={} error_code=duplicate_key",
                self.name, key
            );
            return Err(StoreError::DuplicateKey(key));
        }

        self.entries.insert(key, value);
        debug!(
            "event=store_add module=store status=ok store={} key={} count={}",
            self.name,
            key,
            self.entries.len()
        );
        Ok(())
    }

    /// Same contract as [`KeyedStore::add`]; use [`KeyedStore::upsert`] to
    /// replace.
    pub fn insert(&mut self, key: StoreKey, value: T) -> StoreResult<()> {
        self.add(key, value)
    }

    /// Inserts or replaces, returning the previous value if any.
    pub fn upsert(&mut self, key: StoreKey, value: T) -> Option<T> {
        self.entries.insert(key, value)
    }

    /// Replaces the value of an existing entry and returns the old one.
    ///
    /// # Errors
    /// - `KeyNotFound` when `key` is absent; nothing is inserted.
    pub fn update(&mut self, key: StoreKey, value: T) -> StoreResult<T> {
        match self.entries.get_mut(&key) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(StoreError::KeyNotFound(key)),
        }
    }

    /// Removes `key`, returning whether an entry existed.
    pub fn remove(&mut self, key: StoreKey) -> bool {
        self.take(key).is_some()
    }

    /// Removes `key` and hands back its value.
    pub fn take(&mut self, key: StoreKey) -> Option<T> {
        let removed = self.entries.remove(&key);
        debug!(
            "event=store_remove module=store status=ok store={} key={} removed={}",
            self.name,
            key,
            removed.is_some()
        );
        removed
    }

    pub fn get(&self, key: StoreKey) -> Option<&T> {
        self.entries.get(&key)
    }

    pub fn contains_key(&self, key: StoreKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns current keys in ascending order.
    pub fn keys(&self) -> Vec<StoreKey> {
        self.entries.keys().copied().collect()
    }

    /// Returns current values, ordered by their keys.
    pub fn values(&self) -> Vec<&T> {
        self.entries.values().collect()
    }

    /// Returns current `(key, value)` pairs in ascending key order.
    pub fn entries(&self) -> Vec<(StoreKey, &T)> {
        self.entries.iter().map(|(key, value)| (*key, value)).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> KeyedStore<T> {
    /// Returns one page of values in key order.
    pub fn page(&self, page_number: u32, page_size: u32) -> PageResult<Page<T>> {
        paginate(self, page_number, page_size)
    }
}

impl<T: Clone> PageSource for KeyedStore<T> {
    type Item = T;
    type Error = PageError;

    fn total_count(&self) -> PageResult<u64> {
        Ok(self.entries.len() as u64)
    }

    fn fetch_range(&self, offset: u64, limit: u64) -> PageResult<Vec<T>> {
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self.entries.values().skip(skip).take(take).cloned().collect())
    }
}
