/// Bounded, persisted sequences for chrome.storage.local
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::host::StorageArea;

pub const HISTORY_KEY: &str = "tabHistory";
pub const SESSIONS_KEY: &str = "savedSessions";

/// A newest-first list that never grows beyond its capacity
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedList<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> BoundedList<T> {
    pub fn new(capacity: usize) -> Self {
        BoundedList {
            items: Vec::new(),
            capacity,
        }
    }

    /// Wrap stored items, trimming anything past the capacity
    pub fn from_vec(mut items: Vec<T>, capacity: usize) -> Self {
        items.truncate(capacity);
        BoundedList { items, capacity }
    }

    /// Insert at the front; the oldest items fall off the end
    pub fn push_front(&mut self, item: T) {
        self.items.insert(0, item);
        self.items.truncate(self.capacity);
    }

    /// Keep only items matching the predicate. Returns how many were dropped.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let original_len = self.items.len();
        self.items.retain(keep);
        original_len - self.items.len()
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A [`BoundedList`] stored as a whole under one storage key
///
/// Every mutation is a full read-modify-write of the stored value. Nothing
/// guards against two in-flight updates interleaving; the last write wins.
#[derive(Debug, Clone, Copy)]
pub struct PersistedList<T> {
    key: &'static str,
    capacity: usize,
    _item: PhantomData<fn() -> T>,
}

impl<T> PersistedList<T>
where
    T: Serialize + DeserializeOwned,
{
    pub const fn new(key: &'static str, capacity: usize) -> Self {
        PersistedList {
            key,
            capacity,
            _item: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Read the stored list; a missing key is an empty list
    pub async fn load<S: StorageArea>(&self, store: &S) -> Result<BoundedList<T>> {
        let items = match store.get(self.key).await? {
            Some(value) if !value.is_null() => serde_json::from_value(value)?,
            _ => Vec::new(),
        };
        Ok(BoundedList::from_vec(items, self.capacity))
    }

    /// Overwrite the stored list with `items`
    pub async fn store<S: StorageArea>(&self, store: &S, items: &[T]) -> Result<()> {
        let value = serde_json::to_value(items)?;
        store.set(self.key, value).await?;
        Ok(())
    }

    /// Load, apply `change`, write back once. Returns whatever `change` returns.
    pub async fn modify<S, F, R>(&self, store: &S, change: F) -> Result<R>
    where
        S: StorageArea,
        F: FnOnce(&mut BoundedList<T>) -> R,
    {
        let mut list = self.load(store).await?;
        let outcome = change(&mut list);
        self.store(store, list.items()).await?;
        Ok(outcome)
    }
}
