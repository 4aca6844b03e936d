//! Cached lists with in-memory pagination and reconcile-on-response updates.
//!
//! A mutation first patches (or removes) the cached entry and keeps a
//! [`Pending`] snapshot. Once the server answers, the entry is either replaced
//! by the server's version or restored from the snapshot.

use crate::models::{Category, Medicine, Order, User};

pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Medicine {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Order {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for User {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Category {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

#[must_use = "a pending change must be reconciled or rolled back"]
#[derive(Debug, Clone, PartialEq)]
pub enum Pending<T> {
    Patched { previous: T },
    Removed { index: usize, previous: T },
}

impl<T: Keyed> Pending<T> {
    pub fn key(&self) -> &str {
        match self {
            Pending::Patched { previous } | Pending::Removed { previous, .. } => previous.key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    items: Vec<T>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed + Clone> Listing<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Listing<T> {
        Listing::new(self.items.iter().filter(|item| predicate(*item)).cloned().collect())
    }

    /// Returns page `number` (1-based), clamped into the valid range.
    pub fn page(&self, number: usize, size: usize) -> Page<'_, T> {
        let size = size.max(1);
        let total_pages = self.items.len().div_ceil(size).max(1);
        let number = number.clamp(1, total_pages);
        let start = (number - 1) * size;
        let end = (start + size).min(self.items.len());
        Page {
            items: &self.items[start.min(end)..end],
            number,
            total_pages,
            total_items: self.items.len(),
        }
    }

    pub fn patch(&mut self, key: &str, f: impl FnOnce(&mut T)) -> Option<Pending<T>> {
        let item = self.items.iter_mut().find(|item| item.key() == key)?;
        let previous = item.clone();
        f(item);
        Some(Pending::Patched { previous })
    }

    pub fn remove(&mut self, key: &str) -> Option<Pending<T>> {
        let index = self.items.iter().position(|item| item.key() == key)?;
        let previous = self.items.remove(index);
        Some(Pending::Removed { index, previous })
    }

    /// Accepts the server's outcome of a pending change.
    pub fn reconcile(&mut self, pending: Pending<T>, server: Option<T>) {
        let key = pending.key().to_string();
        match (pending, server) {
            (Pending::Patched { .. }, Some(server)) => self.replace(&key, server),
            (Pending::Patched { .. }, None) | (Pending::Removed { .. }, _) => {}
        }
    }

    /// Restores the snapshot taken before a failed change.
    pub fn rollback(&mut self, pending: Pending<T>) {
        match pending {
            Pending::Patched { previous } => {
                let key = previous.key().to_string();
                self.replace(&key, previous);
            }
            Pending::Removed { index, previous } => {
                let index = index.min(self.items.len());
                self.items.insert(index, previous);
            }
        }
    }

    /// Replaces the entry with the same key, or appends `value`.
    pub fn upsert(&mut self, value: T) {
        let key = value.key().to_string();
        self.replace(&key, value);
    }

    fn replace(&mut self, key: &str, value: T) {
        match self.items.iter_mut().find(|item| item.key() == key) {
            Some(slot) => *slot = value,
            None => self.items.push(value),
        }
    }
}
