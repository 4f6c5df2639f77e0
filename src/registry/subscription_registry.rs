//! # Subscription Registry
//!
//! Ordered, append-only list of subscriptions extracted from route tables.
//!
//! ## Overview
//!
//! One registry belongs to one [`DaprDiscovery`](super::DaprDiscovery). It starts
//! empty and grows every time extraction runs; entries are never deduplicated,
//! reordered or removed. The discovery route handler holds a clone and serves
//! whatever the registry contains at request time.
//!
//! Clones share the same underlying list.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::subscription::SubscriptionEntry;

#[derive(Debug, Clone, Default)]
pub struct SubscriptionRegistry {
    entries: Arc<RwLock<Vec<SubscriptionEntry>>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entries in the order given
    pub fn extend(&self, entries: impl IntoIterator<Item = SubscriptionEntry>) {
        self.entries.write().extend(entries);
    }

    /// Copy of every entry, oldest first
    pub fn snapshot(&self) -> Vec<SubscriptionEntry> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        let entries = self.entries.read();
        let mut stats = RegistryStats {
            total_entries: entries.len(),
            ..RegistryStats::default()
        };

        for entry in entries.iter() {
            *stats
                .entries_per_pubsub
                .entry(entry.pubsub_name.clone())
                .or_insert(0) += 1;
        }

        stats
    }
}

/// Statistics about extracted subscriptions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_entries: usize,
    pub entries_per_pubsub: BTreeMap<String, usize>,
}
