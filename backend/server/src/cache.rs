//! # Tab Row Cache
//!
//! One entry per tab, each holding the rows fetched for it and when.
//!
//! - Entries go stale [`CACHE_TTL`] after they were written
//! - Expiry is only checked on read, a stale entry is dropped by the read that finds it
//! - No capacity bound, at most one entry per [`Tab`]
//!
//! The map sits behind a mutex that is never held while fetching. Two requests
//! missing the same tab at once both fetch and the later write wins. Fetches are
//! idempotent and entries are swapped as whole `Arc`s, so readers never see a
//! partial row list.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use catalog::Tab;
use tracing::debug;

use crate::database::Rows;

pub const CACHE_TTL: Duration = Duration::from_secs(60);

struct Entry {
    written_at: Instant,
    rows: Rows,
}

pub struct TabCache {
    ttl: Duration,
    entries: Mutex<HashMap<Tab, Entry>>,
}

impl TabCache {
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, tab: Tab) -> Option<Rows> {
        self.get_at(tab, Instant::now())
    }

    pub fn put(&self, tab: Tab, rows: Rows) {
        self.put_at(tab, rows, Instant::now());
    }

    /// Returns the cached rows for `tab`, or runs `fetch` and caches its result.
    ///
    /// Failed fetches are not cached.
    pub fn get_or_try_insert_with<E>(
        &self,
        tab: Tab,
        fetch: impl FnOnce() -> Result<Rows, E>,
    ) -> Result<Rows, E> {
        if let Some(rows) = self.get(tab) {
            return Ok(rows);
        }

        debug!("Cache miss for tab {tab}");
        let rows = fetch()?;
        self.put(tab, rows.clone());

        Ok(rows)
    }

    fn get_at(&self, tab: Tab, now: Instant) -> Option<Rows> {
        let mut entries = self.lock();

        let entry = entries.get(&tab)?;
        if now.saturating_duration_since(entry.written_at) > self.ttl {
            entries.remove(&tab);
            return None;
        }

        Some(entry.rows.clone())
    }

    fn put_at(&self, tab: Tab, rows: Rows, now: Instant) {
        self.lock().insert(
            tab,
            Entry {
                written_at: now,
                rows,
            },
        );
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Tab, Entry>> {
        // entries are only ever inserted or removed whole
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for TabCache {
    fn default() -> Self {
        Self::new()
    }
}
