//! A bounded cache of compiled layouts keyed by format string.
//!
//! The cache never holds more than its capacity. When an insertion would
//! exceed it, every entry is dropped first and the new layout is inserted
//! into the empty cache; there is no per-entry eviction order.
//!
//! Layouts are handed out as [`Arc<Layout>`], so a layout stays valid for its
//! holder even after the cache has been cleared.
//!
//! ## Examples
//!
//! ```rust
//! use finstruct::LayoutCache;
//! use std::sync::Arc;
//!
//! let cache = LayoutCache::new();
//! let a = cache.get_or_compile("HHI").unwrap();
//! let b = cache.get_or_compile("HHI").unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//!
//! cache.clear();
//! assert!(cache.is_empty());
//! assert_eq!(a.size(), 8);
//! ```

use crate::{FormatError, Layout};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;

/// Default number of layouts kept by a cache.
pub const DEFAULT_CAPACITY: usize = 100;

static GLOBAL: OnceLock<LayoutCache> = OnceLock::new();

/// A thread-safe, bounded map from format string to compiled layout.
///
/// A lookup and the compile-and-insert that follows a miss happen under one
/// lock, so concurrent callers never compile the same format twice and a
/// clear cannot interleave with an insertion.
#[derive(Debug)]
pub struct LayoutCache {
    capacity: usize,
    entries: Mutex<HashMap<String, Arc<Layout>>>,
}

impl LayoutCache {
    /// Creates an empty cache holding at most [`DEFAULT_CAPACITY`] layouts.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty cache holding at most `capacity` layouts.
    ///
    /// A capacity of zero disables caching: every call compiles afresh.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        LayoutCache {
            capacity,
            entries: Mutex::new(HashMap::with_capacity(capacity.min(DEFAULT_CAPACITY))),
        }
    }

    /// The process-wide cache used by the crate-level convenience functions.
    /// Created on first use.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    // Entries are only ever replaced whole, so a poisoned map is still valid.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Layout>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached layout for `format`, compiling and caching it on a miss.
    ///
    /// # Errors
    ///
    /// Returns the [`FormatError`] from compilation. Nothing is inserted on
    /// failure.
    pub fn get_or_compile(&self, format: &str) -> Result<Arc<Layout>, FormatError> {
        let mut entries = self.lock();
        if let Some(layout) = entries.get(format) {
            return Ok(Arc::clone(layout));
        }

        debug!(format, "layout cache miss");
        let layout = Arc::new(Layout::compile(format)?);
        if self.capacity == 0 {
            return Ok(layout);
        }
        if entries.len() >= self.capacity {
            debug!(
                evicted = entries.len(),
                capacity = self.capacity,
                "layout cache full, clearing"
            );
            entries.clear();
        }
        entries.insert(format.to_string(), Arc::clone(&layout));
        Ok(layout)
    }

    /// Returns the cached layout for `format` without compiling.
    #[must_use]
    pub fn get(&self, format: &str) -> Option<Arc<Layout>> {
        self.lock().get(format).cloned()
    }

    #[must_use]
    pub fn contains(&self, format: &str) -> bool {
        self.lock().contains_key(format)
    }

    /// Drops every cached layout.
    pub fn clear(&self) {
        let mut entries = self.lock();
        debug!(evicted = entries.len(), "layout cache cleared");
        entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}
