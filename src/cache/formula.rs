//! Bounded formula cache

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

/// Rendered markup for one (content, display) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFormula {
    /// Markup produced by the engine
    pub html: String,
    /// Whether the formula was rendered in display mode
    pub display_mode: bool,
}

/// Cache occupancy and hit counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Build the cache key for normalized content and a display flag
pub fn cache_key(content: &str, display_mode: bool) -> String {
    format!("{}|{}", content, display_mode)
}

/// Insertion-ordered cache of rendered formulas.
///
/// Eviction drops the oldest-inserted entry. Re-inserting a key moves it to
/// the newest position; lookups leave the order alone.
#[derive(Debug)]
pub struct FormulaCache {
    entries: IndexMap<String, CachedFormula>,
    max_size: usize,
    hits: u64,
    misses: u64,
}

impl FormulaCache {
    /// Create a cache holding at most `max_size` formulas (0 disables it)
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            max_size,
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a formula, counting the hit or miss
    pub fn get(&mut self, key: &str) -> Option<&CachedFormula> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits += 1;
                Some(entry)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Whether a key is cached, without touching the counters
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store a formula, evicting the oldest entries past capacity
    pub fn insert(&mut self, key: String, formula: CachedFormula) {
        if self.max_size == 0 {
            return;
        }

        self.entries.shift_remove(&key);
        self.entries.insert(key, formula);

        while self.entries.len() > self.max_size {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                debug!("Evicted cached formula {}", evicted);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and reset the counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            max_size: self.max_size,
            hits: self.hits,
            misses: self.misses,
        }
    }
}
