//! In-memory render cache
//!
//! Rendered formulas are memoized by normalized content plus display flag.
//! Entries live for the lifetime of the renderer that owns the cache and
//! are only dropped by capacity eviction or an explicit clear.
//!
//! # Eviction
//!
//! | Event | Effect |
//! |-------|--------|
//! | Insert new key under capacity | Appended as newest |
//! | Insert existing key | Moved to newest, value replaced |
//! | Insert past capacity | Oldest-inserted entry dropped |
//! | Lookup | Order unchanged |

pub mod formula;

pub use formula::{cache_key, CacheStats, CachedFormula, FormulaCache};
