//! # render-cache
//!
//! A process-wide registry of lazily-initialized, memory-sensitive caches
//! for derived render artifacts.
//!
//! Many independent subsystems each keep a named cache of expensive-to-build
//! artifacts (rendered images keyed by a composite descriptor, for example)
//! without coordinating eviction policy, memory-pressure response, or
//! cross-cache reporting themselves.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     CacheDirectory                        │
//! │   registry of every live cache: reset_all() / stats()     │
//! ├───────────────────────────────────────────────────────────┤
//! │  NamedCache "button images"   NamedCache "border glyphs"  │
//! │  ├── instance lock            ├── instance lock           │
//! │  └── MemorySensitiveMap       └── (unallocated until      │
//! │      (LRU, byte budget)            the first put)         │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! The hot path (get/put) takes only the owning cache's instance lock;
//! the directory lock is touched solely by registration, `reset_all` and
//! `stats`.
//!
//! ## Quick Start
//!
//! ```
//! use render_cache::{CacheDirectory, CompositeKey, NamedCache};
//!
//! let directory = CacheDirectory::new();
//!
//! // One long-lived cache per subsystem
//! let images: NamedCache<CompositeKey, &str> = NamedCache::new("button images", &directory);
//!
//! let mut key = CompositeKey::new();
//! key.add(&"button.background");
//! key.add(&(120u32, 28u32));
//!
//! images.put(key.clone(), "pixels");
//! assert_eq!(images.get(&key), Some("pixels"));
//!
//! // Process-wide operations need no cache references
//! for line in directory.stats() {
//!     println!("{line}");
//! }
//! directory.reset_all();
//! assert!(images.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`cache`] - named, lazily-backed caches
//! - [`directory`] - registry of all live caches
//! - [`store`] - the memory-sensitive backing store
//! - [`key`] - composite cache-key utilities
//! - [`config`] - store budgets
//! - [`error`] - configuration errors

pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod key;
pub mod store;

// Re-exports for convenience
pub use cache::NamedCache;
pub use config::CacheConfig;
pub use directory::CacheDirectory;
pub use error::{Error, Result};
pub use key::{compute_hash, hash_json, CompositeKey};
pub use store::{MapStats, MemoryPressure, MemorySensitiveMap};
