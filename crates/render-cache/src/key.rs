//! Composite cache-key utilities
//!
//! Caches of rendered artifacts are keyed by a descriptor assembled from
//! several render inputs (widget identity, dimensions, color scheme, state).
//! [`CompositeKey`] builds such a descriptor from any sequence of hashable
//! parts without forcing callers to define a struct per cache.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a hash for any hashable value
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Compute a hash for a JSON value
///
/// Object members are hashed in sorted key order, so two documents that
/// differ only in member order hash identically.
pub fn hash_json(value: &serde_json::Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_json_into(value, &mut hasher);
    hasher.finish()
}

fn hash_json_into(value: &serde_json::Value, hasher: &mut DefaultHasher) {
    use serde_json::Value;

    match value {
        Value::Null => hasher.write_u8(b'n'),
        Value::Bool(b) => {
            hasher.write_u8(b'b');
            b.hash(hasher);
        }
        Value::Number(n) => {
            hasher.write_u8(b'd');
            n.to_string().hash(hasher);
        }
        Value::String(s) => {
            hasher.write_u8(b's');
            s.hash(hasher);
        }
        Value::Array(items) => {
            hasher.write_u8(b'a');
            hasher.write_usize(items.len());
            for item in items {
                hash_json_into(item, hasher);
            }
        }
        Value::Object(members) => {
            hasher.write_u8(b'o');
            hasher.write_usize(members.len());
            let mut sorted: Vec<_> = members.iter().collect();
            sorted.sort_by(|x, y| x.0.cmp(y.0));
            for (name, member) in sorted {
                name.hash(hasher);
                hash_json_into(member, hasher);
            }
        }
    }
}

/// A cache key assembled from heterogeneous descriptor parts
///
/// Each part is reduced to its hash, so parts of different types can be
/// mixed freely. Part order is significant: `[width, height]` and
/// `[height, width]` are different keys.
///
/// # Example
/// ```
/// use render_cache::CompositeKey;
///
/// let mut key = CompositeKey::new();
/// key.add(&"button.background");
/// key.add(&(120u32, 28u32));
/// key.add(&"dark");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    parts: Vec<u64>,
}

impl CompositeKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            parts: Vec::with_capacity(capacity),
        }
    }

    /// Append a hashable descriptor part
    pub fn add<T: Hash>(&mut self, part: &T) {
        self.parts.push(compute_hash(part));
    }

    /// Append a JSON-valued descriptor part (order-independent for objects)
    pub fn add_json(&mut self, part: &serde_json::Value) {
        self.parts.push(hash_json(part));
    }

    /// Number of descriptor parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Reduce the whole descriptor to a single hash
    pub fn fingerprint(&self) -> u64 {
        compute_hash(&self.parts)
    }
}
