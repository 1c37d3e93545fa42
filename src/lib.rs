//! chained-hashmap: a single-threaded hash map that resolves collisions by
//! separate chaining and grows by doubling once a load factor is exceeded.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the algorithm (hashing, chain scans, rehash) apart from the
//!   storage of chains so each layer has a small contract.
//! - Layers:
//!   - BucketStore<T>: an array of doubly linked chains whose nodes live in
//!     one `slotmap` arena. Append, unlink, walk, relink. No hashing, no key
//!     comparison.
//!   - ChainedHashMap<K, V, H>: picks the bucket (`hash % capacity`), scans
//!     it with `K: Eq`, and enforces the load factor after each new key.
//!
//! Constraints
//! - Keys are unique; `set` on an existing key overwrites in place.
//! - `len / capacity <= load_factor` whenever `set` returns.
//! - Every entry is linked into bucket `hash % capacity` for the current
//!   capacity. Capacity only grows, except that `clear` restores the
//!   initial capacity.
//! - Iteration order: buckets by index, each chain in insertion order.
//!
//! Hasher and rehashing invariants
//! - The hash function is any `HashFn<K>`: closures `Fn(&K) -> u64`, or a
//!   `BuildHasher` wrapped in `BuildHasherFn`. The default is SipHash with
//!   fixed keys, so equal keys hash alike across maps.
//! - Each entry stores the `u64` its key hashed to at insertion. Growth
//!   recomputes `stored_hash % new_capacity` for every entry and relinks the
//!   arena nodes into a fresh chain array; values never move and no user code
//!   runs, so a resize cannot stop halfway.
//! - The grown bucket count is computed before a new entry is linked. Load
//!   factors below `MIN_LOAD_FACTOR` are rejected at construction so that
//!   count stays bounded.
//!
//! Reentrancy policy
//! - User code (hash function, `K: Eq`) only runs while the structure is
//!   consistent and before any mutation. A debug-only guard panics if that
//!   code re-enters the same map.
//!
//! Notes and non-goals
//! - Single-threaded. No interior locking; wrap the map in one lock if it
//!   must be shared.
//! - No shrinking, no open addressing, no tombstones.

mod bucket_store;
mod chained_hash_map;
#[cfg(test)]
mod chained_hash_map_proptest;
pub mod config;
pub mod error;
pub mod hash_fn;
pub mod iter;
mod reentrancy;

// Public surface
pub use chained_hash_map::ChainedHashMap;
pub use config::{MapConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_LOAD_FACTOR, MIN_LOAD_FACTOR};
pub use error::{ConfigError, MapError};
pub use hash_fn::{BuildHasherFn, DefaultHashFn, HashFn};
