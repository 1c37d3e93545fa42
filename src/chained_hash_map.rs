//! ChainedHashMap: separate chaining over a [`BucketStore`] with load-factor
//! driven doubling.

use crate::bucket_store::{BucketStore, NodeId};
use crate::config::MapConfig;
use crate::error::MapError;
use crate::hash_fn::{DefaultHashFn, HashFn};
use crate::iter::{IntoIter, Items, Keys, Values};
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use core::ops::Index;

#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    // Output of the hash function at insertion; bucket = hash % capacity.
    pub(crate) hash: u64,
}

/// A hash map resolving collisions with per-bucket chains.
///
/// Buckets are addressed by `hash(key) % capacity`. After every insertion of
/// a new key the map checks `len / capacity` against the configured load
/// factor and, when it is exceeded, doubles capacity (repeatedly if needed)
/// and relinks every entry into its new bucket before returning. Capacity
/// never shrinks except through [`clear`](Self::clear), which restores the
/// initial capacity.
///
/// Iteration walks buckets in index order and each chain in insertion order.
/// The borrow checker rules out mutating the map during a traversal.
pub struct ChainedHashMap<K, V, H = DefaultHashFn> {
    hash_fn: H,
    buckets: BucketStore<Entry<K, V>>,
    config: MapConfig,
    reentrancy: DebugReentrancy,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Empty map with [`MapConfig::default`] and the default hash function.
    pub fn new() -> Self {
        Self::from_valid_config(MapConfig::default(), DefaultHashFn::default())
    }

    pub fn try_new(initial_capacity: usize, load_factor: f64) -> Result<Self, MapError> {
        Self::with_config(
            MapConfig::new()
                .with_initial_capacity(initial_capacity)
                .with_load_factor(load_factor),
        )
    }

    pub fn with_config(config: MapConfig) -> Result<Self, MapError> {
        Self::with_hash_fn(config, DefaultHashFn::default())
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> ChainedHashMap<K, V, H>
where
    K: Eq,
    H: HashFn<K>,
{
    /// Map using `hash_fn` in place of the default content hash.
    pub fn with_hash_fn(config: MapConfig, hash_fn: H) -> Result<Self, MapError> {
        config.validate()?;
        Ok(Self::from_valid_config(config, hash_fn))
    }

    fn from_valid_config(config: MapConfig, hash_fn: H) -> Self {
        Self {
            hash_fn,
            buckets: BucketStore::with_buckets(config.initial_capacity),
            config,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Inserts or overwrites. Returns the previous value for an existing key.
    ///
    /// Overwriting keeps the entry in place and never resizes. A new key is
    /// appended to its bucket's chain, then the load factor is enforced.
    ///
    /// # Panics
    ///
    /// Panics, leaving the map unchanged, if the grown bucket count would
    /// overflow `usize`.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let (hash, bucket, existing) = {
            let _g = self.reentrancy.enter("set");
            let hash = HashFn::<K>::hash_key(&self.hash_fn, &key);
            let bucket = self.bucket_of(hash);
            (hash, bucket, self.find_in(bucket, &key))
        };

        if let Some(entry) = existing.and_then(|node| self.buckets.get_mut(node)) {
            return Some(core::mem::replace(&mut entry.value, value));
        }

        let from = self.buckets.bucket_count();
        let len = self.buckets.len() + 1;
        let capacity = match grown_capacity(len, from, self.config.load_factor) {
            Some(capacity) => capacity,
            None => panic!("ChainedHashMap capacity overflow"),
        };
        self.buckets.append(bucket, Entry { key, value, hash });
        if capacity != from {
            self.buckets
                .redistribute(capacity, |e| bucket_index(e.hash, capacity));
            tracing::debug!(from, to = capacity, len, "chained hash map grew");
        }
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: HashFn<Q>,
    {
        let _g = self.reentrancy.enter("get");
        let (_, node) = self.locate(key);
        node.and_then(|n| self.buckets.get(n))
            .map(|e| &e.value)
            .ok_or(MapError::KeyNotFound)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: HashFn<Q>,
    {
        let (_, node) = {
            let _g = self.reentrancy.enter("get_mut");
            self.locate(key)
        };
        node.and_then(|n| self.buckets.get_mut(n))
            .map(|e| &mut e.value)
            .ok_or(MapError::KeyNotFound)
    }

    /// Removes `key` and returns its value. A missing key leaves the map
    /// untouched. Capacity is never reduced.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: HashFn<Q>,
    {
        let (bucket, node) = {
            let _g = self.reentrancy.enter("delete");
            self.locate(key)
        };
        let node = node.ok_or(MapError::KeyNotFound)?;
        self.buckets
            .remove(bucket, node)
            .map(|e| e.value)
            .ok_or(MapError::KeyNotFound)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: HashFn<Q>,
    {
        let _g = self.reentrancy.enter("contains");
        self.locate(key).1.is_some()
    }

    fn locate<Q>(&self, key: &Q) -> (usize, Option<NodeId>)
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: HashFn<Q>,
    {
        let hash = HashFn::<Q>::hash_key(&self.hash_fn, key);
        let bucket = self.bucket_of(hash);
        (bucket, self.find_in(bucket, key))
    }
}

impl<K, V, H> ChainedHashMap<K, V, H> {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.len() == 0
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.bucket_count()
    }

    /// Configured growth threshold.
    pub fn load_factor(&self) -> f64 {
        self.config.load_factor
    }

    /// `len / capacity` right now.
    pub fn current_load(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Chain length of every bucket, in bucket order. Useful for judging a
    /// custom hash function's spread.
    pub fn chain_lengths(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        (0..self.buckets.bucket_count()).map(|b| self.buckets.chain_len(b))
    }

    /// Drops every entry and returns to the initial capacity.
    pub fn clear(&mut self) {
        let dropped = self.buckets.len();
        self.buckets.reset(self.config.initial_capacity);
        tracing::trace!(
            dropped,
            capacity = self.config.initial_capacity,
            "chained hash map cleared"
        );
    }

    /// Entries in bucket order, each chain in insertion order.
    pub fn items(&self) -> Items<'_, K, V> {
        Items::new(&self.buckets)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.items())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.items())
    }

    fn bucket_of(&self, hash: u64) -> usize {
        bucket_index(hash, self.buckets.bucket_count())
    }

    fn find_in<Q>(&self, bucket: usize, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.buckets
            .chain(bucket)
            .find(|(_, e)| e.key.borrow() == key)
            .map(|(node, _)| node)
    }

    #[cfg(test)]
    pub(crate) fn buckets(&self) -> &BucketStore<Entry<K, V>> {
        &self.buckets
    }
}

#[inline]
fn bucket_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

#[inline]
fn exceeds_load(len: usize, capacity: usize, load_factor: f64) -> bool {
    len as f64 / capacity as f64 > load_factor
}

/// Bucket count that holds `len` entries within `load_factor`, reached by
/// doubling `capacity`. `None` if doubling overflows `usize`.
fn grown_capacity(len: usize, capacity: usize, load_factor: f64) -> Option<usize> {
    let mut capacity = capacity;
    while exceeds_load(len, capacity, load_factor) {
        capacity = capacity.checked_mul(2)?;
    }
    Some(capacity)
}

impl<K, V, H: Clone> Clone for ChainedHashMap<K, V, H>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            hash_fn: self.hash_fn.clone(),
            buckets: self.buckets.clone(),
            config: self.config,
            reentrancy: DebugReentrancy::new(),
        }
    }
}

/// Content equality: same key set, equal values. Capacity, bucket layout,
/// insertion order and hash function are irrelevant.
impl<K, V, H, H2> PartialEq<ChainedHashMap<K, V, H2>> for ChainedHashMap<K, V, H>
where
    K: Eq,
    V: PartialEq,
    H2: HashFn<K>,
{
    fn eq(&self, other: &ChainedHashMap<K, V, H2>) -> bool {
        self.len() == other.len()
            && self
                .items()
                .all(|(k, v)| other.get(k).is_ok_and(|ov| v == ov))
    }
}

impl<K, V, H> Eq for ChainedHashMap<K, V, H>
where
    K: Eq,
    V: Eq,
    H: HashFn<K>,
{
}

impl<K, V, H> fmt::Debug for ChainedHashMap<K, V, H>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Entries<'a, K, V, H>(&'a ChainedHashMap<K, V, H>);

        impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for Entries<'_, K, V, H> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.0.items()).finish()
            }
        }

        f.debug_tuple("ChainedHashMap").field(&Entries(self)).finish()
    }
}

/// `{k1: v1, k2: v2}` in iteration order.
impl<K, V, H> fmt::Display for ChainedHashMap<K, V, H>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.items().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        f.write_str("}")
    }
}

impl<K, Q, V, H> Index<&Q> for ChainedHashMap<K, V, H>
where
    K: Eq + Borrow<Q>,
    Q: ?Sized + Eq,
    H: HashFn<K> + HashFn<Q>,
{
    type Output = V;

    /// Panics if `key` is absent.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Ok(v) => v,
            Err(_) => panic!("key not found in ChainedHashMap"),
        }
    }
}

impl<K, V, H> Extend<(K, V)> for ChainedHashMap<K, V, H>
where
    K: Eq,
    H: HashFn<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, H> IntoIterator for &'a ChainedHashMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Items<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items()
    }
}

impl<K, V, H> IntoIterator for ChainedHashMap<K, V, H> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.buckets.into_drain())
    }
}
