//! Construction parameters for [`ChainedHashMap`].

use crate::chained_hash_map::ChainedHashMap;
use crate::error::{ConfigError, MapError};
use crate::hash_fn::{DefaultHashFn, HashFn};

/// Bucket count used when none is given.
pub const DEFAULT_INITIAL_CAPACITY: usize = 7;

/// Ratio of entries to buckets above which the map grows.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Smallest accepted load factor. A single entry then needs at most 2^20
/// buckets.
pub const MIN_LOAD_FACTOR: f64 = 1.0 / (1u64 << 20) as f64;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapConfig {
    /// Bucket count at construction and after `clear`.
    pub initial_capacity: usize,
    /// Growth triggers once `len / capacity` exceeds this.
    pub load_factor: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.load_factor.is_finite() || self.load_factor < MIN_LOAD_FACTOR {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor));
        }
        Ok(())
    }

    pub fn build<K, V>(self) -> Result<ChainedHashMap<K, V>, MapError>
    where
        K: Eq + core::hash::Hash,
    {
        ChainedHashMap::with_hash_fn(self, DefaultHashFn::default())
    }

    pub fn build_with_hash_fn<K, V, H>(self, hash_fn: H) -> Result<ChainedHashMap<K, V, H>, MapError>
    where
        K: Eq,
        H: HashFn<K>,
    {
        ChainedHashMap::with_hash_fn(self, hash_fn)
    }
}
