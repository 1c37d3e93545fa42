//! Pluggable hash functions.
//!
//! A map only needs `key -> u64`. Closures and plain functions qualify
//! directly; any `BuildHasher` can be adapted with [`BuildHasherFn`].

use core::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::collections::hash_map::DefaultHasher;

/// Maps a key to a bucket-independent hash value.
///
/// Implementations must be deterministic for the lifetime of a map: the same
/// key (or a borrowed form of it) must always produce the same value.
pub trait HashFn<Q: ?Sized> {
    fn hash_key(&self, key: &Q) -> u64;
}

impl<Q, F> HashFn<Q> for F
where
    Q: ?Sized,
    F: Fn(&Q) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        self(key)
    }
}

/// Adapts a [`BuildHasher`] into a [`HashFn`] for every `Hash` key.
#[derive(Copy, Clone, Debug, Default)]
pub struct BuildHasherFn<S>(pub S);

impl<Q, S> HashFn<Q> for BuildHasherFn<S>
where
    Q: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        self.0.hash_one(key)
    }
}

/// SipHash with fixed keys: content based and identical across map instances.
pub type DefaultHashFn = BuildHasherFn<BuildHasherDefault<DefaultHasher>>;
