//! Iterators over [`ChainedHashMap`](crate::ChainedHashMap).
//!
//! All of them walk buckets in index order and each chain front to back.
//! Borrowing iterators are one-shot; call the producing method again to
//! restart.

use crate::bucket_store::{BucketStore, ChainIter, Drain};
use crate::chained_hash_map::Entry;
use core::iter::FusedIterator;

pub struct Items<'a, K, V> {
    buckets: &'a BucketStore<Entry<K, V>>,
    bucket: usize,
    chain: Option<ChainIter<'a, Entry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Items<'a, K, V> {
    pub(crate) fn new(buckets: &'a BucketStore<Entry<K, V>>) -> Self {
        Self {
            buckets,
            bucket: 0,
            chain: None,
            remaining: buckets.len(),
        }
    }
}

impl<'a, K, V> Iterator for Items<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        // Nothing left: skip the trailing empty buckets.
        if self.remaining == 0 {
            return None;
        }
        loop {
            if let Some((_, e)) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            if self.chain.is_some() {
                self.bucket += 1;
            }
            if self.bucket >= self.buckets.bucket_count() {
                return None;
            }
            self.chain = Some(self.buckets.chain(self.bucket));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Items<'_, K, V> {}
impl<K, V> FusedIterator for Items<'_, K, V> {}

impl<K, V> Clone for Items<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets,
            bucket: self.bucket,
            chain: self.chain.clone(),
            remaining: self.remaining,
        }
    }
}

pub struct Keys<'a, K, V> {
    inner: Items<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: Items<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    inner: Items<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(inner: Items<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

/// Owning iterator; entries come out in the same order [`Items`] yields them.
pub struct IntoIter<K, V> {
    drain: Drain<Entry<K, V>>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(drain: Drain<Entry<K, V>>) -> Self {
        Self { drain }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.drain.next().map(|e| (e.key, e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.drain.remaining();
        (n, Some(n))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}
