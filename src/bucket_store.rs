//! BucketStore: an array of doubly linked chains whose nodes live in one
//! generational arena.
//!
//! Chains never own raw pointers. Each node records the slot keys of its
//! neighbours and each bucket records its head, tail and length. The store
//! knows nothing about hashing or keys; callers pick the bucket.

use slotmap::{DefaultKey, SlotMap};

/// Stable identifier of a node while it stays in the store.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct NodeId(DefaultKey);

#[derive(Clone, Debug)]
struct Node<T> {
    value: T,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

#[derive(Copy, Clone, Debug, Default)]
struct Chain {
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
    len: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct BucketStore<T> {
    nodes: SlotMap<DefaultKey, Node<T>>,
    chains: Vec<Chain>,
}

impl<T> BucketStore<T> {
    pub(crate) fn with_buckets(count: usize) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            chains: vec![Chain::default(); count],
        }
    }

    pub(crate) fn bucket_count(&self) -> usize {
        self.chains.len()
    }

    /// Total number of nodes across all chains.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn chain_len(&self, bucket: usize) -> usize {
        self.chains[bucket].len
    }

    pub(crate) fn append(&mut self, bucket: usize, value: T) -> NodeId {
        let k = self.nodes.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.link_back(bucket, k);
        NodeId(k)
    }

    /// Unlinks `node` from `bucket` and hands back its value.
    ///
    /// `node` must belong to `bucket`; a node from another chain would leave
    /// both chains inconsistent.
    pub(crate) fn remove(&mut self, bucket: usize, node: NodeId) -> Option<T> {
        let removed = self.nodes.remove(node.0)?;
        let chain = &mut self.chains[bucket];
        debug_assert!(removed.prev.is_some() || chain.head == Some(node.0));
        debug_assert!(removed.next.is_some() || chain.tail == Some(node.0));

        match removed.prev {
            Some(p) => self.nodes[p].next = removed.next,
            None => chain.head = removed.next,
        }
        match removed.next {
            Some(n) => self.nodes[n].prev = removed.prev,
            None => chain.tail = removed.prev,
        }
        chain.len -= 1;
        Some(removed.value)
    }

    pub(crate) fn get(&self, node: NodeId) -> Option<&T> {
        self.nodes.get(node.0).map(|n| &n.value)
    }

    pub(crate) fn get_mut(&mut self, node: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(node.0).map(|n| &mut n.value)
    }

    /// Front-to-back walk over one bucket.
    pub(crate) fn chain(&self, bucket: usize) -> ChainIter<'_, T> {
        let chain = self.chains[bucket];
        ChainIter {
            nodes: &self.nodes,
            cursor: chain.head,
            remaining: chain.len,
        }
    }

    /// Replaces the chain array with `bucket_count` empty chains and relinks
    /// every node into the bucket chosen by `index_of`.
    ///
    /// Old buckets are visited in index order and each chain front to back, so
    /// nodes landing in the same new bucket keep their relative order. Values
    /// never move; only links change.
    pub(crate) fn redistribute<F>(&mut self, bucket_count: usize, mut index_of: F)
    where
        F: FnMut(&T) -> usize,
    {
        let mut order = Vec::with_capacity(self.nodes.len());
        for chain in &self.chains {
            let mut cursor = chain.head;
            while let Some(k) = cursor {
                order.push(k);
                cursor = self.nodes[k].next;
            }
        }

        self.chains = vec![Chain::default(); bucket_count];
        for k in order {
            let bucket = index_of(&self.nodes[k].value);
            debug_assert!(bucket < bucket_count);
            self.link_back(bucket, k);
        }
    }

    /// Drops every node and starts over with `bucket_count` empty chains.
    pub(crate) fn reset(&mut self, bucket_count: usize) {
        self.nodes.clear();
        self.chains = vec![Chain::default(); bucket_count];
    }

    /// Owned traversal in bucket order, each chain front to back.
    pub(crate) fn into_drain(self) -> Drain<T> {
        Drain {
            store: self,
            bucket: 0,
        }
    }

    fn link_back(&mut self, bucket: usize, k: DefaultKey) {
        let tail = self.chains[bucket].tail;
        {
            let node = &mut self.nodes[k];
            node.prev = tail;
            node.next = None;
        }
        match tail {
            Some(t) => self.nodes[t].next = Some(k),
            None => self.chains[bucket].head = Some(k),
        }
        let chain = &mut self.chains[bucket];
        chain.tail = Some(k);
        chain.len += 1;
    }
}

pub(crate) struct ChainIter<'a, T> {
    nodes: &'a SlotMap<DefaultKey, Node<T>>,
    cursor: Option<DefaultKey>,
    remaining: usize,
}

impl<T> Clone for ChainIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for ChainIter<'a, T> {
    type Item = (NodeId, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let nodes = self.nodes;
        let node = &nodes[k];
        self.cursor = node.next;
        self.remaining -= 1;
        Some((NodeId(k), &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

pub(crate) struct Drain<T> {
    store: BucketStore<T>,
    bucket: usize,
}

impl<T> Drain<T> {
    pub(crate) fn remaining(&self) -> usize {
        self.store.len()
    }
}

impl<T> Iterator for Drain<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while self.bucket < self.store.bucket_count() {
            if let Some(head) = self.store.chains[self.bucket].head {
                return self.store.remove(self.bucket, NodeId(head));
            }
            self.bucket += 1;
        }
        None
    }
}
