//! RawChain: arena-backed singly-linked chain primitives.
//!
//! Nodes live in a `SlotMap` and link to each other through generational
//! `NodeKey`s. A chain is only its `Links` (head, tail, len); the arena is
//! passed in by the owner. This lets `ChainedList` own one arena per list
//! while `HashTable` shares one arena across every bucket and relocates
//! nodes between chains on rehash without touching their payloads.

use crate::error::TableError;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Generational key of a chain node inside its arena.
    pub(crate) struct NodeKey;
}

#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    next: Option<NodeKey>,
}

pub(crate) type NodePool<T> = SlotMap<NodeKey, Node<T>>;

/// Make room for `additional` more nodes so the next inserts cannot reallocate.
pub(crate) fn reserve_nodes<T>(
    pool: &mut NodePool<T>,
    additional: usize,
) -> Result<(), TableError> {
    pool.try_reserve(additional)?;
    Ok(())
}

fn alloc_node<T>(pool: &mut NodePool<T>, node: Node<T>) -> Result<NodeKey, TableError> {
    reserve_nodes(pool, 1)?;
    Ok(pool.insert(node))
}

/// Head/tail bookkeeping for one chain.
///
/// Invariants: `len == 0` iff `head` and `tail` are both `None`; the tail's
/// `next` is always `None`; walking from `head` reaches `tail` in `len - 1`
/// steps. Not `Clone`: two `Links` sharing nodes would alias.
#[derive(Debug, Default)]
pub(crate) struct Links {
    head: Option<NodeKey>,
    tail: Option<NodeKey>,
    len: usize,
}

impl Links {
    pub(crate) const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn front<'p, T>(&self, pool: &'p NodePool<T>) -> Option<&'p T> {
        self.head.map(|k| &pool[k].value)
    }

    pub(crate) fn back<'p, T>(&self, pool: &'p NodePool<T>) -> Option<&'p T> {
        self.tail.map(|k| &pool[k].value)
    }

    pub(crate) fn front_mut<'p, T>(&self, pool: &'p mut NodePool<T>) -> Option<&'p mut T> {
        match self.head {
            Some(k) => Some(&mut pool[k].value),
            None => None,
        }
    }

    pub(crate) fn back_mut<'p, T>(&self, pool: &'p mut NodePool<T>) -> Option<&'p mut T> {
        match self.tail {
            Some(k) => Some(&mut pool[k].value),
            None => None,
        }
    }

    /// On allocation failure the chain is unchanged and `value` is dropped.
    pub(crate) fn push_front<T>(
        &mut self,
        pool: &mut NodePool<T>,
        value: T,
    ) -> Result<NodeKey, TableError> {
        let k = alloc_node(pool, Node { value, next: None })?;
        self.link_front(pool, k);
        Ok(k)
    }

    pub(crate) fn push_back<T>(
        &mut self,
        pool: &mut NodePool<T>,
        value: T,
    ) -> Result<NodeKey, TableError> {
        let k = alloc_node(pool, Node { value, next: None })?;
        self.link_back(pool, k);
        Ok(k)
    }

    pub(crate) fn pop_front<T>(&mut self, pool: &mut NodePool<T>) -> Option<T> {
        let k = self.unlink_front(pool)?;
        pool.remove(k).map(|n| n.value)
    }

    /// Link an already-allocated, currently unlinked node at the front.
    pub(crate) fn link_front<T>(&mut self, pool: &mut NodePool<T>, k: NodeKey) {
        pool[k].next = self.head;
        if self.tail.is_none() {
            self.tail = Some(k);
        }
        self.head = Some(k);
        self.len += 1;
    }

    /// Link an already-allocated, currently unlinked node at the back.
    pub(crate) fn link_back<T>(&mut self, pool: &mut NodePool<T>, k: NodeKey) {
        pool[k].next = None;
        match self.tail {
            Some(t) => pool[t].next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
        self.len += 1;
    }

    /// Detach the first node from the chain without freeing it.
    pub(crate) fn unlink_front<T>(&mut self, pool: &mut NodePool<T>) -> Option<NodeKey> {
        let k = self.head?;
        self.head = pool[k].next.take();
        self.len -= 1;
        if self.head.is_none() {
            self.tail = None;
        }
        Some(k)
    }

    /// Walk the chain and check the structural invariants. Test-only.
    #[cfg(test)]
    pub(crate) fn assert_consistent<T>(&self, pool: &NodePool<T>) {
        assert_eq!(self.len == 0, self.head.is_none(), "len/head mismatch");
        assert_eq!(self.len == 0, self.tail.is_none(), "len/tail mismatch");
        let mut steps = 0;
        let mut last = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            steps += 1;
            last = Some(k);
            cur = pool[k].next;
        }
        assert_eq!(steps, self.len, "reachable node count differs from len");
        assert_eq!(last, self.tail, "walk does not end at tail");
    }
}

/// Position inside one chain: the node under the cursor plus its predecessor.
///
/// `current == None` is the end marker. At the end, `prev` is the tail (or
/// `None` for an empty chain), so an insert there is an append.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawCursor {
    prev: Option<NodeKey>,
    current: Option<NodeKey>,
}

impl RawCursor {
    pub(crate) fn start(links: &Links) -> Self {
        Self {
            prev: None,
            current: links.head,
        }
    }

    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.current.is_none()
    }

    pub(crate) fn advance<T>(&mut self, pool: &NodePool<T>) -> bool {
        match self.current {
            Some(k) => {
                self.prev = Some(k);
                self.current = pool[k].next;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub(crate) fn current_key(&self) -> Option<NodeKey> {
        self.current
    }

    pub(crate) fn current<'p, T>(&self, pool: &'p NodePool<T>) -> Option<&'p T> {
        self.current.map(|k| &pool[k].value)
    }

    pub(crate) fn current_mut<'p, T>(&self, pool: &'p mut NodePool<T>) -> Option<&'p mut T> {
        match self.current {
            Some(k) => Some(&mut pool[k].value),
            None => None,
        }
    }

    /// Insert `value` before the current node; the cursor then points at it.
    /// At the end marker this appends to the chain. On allocation failure
    /// neither the chain nor the cursor moves.
    pub(crate) fn insert<T>(
        &mut self,
        links: &mut Links,
        pool: &mut NodePool<T>,
        value: T,
    ) -> Result<(), TableError> {
        let k = alloc_node(
            pool,
            Node {
                value,
                next: self.current,
            },
        )?;
        match self.prev {
            Some(p) => pool[p].next = Some(k),
            None => links.head = Some(k),
        }
        if self.current.is_none() {
            links.tail = Some(k);
        }
        links.len += 1;
        self.current = Some(k);
        Ok(())
    }

    /// Unlink and free the current node; the cursor moves to its follower.
    pub(crate) fn remove<T>(&mut self, links: &mut Links, pool: &mut NodePool<T>) -> Option<T> {
        let k = self.current?;
        let next = pool[k].next;
        match self.prev {
            Some(p) => pool[p].next = next,
            None => links.head = next,
        }
        if links.tail == Some(k) {
            links.tail = self.prev;
        }
        links.len -= 1;
        self.current = next;
        pool.remove(k).map(|n| n.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(links: &Links, pool: &NodePool<i32>) -> Vec<i32> {
        let mut out = Vec::new();
        let mut c = RawCursor::start(links);
        while let Some(v) = c.current(pool) {
            out.push(*v);
            c.advance(pool);
        }
        out
    }

    #[test]
    fn push_and_pop_keep_links_consistent() {
        let mut pool = NodePool::with_key();
        let mut l = Links::new();
        l.assert_consistent(&pool);

        l.push_back(&mut pool, 2).unwrap();
        l.push_front(&mut pool, 1).unwrap();
        l.push_back(&mut pool, 3).unwrap();
        l.assert_consistent(&pool);
        assert_eq!(collect(&l, &pool), vec![1, 2, 3]);

        assert_eq!(l.pop_front(&mut pool), Some(1));
        assert_eq!(l.pop_front(&mut pool), Some(2));
        assert_eq!(l.pop_front(&mut pool), Some(3));
        assert_eq!(l.pop_front(&mut pool), None);
        l.assert_consistent(&pool);
        assert!(pool.is_empty());
    }

    #[test]
    fn relink_between_chains_reuses_nodes() {
        let mut pool = NodePool::with_key();
        let mut a = Links::new();
        let mut b = Links::new();
        let k1 = a.push_back(&mut pool, 10).unwrap();
        let k2 = a.push_back(&mut pool, 20).unwrap();

        while let Some(k) = a.unlink_front(&mut pool) {
            b.link_front(&mut pool, k);
        }
        a.assert_consistent(&pool);
        b.assert_consistent(&pool);
        assert_eq!(collect(&b, &pool), vec![20, 10]);
        assert_eq!(pool.len(), 2);
        assert!(pool.contains_key(k1) && pool.contains_key(k2));
    }

    #[test]
    fn cursor_remove_last_moves_tail_back() {
        let mut pool = NodePool::with_key();
        let mut l = Links::new();
        for v in [1, 2, 3] {
            l.push_back(&mut pool, v).unwrap();
        }
        let mut c = RawCursor::start(&l);
        c.advance(&pool);
        c.advance(&pool);
        assert_eq!(c.remove(&mut l, &mut pool), Some(3));
        assert!(c.at_end());
        l.assert_consistent(&pool);
        assert_eq!(l.back(&pool), Some(&2));

        // Appending through the cursor at the end links after the new tail.
        c.insert(&mut l, &mut pool, 4).unwrap();
        l.assert_consistent(&pool);
        assert_eq!(collect(&l, &pool), vec![1, 2, 4]);
    }

    #[test]
    fn stale_node_key_does_not_resolve() {
        let mut pool = NodePool::with_key();
        let mut l = Links::new();
        let k = l.push_back(&mut pool, 1).unwrap();
        let _ = l.pop_front(&mut pool);
        let k2 = l.push_back(&mut pool, 2).unwrap();
        assert_ne!(k, k2);
        assert!(pool.get(k).is_none());
    }

    #[test]
    fn failed_node_reserve_reports_allocation_failure() {
        let mut pool: NodePool<i32> = NodePool::with_key();
        let mut l = Links::new();
        l.push_back(&mut pool, 1).unwrap();

        let err = reserve_nodes(&mut pool, usize::MAX / 2).unwrap_err();
        assert!(matches!(err, TableError::AllocationFailure(_)));
        l.assert_consistent(&pool);
        assert_eq!(pool.len(), 1);

        // A single-node reserve still succeeds and the chain keeps working.
        reserve_nodes(&mut pool, 1).unwrap();
        l.push_back(&mut pool, 2).unwrap();
        assert_eq!(collect(&l, &pool), vec![1, 2]);
    }
}
