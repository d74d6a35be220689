//! HashTable: separate-chaining table from byte-string keys to values.

use crate::config::TableConfig;
use crate::djb2::BuildDjb2;
use crate::error::TableError;
use crate::raw_chain::{reserve_nodes, Links, NodeKey, NodePool, RawCursor};
use crate::table_iter::TableIter;
use core::fmt;
use core::hash::{BuildHasher, Hasher};
use core::mem;

/// Callback that takes ownership of values the table discards.
pub type Destructor<V> = Box<dyn FnMut(V)>;

#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: V,
    hash: u64,
}

/// Hash table mapping byte-string keys to values of type `V`.
///
/// Buckets are chains over one shared node arena. After an insert pushes
/// `len / capacity` past `max_load_factor`, the bucket array is regrown to
/// `len * growth_factor` and every node is relinked into its new bucket.
///
/// An optional destructor receives values the table drops on its own: the
/// old value when `put` replaces a key, and every remaining value on
/// teardown. `remove` hands the value back and never calls it.
pub struct HashTable<V, S = BuildDjb2> {
    hasher: S,
    pool: NodePool<Entry<V>>,
    buckets: Vec<Links>,
    config: TableConfig,
    destructor: Option<Destructor<V>>,
}

impl<V> HashTable<V> {
    /// Empty table with the default config (101 buckets) and no destructor.
    pub fn new() -> Self {
        Self::with_hasher(BuildDjb2)
    }

    pub fn with_destructor<F>(destructor: F) -> Self
    where
        F: FnMut(V) + 'static,
    {
        let mut t = Self::new();
        t.destructor = Some(Box::new(destructor));
        t
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

// Raw views for `TableIter`, which places no bound on the hasher.
impl<V, S> HashTable<V, S> {
    pub(crate) fn buckets(&self) -> &[Links] {
        &self.buckets
    }

    pub(crate) fn pool(&self) -> &NodePool<Entry<V>> {
        &self.pool
    }
}

fn alloc_buckets(capacity: usize) -> Result<Vec<Links>, TableError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity)?;
    buckets.resize_with(capacity, Links::new);
    Ok(buckets)
}

fn copy_key(key: &[u8]) -> Result<Box<[u8]>, TableError> {
    let mut owned = Vec::new();
    owned.try_reserve_exact(key.len())?;
    owned.extend_from_slice(key);
    Ok(owned.into_boxed_slice())
}

#[inline]
fn bucket_of(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

impl<V, S> HashTable<V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        let config = TableConfig::default();
        let buckets = (0..config.initial_capacity).map(|_| Links::new()).collect();
        Self {
            hasher,
            pool: NodePool::with_key(),
            buckets,
            config,
            destructor: None,
        }
    }

    /// Build a table from an explicit config. Fails on an invalid config or
    /// if the initial bucket array cannot be allocated.
    pub fn try_with_config(
        config: TableConfig,
        hasher: S,
        destructor: Option<Destructor<V>>,
    ) -> Result<Self, TableError> {
        config.validate()?;
        let buckets = alloc_buckets(config.initial_capacity)?;
        Ok(Self {
            hasher,
            pool: NodePool::with_key(),
            buckets,
            config,
            destructor,
        })
    }

    // Feed raw bytes through `write`; `[u8]: Hash` would prepend a length.
    fn make_hash(&self, key: &[u8]) -> u64 {
        let mut h = self.hasher.build_hasher();
        h.write(key);
        h.finish()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Current number of buckets. Always > 0.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    fn find_node(&self, hash: u64, key: &[u8]) -> Option<NodeKey> {
        let links = &self.buckets[bucket_of(hash, self.capacity())];
        let mut c = RawCursor::start(links);
        while let Some(e) = c.current(&self.pool) {
            if e.hash == hash && *e.key == *key {
                return c.current_key();
            }
            c.advance(&self.pool);
        }
        None
    }

    /// Insert or replace. On replacement the old value goes to the destructor
    /// (or is dropped) and `len` is unchanged. On error nothing is modified.
    pub fn put<K>(&mut self, key: K, value: V) -> Result<(), TableError>
    where
        K: AsRef<[u8]>,
    {
        let key = key.as_ref();
        let hash = self.make_hash(key);
        if let Some(k) = self.find_node(hash, key) {
            let old = mem::replace(&mut self.pool[k].value.value, value);
            self.discard(old);
            return Ok(());
        }

        reserve_nodes(&mut self.pool, 1)?;
        let key = copy_key(key)?;
        let idx = bucket_of(hash, self.capacity());
        self.buckets[idx].push_back(&mut self.pool, Entry { key, value, hash })?;
        self.maybe_grow();
        Ok(())
    }

    /// Reserve node storage for `additional` more keys. Bucket growth still
    /// follows the load factor.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TableError> {
        reserve_nodes(&mut self.pool, additional)
    }

    pub fn get<K>(&self, key: K) -> Option<&V>
    where
        K: AsRef<[u8]>,
    {
        let key = key.as_ref();
        let k = self.find_node(self.make_hash(key), key)?;
        Some(&self.pool[k].value.value)
    }

    pub fn get_mut<K>(&mut self, key: K) -> Option<&mut V>
    where
        K: AsRef<[u8]>,
    {
        let key = key.as_ref();
        let k = self.find_node(self.make_hash(key), key)?;
        Some(&mut self.pool[k].value.value)
    }

    pub fn contains_key<K>(&self, key: K) -> bool
    where
        K: AsRef<[u8]>,
    {
        let key = key.as_ref();
        self.find_node(self.make_hash(key), key).is_some()
    }

    /// Unlink the entry for `key` and return its value to the caller. The
    /// destructor is not invoked.
    pub fn remove<K>(&mut self, key: K) -> Option<V>
    where
        K: AsRef<[u8]>,
    {
        let key = key.as_ref();
        let hash = self.make_hash(key);
        let idx = bucket_of(hash, self.capacity());
        let links = &mut self.buckets[idx];
        let mut c = RawCursor::start(links);
        while let Some(e) = c.current(&self.pool) {
            if e.hash == hash && *e.key == *key {
                return c.remove(links, &mut self.pool).map(|e| e.value);
            }
            c.advance(&self.pool);
        }
        None
    }

    /// Tear the table down, passing every value to the destructor if set.
    pub fn destroy(self) {
        drop(self);
    }

    pub fn iter(&self) -> TableIter<'_, V, S> {
        TableIter::new(self)
    }

    fn discard(&mut self, value: V) {
        match self.destructor.as_mut() {
            Some(d) => d(value),
            None => drop(value),
        }
    }

    fn maybe_grow(&mut self) {
        if self.load_factor() <= self.config.max_load_factor {
            return;
        }
        let target = self.config.grown_capacity(self.len());
        if target <= self.capacity() {
            return;
        }
        if let Err(e) = self.rehash(target) {
            log::warn!(
                "resize to {} buckets failed, keeping {}: {}",
                target,
                self.capacity(),
                e
            );
        }
    }

    /// Move every node into a fresh bucket array of `new_capacity` chains.
    /// Nodes are relinked, not copied, and each entry's stored hash is reused.
    /// If the new array cannot be allocated the table is left untouched.
    pub(crate) fn rehash(&mut self, new_capacity: usize) -> Result<(), TableError> {
        let new_capacity = new_capacity.max(1);
        let fresh = alloc_buckets(new_capacity)?;
        let old = mem::replace(&mut self.buckets, fresh);
        log::trace!(
            "rehash: {} -> {} buckets, {} entries",
            old.len(),
            new_capacity,
            self.pool.len()
        );
        for mut links in old {
            while let Some(k) = links.unlink_front(&mut self.pool) {
                let idx = bucket_of(self.pool[k].value.hash, new_capacity);
                self.buckets[idx].link_back(&mut self.pool, k);
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut total = 0;
        for (i, links) in self.buckets.iter().enumerate() {
            links.assert_consistent(&self.pool);
            total += links.len();
            let mut c = RawCursor::start(links);
            while let Some(e) = c.current(&self.pool) {
                assert_eq!(e.hash, self.make_hash(&e.key), "stale stored hash");
                assert_eq!(bucket_of(e.hash, self.capacity()), i, "entry in wrong bucket");
                c.advance(&self.pool);
            }
        }
        assert_eq!(total, self.len(), "bucket lengths do not sum to len");
    }
}

impl<V, S> Drop for HashTable<V, S> {
    fn drop(&mut self) {
        let Some(destructor) = self.destructor.as_mut() else {
            return;
        };
        for links in self.buckets.iter_mut() {
            while let Some(entry) = links.pop_front(&mut self.pool) {
                destructor(entry.value);
            }
        }
    }
}

impl<V: fmt::Debug, S: BuildHasher> fmt::Debug for HashTable<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (String::from_utf8_lossy(k), v)))
            .finish()
    }
}
