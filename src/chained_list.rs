//! ChainedList: owned singly-linked list with a mutating external cursor.

use crate::error::TableError;
use crate::raw_chain::{reserve_nodes, Links, NodePool, RawCursor};
use core::fmt;

/// Singly-linked list with O(1) `push_front`, `push_back` and `pop_front`.
///
/// Nodes are stored in an arena addressed by generational keys, so a cursor
/// that inserts or deletes in the middle never leaves a dangling link.
///
/// Every operation that allocates a node returns
/// `TableError::AllocationFailure` when the arena cannot grow, and leaves
/// the list as it was.
pub struct ChainedList<T> {
    pool: NodePool<T>,
    links: Links,
}

impl<T> ChainedList<T> {
    pub fn new() -> Self {
        Self {
            pool: NodePool::with_key(),
            links: Links::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn push_front(&mut self, value: T) -> Result<(), TableError> {
        self.links.push_front(&mut self.pool, value)?;
        Ok(())
    }

    pub fn push_back(&mut self, value: T) -> Result<(), TableError> {
        self.links.push_back(&mut self.pool, value)?;
        Ok(())
    }

    /// Reserve room for `additional` more elements up front.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TableError> {
        reserve_nodes(&mut self.pool, additional)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.links.pop_front(&mut self.pool)
    }

    pub fn front(&self) -> Option<&T> {
        self.links.front(&self.pool)
    }

    pub fn back(&self) -> Option<&T> {
        self.links.back(&self.pool)
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.links.front_mut(&mut self.pool)
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.links.back_mut(&mut self.pool)
    }

    /// Tear the list down, dropping every value.
    pub fn destroy(self) {
        drop(self);
    }

    /// Tear the list down, handing each value to `destructor` front to back.
    pub fn destroy_with<F>(mut self, mut destructor: F)
    where
        F: FnMut(T),
    {
        while let Some(v) = self.pop_front() {
            destructor(v);
        }
    }

    /// Internal iteration: calls `visit` front to back until it returns
    /// `false` or the list ends.
    pub fn iterate<F>(&self, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut c = RawCursor::start(&self.links);
        while let Some(v) = c.current(&self.pool) {
            if !visit(v) {
                return;
            }
            c.advance(&self.pool);
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            pool: &self.pool,
            cursor: RawCursor::start(&self.links),
            remaining: self.links.len(),
        }
    }

    /// Cursor positioned on the first element (or at the end if empty).
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T> {
        let raw = RawCursor::start(&self.links);
        CursorMut { list: self, raw }
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.links.assert_consistent(&self.pool);
        assert_eq!(self.pool.len(), self.links.len(), "arena holds unlinked nodes");
    }
}

impl<T> Default for ChainedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ChainedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// # Panics
///
/// Panics if a node cannot be allocated, as `Vec::extend` does on capacity
/// overflow. Use `push_back` to handle the failure instead.
impl<T> Extend<T> for ChainedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            if let Err(e) = self.push_back(v) {
                panic!("ChainedList::extend: {e}");
            }
        }
    }
}

impl<T> FromIterator<T> for ChainedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

/// Iterator over shared references, front to back.
pub struct Iter<'a, T> {
    pool: &'a NodePool<T>,
    cursor: RawCursor,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let v = self.cursor.current(self.pool)?;
        self.cursor.advance(self.pool);
        self.remaining -= 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a ChainedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// External cursor that can edit the list at its position.
///
/// The list is exclusively borrowed for the cursor's lifetime, so no other
/// handle can observe the list mid-edit.
pub struct CursorMut<'a, T> {
    list: &'a mut ChainedList<T>,
    raw: RawCursor,
}

impl<'a, T> CursorMut<'a, T> {
    /// Step to the next element. Returns `false` if already at the end.
    pub fn advance(&mut self) -> bool {
        self.raw.advance(&self.list.pool)
    }

    pub fn current(&self) -> Option<&T> {
        self.raw.current(&self.list.pool)
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.raw.current_mut(&mut self.list.pool)
    }

    pub fn at_end(&self) -> bool {
        self.raw.at_end()
    }

    /// Insert `value` in front of the current element and move onto it.
    /// At the end, this appends and the cursor lands on the new tail.
    /// On allocation failure neither the list nor the cursor changes.
    pub fn insert_before_current(&mut self, value: T) -> Result<(), TableError> {
        let list = &mut *self.list;
        self.raw.insert(&mut list.links, &mut list.pool, value)
    }

    /// Remove the current element and return it. The cursor moves onto the
    /// following element, or to the end if the removed one was last.
    pub fn delete_current(&mut self) -> Option<T> {
        let list = &mut *self.list;
        self.raw.remove(&mut list.links, &mut list.pool)
    }
}
