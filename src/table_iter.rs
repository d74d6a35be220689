//! TableIter: external iterator over the keys of a `HashTable`.

use crate::hash_table::{Entry, HashTable};
use crate::raw_chain::RawCursor;
use core::iter::FusedIterator;

#[derive(Debug, Clone, Copy)]
enum State {
    Scanning { bucket: usize, cursor: RawCursor },
    Exhausted,
}

/// Walks a table bucket by bucket, skipping empty buckets.
///
/// The iterator borrows the table, so the table cannot be mutated (and
/// cannot resize) while the iterator is alive.
///
/// Besides the cursor-style `advance`/`current`/`at_end` API it implements
/// `Iterator<Item = (&[u8], &V)>`.
pub struct TableIter<'a, V, S> {
    table: &'a HashTable<V, S>,
    state: State,
}

impl<'a, V, S> TableIter<'a, V, S> {
    /// Position on the first entry of the first non-empty bucket, or start
    /// exhausted if the table is empty.
    pub fn new(table: &'a HashTable<V, S>) -> Self {
        let state = Self::seek(table, 0);
        Self { table, state }
    }

    fn seek(table: &HashTable<V, S>, from: usize) -> State {
        table
            .buckets()
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, links)| !links.is_empty())
            .map(|(bucket, links)| State::Scanning {
                bucket,
                cursor: RawCursor::start(links),
            })
            .unwrap_or(State::Exhausted)
    }

    /// Move to the next entry. Returns `false` once no entries remain; the
    /// iterator is then exhausted and stays so.
    pub fn advance(&mut self) -> bool {
        let State::Scanning { bucket, cursor } = &mut self.state else {
            return false;
        };
        cursor.advance(self.table.pool());
        if !cursor.at_end() {
            return true;
        }
        let next = *bucket + 1;
        self.state = Self::seek(self.table, next);
        !self.at_end()
    }

    fn current_raw(&self) -> Option<&'a Entry<V>> {
        match &self.state {
            State::Scanning { cursor, .. } => cursor.current(self.table.pool()),
            State::Exhausted => None,
        }
    }

    /// Key under the cursor, borrowed from the table's own copy.
    pub fn current(&self) -> Option<&'a [u8]> {
        self.current_raw().map(|e| &*e.key)
    }

    pub fn current_value(&self) -> Option<&'a V> {
        self.current_raw().map(|e| &e.value)
    }

    pub fn current_entry(&self) -> Option<(&'a [u8], &'a V)> {
        self.current_raw().map(|e| (&*e.key, &e.value))
    }

    pub fn at_end(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }

    /// Index of the bucket being scanned, `None` once exhausted.
    pub fn bucket(&self) -> Option<usize> {
        match self.state {
            State::Scanning { bucket, .. } => Some(bucket),
            State::Exhausted => None,
        }
    }
}

impl<'a, V, S> Iterator for TableIter<'a, V, S> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.current_entry()?;
        self.advance();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            State::Scanning { .. } => (1, Some(self.table.pool().len())),
            State::Exhausted => (0, Some(0)),
        }
    }
}

// `Exhausted` is terminal.
impl<V, S> FusedIterator for TableIter<'_, V, S> {}
