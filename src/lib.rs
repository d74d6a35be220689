//! chained-hash: a separate-chaining hash table from byte-string keys to
//! values, plus the singly-linked list with a mutating cursor that backs
//! its buckets.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a classic chained hash table whose link surgery is safe and
//!   checkable, layered so each piece has a small contract.
//! - Layers:
//!   - raw_chain: `Links` (head/tail/len) and `RawCursor` (prev/current)
//!     over a `SlotMap` node arena. All relinking happens here.
//!   - ChainedList<T>: owns one arena and one `Links`; exposes push/pop,
//!     an internal visitor, a std iterator and `CursorMut`.
//!   - HashTable<V, S>: a `Vec<Links>` of buckets sharing one arena,
//!     djb2 hashing by default, load-factor driven rehash.
//!   - TableIter: bucket index plus a `RawCursor`, as an explicit
//!     `Scanning`/`Exhausted` state.
//!
//! Constraints
//! - Single-threaded: `HashTable` holds a boxed `FnMut` destructor and is
//!   therefore `!Send`/`!Sync`.
//! - Nodes are referenced by generational keys; a removed node's key never
//!   resolves again, so cursor edits cannot leave dangling links.
//! - Keys are copied on insert and compared bytewise.
//!
//! Rehashing
//! - Each entry stores its hash. A rehash allocates the new bucket array
//!   first (fallibly) and only then relinks nodes into it, so a failed
//!   allocation leaves the table exactly as it was. Failures are logged
//!   and swallowed: a resize is an optimization, not a correctness
//!   requirement.
//!
//! Destructor semantics
//! - Invoked on the old value when `put` replaces a key, and on every
//!   remaining value when the table is dropped. Never on `remove`, which
//!   hands the value back to the caller.
//!
//! Allocation
//! - Every allocation on a mutating path is fallible: nodes reserve arena
//!   space with `SlotMap::try_reserve` before inserting, and key copies and
//!   bucket arrays use `try_reserve_exact`. Failures surface as
//!   `TableError::AllocationFailure` with nothing modified.
//!
//! Notes and non-goals
//! - No concurrent access, no persistence, no generic key types.
//! - Iterators borrow the table, so mutation during iteration is rejected
//!   at compile time.

pub mod chained_list;
pub mod config;
pub mod djb2;
pub mod error;
pub mod hash_table;
mod hash_table_proptest;
mod raw_chain;
pub mod table_iter;

// Public surface
pub use chained_list::{ChainedList, CursorMut};
pub use config::TableConfig;
pub use djb2::{djb2, BuildDjb2, Djb2Hasher};
pub use error::TableError;
pub use hash_table::{Destructor, HashTable};
pub use table_iter::TableIter;
