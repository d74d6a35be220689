#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can check
// bucket placement and chain links through `assert_consistent`.

use crate::config::TableConfig;
use crate::djb2::BuildDjb2;
use crate::hash_table::HashTable;
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};
use std::rc::Rc;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Get),
            prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drive `sut` and a std HashMap model through the same ops.
// Invariants exercised after every op:
// - `len`/`is_empty` parity with the model.
// - `put` on a live key hands exactly the old value to the destructor.
// - `remove` returns the model's value and never calls the destructor.
// - `get`/`contains_key` parity for pool keys and arbitrary strings.
// - Iteration yields each live key exactly once.
// - Every entry sits in bucket `hash % capacity`; chains are well-formed.
fn run_state_machine<S: BuildHasher>(
    mut sut: HashTable<i32, S>,
    destroyed: Rc<RefCell<Vec<i32>>>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut expected_destroyed: Vec<i32> = Vec::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = &pool[i];
                if let Some(old) = model.insert(k.clone(), v) {
                    expected_destroyed.push(old);
                }
                prop_assert!(sut.put(k, v).is_ok());
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.wrapping_add(d);
                        *mv = mv.wrapping_add(d);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "get_mut presence differs from model"),
                }
            }
            OpI::Iterate => {
                let mut s_keys = BTreeSet::new();
                for (k, v) in sut.iter() {
                    let k = String::from_utf8(k.to_vec()).expect("keys are ascii");
                    prop_assert_eq!(model.get(&k), Some(v));
                    prop_assert!(s_keys.insert(k), "key yielded twice");
                }
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(&*destroyed.borrow(), &expected_destroyed);
        sut.assert_consistent();
    }

    // Teardown hands over everything still live.
    let before = destroyed.borrow().len();
    drop(sut);
    let mut rest: Vec<i32> = destroyed.borrow()[before..].to_vec();
    let mut live: Vec<i32> = model.into_values().collect();
    rest.sort_unstable();
    live.sort_unstable();
    prop_assert_eq!(rest, live);
    Ok(())
}

fn recording_destructor() -> (Rc<RefCell<Vec<i32>>>, crate::Destructor<i32>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    (log, Box::new(move |v| sink.borrow_mut().push(v)))
}

// Property: state-machine equivalence against std::collections::HashMap with
// the default djb2 hasher and default sizing.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let (log, d) = recording_destructor();
        let sut = HashTable::try_with_config(TableConfig::default(), BuildDjb2, Some(d)).unwrap();
        run_state_machine(sut, log, pool, ops)?;
    }
}

// Property: same invariants with a one-bucket start and a load factor of 1,
// so nearly every insert walks through a rehash.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_constant_resizing((pool, ops) in arb_scenario()) {
        let (log, d) = recording_destructor();
        let cfg = TableConfig::new().initial_capacity(1).max_load_factor(1.0);
        let sut = HashTable::try_with_config(cfg, BuildDjb2, Some(d)).unwrap();
        run_state_machine(sut, log, pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress chain edits.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same state-machine invariants as above, under worst-case
// collision behavior (constant hasher). Every key shares one chain, so
// removes hit the head, middle and tail of that chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let (log, d) = recording_destructor();
        let sut = HashTable::try_with_config(TableConfig::default(), ConstBuildHasher, Some(d)).unwrap();
        run_state_machine(sut, log, pool, ops)?;
    }
}
