// HashTable integration test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Count: len() equals the number of distinct live keys.
// - Replacement: put on a live key keeps len and runs the destructor once.
// - Removal: remove hands the value back; the destructor is not invoked.
// - Iteration: a full walk visits every key exactly once.
// - Resize: crossing the load factor neither loses nor duplicates entries.
use chained_hash::{BuildDjb2, HashTable, TableConfig, TableError};
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

// Test: the small worked example.
// Verifies: replacement semantics and absent-key lookups.
#[test]
fn put_replace_and_lookup_example() {
    let mut t = HashTable::new();
    t.put("a", 1).unwrap();
    t.put("b", 2).unwrap();
    t.put("a", 3).unwrap();
    assert_eq!(t.len(), 2);
    assert_eq!(t.get("a"), Some(&3));
    assert_eq!(t.get("b"), Some(&2));
    assert!(!t.contains_key("c"));
}

// Test: 500 distinct keys into a default (101-bucket) table.
// Assumes: the default load factor is 4.5, so a resize happens at 455.
// Verifies: len, full iteration coverage, and that capacity grew.
#[test]
fn five_hundred_keys_survive_resize_and_iterate_once() {
    let mut t = HashTable::new();
    for i in 0..500 {
        t.put(format!("key{i}"), i).unwrap();
    }
    assert_eq!(t.len(), 500);
    assert!(t.capacity() > 101, "at least one resize must have happened");

    let mut seen = BTreeSet::new();
    let mut it = t.iter();
    while !it.at_end() {
        let k = it.current().expect("scanning iterator has a key").to_vec();
        assert!(seen.insert(k), "key visited twice");
        it.advance();
    }
    assert_eq!(seen.len(), 500);
    for i in 0..500 {
        assert_eq!(t.get(format!("key{i}")), Some(&i));
    }
}

// Test: values observed before and after the resize boundary match.
// Verifies: resize never changes what get returns for existing keys.
#[test]
fn resize_preserves_every_value() {
    let mut t = HashTable::new();
    let mut before = HashMap::new();
    for i in 0..454u32 {
        let k = format!("{:x}", i.wrapping_mul(2_654_435_761));
        t.put(&k, i).unwrap();
        before.insert(k, i);
    }
    let cap = t.capacity();
    t.put("trigger", 0).unwrap();
    assert!(t.capacity() > cap);
    for (k, v) in &before {
        assert_eq!(t.get(k), Some(v));
    }
}

// Test: destructor accounting across replace, remove and teardown.
// Assumes: the destructor runs on replacement and teardown only.
// Verifies: exact call counts at each stage.
#[test]
fn destructor_runs_on_replace_and_teardown_only() {
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let mut t = HashTable::with_destructor(move |_v: String| c.set(c.get() + 1));

    t.put("x", "one".to_string()).unwrap();
    t.put("y", "two".to_string()).unwrap();
    assert_eq!(calls.get(), 0);

    t.put("x", "uno".to_string()).unwrap();
    assert_eq!(calls.get(), 1);

    let taken = t.remove("y");
    assert_eq!(taken.as_deref(), Some("two"));
    assert_eq!(calls.get(), 1);

    drop(t);
    assert_eq!(calls.get(), 2);
}

// Test: remove on a missing key.
// Verifies: returns None and len is unchanged.
#[test]
fn remove_absent_key_is_noop() {
    let mut t = HashTable::new();
    t.put("k", 1).unwrap();
    assert_eq!(t.remove("nope"), None);
    assert_eq!(t.len(), 1);
    assert_eq!(t.remove("k"), Some(1));
    assert_eq!(t.remove("k"), None);
    assert!(t.is_empty());
}

// Test: len tracks distinct keys through an interleaved sequence.
// Verifies: len after every op equals a std HashMap model's len.
#[test]
fn len_tracks_distinct_keys() {
    let mut t = HashTable::new();
    let mut model = HashMap::new();
    for step in 0..2_000u32 {
        let k = format!("k{}", step % 97);
        if step % 3 == 0 {
            assert_eq!(t.remove(&k), model.remove(&k));
        } else {
            t.put(&k, step).unwrap();
            model.insert(k, step);
        }
        assert_eq!(t.len(), model.len());
    }
}

// Test: non-UTF-8 and embedded-NUL keys.
// Verifies: keys are opaque bytes.
#[test]
fn binary_keys_are_supported() {
    let mut t = HashTable::new();
    t.put([0xffu8, 0x00, 0x10], 'a').unwrap();
    t.put([0xffu8, 0x00], 'b').unwrap();
    assert_eq!(t.get([0xffu8, 0x00, 0x10]), Some(&'a'));
    assert_eq!(t.get([0xffu8, 0x00]), Some(&'b'));
    assert_eq!(t.get([0xffu8]), None);
}

// Test: configuration errors surface through try_with_config.
// Verifies: the error variant and message.
#[test]
fn invalid_config_is_rejected() {
    let err = HashTable::<u8>::try_with_config(
        TableConfig::new().max_load_factor(f64::NAN),
        BuildDjb2,
        None,
    )
    .err()
    .expect("NaN load factor must be rejected");
    assert!(matches!(err, TableError::InvalidConfig { .. }));
    assert!(err.to_string().contains("max_load_factor"));
}

// Test: a configured destructor is honoured by try_with_config.
// Verifies: teardown of a config-built table calls it per entry.
#[test]
fn configured_destructor_runs_on_drop() {
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let cfg = TableConfig::new()
        .initial_capacity(2)
        .max_load_factor(0.5)
        .growth_factor(4);
    let mut t = HashTable::<u32>::try_with_config(
        cfg,
        BuildDjb2,
        Some(Box::new(move |_v: u32| c.set(c.get() + 1))),
    )
    .unwrap();
    for i in 0..40u32 {
        t.put(i.to_string(), i).unwrap();
    }
    assert!(t.load_factor() <= 0.5);
    t.destroy();
    assert_eq!(calls.get(), 40);
}

// Test: a low load factor paired with a growth factor that cannot clear it.
// Assumes: a grown table sits at load factor 1 / growth_factor.
// Verifies: such a config is rejected; a workable one keeps the table under
// its limit after every insert.
#[test]
fn load_factor_limit_is_reachable_after_growth() {
    let stuck = HashTable::<u32>::try_with_config(
        TableConfig::new()
            .initial_capacity(10)
            .max_load_factor(0.3)
            .growth_factor(2),
        BuildDjb2,
        None,
    );
    assert!(matches!(stuck, Err(TableError::InvalidConfig { .. })));

    let cfg = TableConfig::new()
        .initial_capacity(10)
        .max_load_factor(0.3)
        .growth_factor(4);
    let mut t = HashTable::<u32>::try_with_config(cfg, BuildDjb2, None).unwrap();
    for i in 0..200u32 {
        t.put(format!("k{i}"), i).unwrap();
        assert!(t.load_factor() <= 0.3, "load factor {} after {} puts", t.load_factor(), i + 1);
    }
    assert_eq!(t.len(), 200);
}

// Test: node storage that cannot be reserved.
// Verifies: the failure is an AllocationFailure and no entry is lost.
#[test]
fn node_reserve_failure_is_reported() {
    let mut t = HashTable::new();
    t.put("kept", 1).unwrap();
    let err = t.try_reserve(usize::MAX / 2).unwrap_err();
    assert!(matches!(err, TableError::AllocationFailure(_)));
    assert_eq!(t.len(), 1);
    assert_eq!(t.get("kept"), Some(&1));
    t.put("more", 2).unwrap();
    assert_eq!(t.len(), 2);
}
