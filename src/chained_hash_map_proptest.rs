// Property tests for ChainedHashMap kept inside the crate so they can inspect
// bucket placement through the crate-private store.

use crate::chained_hash_map::ChainedHashMap;
use crate::config::MapConfig;
use crate::error::MapError;
use crate::hash_fn::HashFn;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Set(usize, i32),
    Get(usize),
    Delete(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
            2 => idx.clone().prop_map(Op::Get),
            2 => idx.clone().prop_map(Op::Delete),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(Op::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn arb_config() -> impl Strategy<Value = MapConfig> {
    (1usize..=8, prop_oneof![Just(0.25), Just(0.5), Just(0.75), Just(1.0), Just(3.0)])
        .prop_map(|(cap, lf)| MapConfig::new().with_initial_capacity(cap).with_load_factor(lf))
}

// Structural checks that only the crate can see.
fn check_structure<H: HashFn<String>>(
    sut: &ChainedHashMap<String, i32, H>,
) -> Result<(), TestCaseError> {
    let store = sut.buckets();
    let cap = store.bucket_count();
    let mut seen = 0;
    for b in 0..cap {
        prop_assert_eq!(store.chain(b).count(), store.chain_len(b));
        for (_, e) in store.chain(b) {
            prop_assert_eq!((e.hash % cap as u64) as usize, b, "entry in wrong bucket");
            seen += 1;
        }
    }
    prop_assert_eq!(seen, sut.len());
    prop_assert!(sut.current_load() <= sut.load_factor() || sut.len() == 0);
    prop_assert!(cap >= sut.config().initial_capacity);
    Ok(())
}

fn run_state_machine<H: HashFn<String> + HashFn<str>>(
    mut sut: ChainedHashMap<String, i32, H>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        let cap_before = sut.capacity();
        match op {
            Op::Set(i, v) => {
                let k = pool[i].clone();
                let before: BTreeMap<String, i32> =
                    sut.items().map(|(k, v)| (k.clone(), *v)).collect();
                let prev = sut.set(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k.clone(), v));
                if prev.is_some() {
                    prop_assert_eq!(sut.capacity(), cap_before, "overwrite must not resize");
                }
                // Everything that was there survives, plus the new pair.
                let mut after: BTreeMap<String, i32> =
                    sut.items().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(after.remove(&k), Some(v));
                let mut before = before;
                before.remove(&k);
                prop_assert_eq!(after, before);
            }
            Op::Get(i) => {
                let k = &pool[i];
                match model.get(k) {
                    Some(v) => prop_assert_eq!(sut.get(k.as_str()), Ok(v)),
                    None => prop_assert_eq!(sut.get(k.as_str()), Err(MapError::KeyNotFound)),
                }
            }
            Op::Delete(i) => {
                let k = &pool[i];
                match model.remove(k) {
                    Some(v) => prop_assert_eq!(sut.delete(k.as_str()), Ok(v)),
                    None => prop_assert_eq!(sut.delete(k.as_str()), Err(MapError::KeyNotFound)),
                }
                prop_assert!(!sut.contains(k.as_str()));
                prop_assert_eq!(sut.capacity(), cap_before, "delete never shrinks");
            }
            Op::Contains(s) => {
                prop_assert_eq!(sut.contains(s.as_str()), model.contains_key(&s));
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                match sut.get_mut(k.as_str()) {
                    Ok(v) => {
                        *v = v.saturating_add(d);
                        let mv = model.get_mut(k).expect("model has key");
                        *mv = mv.saturating_add(d);
                    }
                    Err(MapError::KeyNotFound) => prop_assert!(!model.contains_key(k)),
                    Err(e) => prop_assert!(false, "unexpected error {e}"),
                }
            }
            Op::Iterate => {
                let items: Vec<(String, i32)> =
                    sut.items().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(items.len(), model.len());
                let as_map: HashMap<String, i32> = items.into_iter().collect();
                prop_assert_eq!(&as_map, &model, "items yields each entry exactly once");
                prop_assert_eq!(sut.keys().count(), sut.values().count());
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), sut.config().initial_capacity);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check_structure(&sut)?;
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `set` returns the model's previous value; overwrites never resize.
// - A growing `set` keeps every other pair exactly once.
// - `get`/`delete` fail with KeyNotFound exactly when the model lacks the key.
// - `delete` never shrinks; `clear` restores the initial capacity.
// - Every entry sits in bucket `hash % capacity`; load factor holds.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(config in arb_config(), (pool, ops) in arb_scenario()) {
        let sut: ChainedHashMap<String, i32> = ChainedHashMap::with_config(config).unwrap();
        run_state_machine(sut, pool, ops)?;
    }
}

fn const_hash(_: &str) -> u64 {
    0
}

// Two-way adapter so the constant hash serves both `String` and `&str` lookups.
#[derive(Clone, Copy, Default)]
struct ConstHash;
impl HashFn<String> for ConstHash {
    fn hash_key(&self, key: &String) -> u64 {
        const_hash(key)
    }
}
impl HashFn<str> for ConstHash {
    fn hash_key(&self, key: &str) -> u64 {
        const_hash(key)
    }
}

// Property: same invariants under worst-case collisions (one chain holds
// every entry), stressing equality scans and chain unlinking.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(config in arb_config(), (pool, ops) in arb_scenario()) {
        let sut = ChainedHashMap::with_hash_fn(config, ConstHash).unwrap();
        run_state_machine(sut, pool, ops)?;
    }
}
