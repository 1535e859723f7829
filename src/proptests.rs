use std::collections::{BTreeMap, BTreeSet, HashMap};

use proptest::prelude::*;

use crate::error::TableError;
use crate::pair_table::PairKeyedTable;
use crate::trie_table::DigitTrieTable;

#[derive(Clone, Debug)]
enum PairOp {
    Set(String, String, u16),
    Remove(String, String),
}

#[derive(Clone, Debug)]
enum TrieOp {
    Insert(String, u16),
    Remove(String),
}

// Few distinct outer keys so inner tables fill up; few letters so trie keys share prefixes.
fn outer_key() -> impl Strategy<Value = String> {
    "[0-9]{1,2}"
}

fn inner_key() -> impl Strategy<Value = String> {
    "[a-e]{1,3}"
}

fn trie_key() -> impl Strategy<Value = String> {
    "[abcxyz]{0,5}"
}

fn pair_op() -> impl Strategy<Value = PairOp> {
    prop_oneof![
        3 => (outer_key(), inner_key(), any::<u16>()).prop_map(|(a, b, v)| PairOp::Set(a, b, v)),
        1 => (outer_key(), inner_key()).prop_map(|(a, b)| PairOp::Remove(a, b)),
    ]
}

fn trie_op() -> impl Strategy<Value = TrieOp> {
    prop_oneof![
        3 => (trie_key(), any::<u16>()).prop_map(|(k, v)| TrieOp::Insert(k, v)),
        1 => trie_key().prop_map(TrieOp::Remove),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn pair_table_matches_model(ops in prop::collection::vec(pair_op(), 0..300)) {
        let mut table = PairKeyedTable::<String, String, u16>::new();
        let mut model: HashMap<(String, String), u16> = HashMap::new();

        for op in ops {
            match op {
                PairOp::Set(k1, k2, v) => {
                    let expected = model.insert((k1.clone(), k2.clone()), v);
                    prop_assert_eq!(table.set(k1, k2, v), Ok(expected));
                }
                PairOp::Remove(k1, k2) => {
                    let expected = model.remove(&(k1.clone(), k2.clone()));
                    prop_assert_eq!(table.remove(&k1, &k2).ok(), expected);
                }
            }
            table.validate();
            prop_assert_eq!(table.len(), model.len());
            prop_assert!(table.outer_len() * 2 <= table.table_size());
        }

        for ((k1, k2), v) in &model {
            prop_assert_eq!(table.get(k1, k2), Ok(v));
        }
        let outer: BTreeSet<&String> = model.keys().map(|(k1, _)| k1).collect();
        prop_assert_eq!(table.keys().into_iter().collect::<BTreeSet<_>>(), outer);
        for k1 in table.keys() {
            let inner: BTreeSet<&String> = table.keys_in(k1).unwrap().into_iter().collect();
            let expected: BTreeSet<&String> = model
                .keys()
                .filter(|(a, _)| a == k1)
                .map(|(_, b)| b)
                .collect();
            prop_assert_eq!(inner, expected);
        }
    }

    #[test]
    fn trie_table_matches_model(ops in prop::collection::vec(trie_op(), 0..300)) {
        let mut table = DigitTrieTable::<String, u16>::new();
        let mut model: BTreeMap<String, u16> = BTreeMap::new();

        for op in ops {
            match op {
                TrieOp::Insert(k, v) => match table.insert(k.clone(), v) {
                    Ok(prev) => prop_assert_eq!(prev, model.insert(k, v)),
                    // These six letters have distinct residues modulo 26, so any two distinct
                    // keys can be told apart.
                    Err(e) => prop_assert!(false, "unexpected error {}", e),
                },
                TrieOp::Remove(k) => {
                    prop_assert_eq!(table.remove(&k).ok(), model.remove(&k));
                }
            }
            prop_assert_eq!(table.validate(), model.len());
        }

        let expected: Vec<&String> = model.keys().collect();
        prop_assert_eq!(table.sort_keys(), expected);
        for (k, v) in &model {
            prop_assert_eq!(table.get(k), Ok(v));
        }
    }

    #[test]
    fn trie_single_key_never_nests(key in "[a-z]{0,8}", other in "[a-z]{0,8}") {
        prop_assume!(key != other);
        let mut table = DigitTrieTable::<String, u8>::new();
        table.insert(key.clone(), 1).unwrap();
        table.insert(other.clone(), 2).unwrap();
        table.remove(&other).unwrap();
        prop_assert_eq!(table.locate(&key).len(), 1);
        prop_assert_eq!(table.keys(), vec![&key]);
        prop_assert_eq!(table.remove(&other), Err(TableError::not_found(&other)));
    }
}
