pub use crate::error::{Result, TableError};
pub use crate::keys::HashKey;
pub use crate::pair_table::PairKeyedTable;
pub use crate::probe_table::ProbeTable;
pub use crate::trie_table::DigitTrieTable;

pub mod domain;
pub mod error;
pub mod hashing;
pub mod keys;
pub mod pair_table;
pub mod probe_table;
pub mod sizes;
pub mod trie_table;
pub mod utils;

#[cfg(test)]
mod proptests;
