use log::trace;

use crate::error::{Result, TableError};
use crate::keys::HashKey;
use crate::utils::fixed_array::FixedArray;

/// Slots per table: one per residue of a character code modulo 26, plus one for keys that end
/// before this table's level.
pub const TABLE_SIZE: usize = 27;
const OVERFLOW: usize = TABLE_SIZE - 1;

// A non-empty slot. Together with the empty slot this gives the three slot states: nothing,
// a terminal pair, or a nested table.
enum TrieEntry<K, V> {
    Leaf { key: K, value: V },
    // `prefix` is the key that caused the split, truncated to the child's level. Bookkeeping
    // only, never hashed.
    Branch { prefix: K, table: Box<DigitTrieTable<K, V>> },
}

/// The slot index for `key` at `level`.
#[inline]
fn digit<K: HashKey>(key: &K, level: usize) -> usize {
    match key.code_at(level) {
        Some(code) => code as usize % OVERFLOW,
        None => OVERFLOW,
    }
}

// Whether two keys land in different slots at some level from `level` onwards. Past the end of
// both keys every level maps them to the overflow slot, so only positions within the longer key
// need checking.
fn diverges<K: HashKey>(a: &K, b: &K, level: usize) -> bool {
    let longest = a.code_len().max(b.code_len());
    (level..longest).any(|pos| digit(a, pos) != digit(b, pos))
}

/// A hash table for keys of any length. Each table hashes one character position; keys that
/// collide in a slot are pushed down into a nested table one position deeper, created on
/// demand. A nested table always holds at least two keys: when removal leaves one, it is pulled
/// back up into its parent's slot.
pub struct DigitTrieTable<K, V> {
    array: FixedArray<TrieEntry<K, V>>,
    level: usize,
    count: usize,
}

impl<K: HashKey, V> Default for DigitTrieTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: HashKey, V> DigitTrieTable<K, V> {
    pub fn new() -> Self {
        Self::at_level(0)
    }

    fn at_level(level: usize) -> Self {
        Self {
            array: FixedArray::new(TABLE_SIZE),
            level,
            count: 0,
        }
    }

    /// Number of character positions consumed by the tables above this one.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of keys stored in this table and every table beneath it.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn hash(&self, key: &K) -> usize {
        digit(key, self.level)
    }

    /// The slot indices visited on the way to `key`'s terminal slot, one per level. The last
    /// index is where `key` is, or would be written if absent.
    pub fn locate(&self, key: &K) -> Vec<usize> {
        let mut path = Vec::new();
        let mut table = self;
        loop {
            let idx = table.hash(key);
            path.push(idx);
            match table.array.get(idx) {
                Some(TrieEntry::Branch { table: child, .. }) => table = child.as_ref(),
                _ => return path,
            }
        }
    }

    pub fn get(&self, key: &K) -> Result<&V> {
        let mut table = self;
        loop {
            match table.array.get(table.hash(key)) {
                Some(TrieEntry::Branch { table: child, .. }) => table = child.as_ref(),
                Some(TrieEntry::Leaf { key: k, value }) if k == key => return Ok(value),
                _ => return Err(TableError::not_found(key)),
            }
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Result<&mut V> {
        let idx = self.hash(key);
        match self.array.get_mut(idx) {
            Some(TrieEntry::Branch { table, .. }) => table.get_mut(key),
            Some(TrieEntry::Leaf { key: k, value }) if *k == *key => Ok(value),
            _ => Err(TableError::not_found(key)),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_ok()
    }

    /// Inserts or updates `key`, returning the value it replaced.
    ///
    /// Fails without modifying the table if `key` and a stored key agree in every remaining
    /// character code modulo 26 and so can never be told apart.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let idx = self.hash(&key);
        match self.array.get_mut(idx) {
            None => {
                self.array.set(idx, TrieEntry::Leaf { key, value });
                self.count += 1;
                return Ok(None);
            }
            Some(TrieEntry::Leaf { key: k, value: v }) if *k == key => {
                return Ok(Some(std::mem::replace(v, value)));
            }
            Some(TrieEntry::Branch { table, .. }) => {
                let prev = table.insert(key, value)?;
                if prev.is_none() {
                    self.count += 1;
                }
                return Ok(prev);
            }
            Some(TrieEntry::Leaf { key: k, .. }) => {
                if !diverges(k, &key, self.level + 1) {
                    return Err(TableError::UnresolvableCollision(format!(
                        "{:?} and {:?}",
                        k, key
                    )));
                }
            }
        }

        // Two different keys share this slot: split it.
        let Some(TrieEntry::Leaf {
            key: old_key,
            value: old_value,
        }) = self.array.take(idx)
        else {
            unreachable!("slot {} changed during split", idx)
        };
        let prefix = key.prefix(self.level + 1);
        let mut child = Box::new(Self::at_level(self.level + 1));
        child.insert(old_key, old_value)?;
        child.insert(key, value)?;
        trace!(
            "split slot {} at level {} into a nested table ({:?})",
            idx,
            self.level,
            prefix
        );
        self.array.set(
            idx,
            TrieEntry::Branch {
                prefix,
                table: child,
            },
        );
        self.count += 1;
        Ok(None)
    }

    /// Removes `key` and returns its value. A nested table left holding a single key is replaced
    /// by that key.
    pub fn remove(&mut self, key: &K) -> Result<V> {
        let idx = self.hash(key);
        match self.array.get_mut(idx) {
            Some(TrieEntry::Leaf { key: k, .. }) if *k == *key => {}
            Some(TrieEntry::Branch { table, .. }) => {
                let value = table.remove(key)?;
                self.count -= 1;
                if table.len() == 1 {
                    if let Some((k, v)) = table.take_single() {
                        trace!("collapsed nested table at level {} slot {}", self.level, idx);
                        self.array.set(idx, TrieEntry::Leaf { key: k, value: v });
                    }
                }
                return Ok(value);
            }
            _ => return Err(TableError::not_found(key)),
        }

        match self.array.take(idx) {
            Some(TrieEntry::Leaf { value, .. }) => {
                self.count -= 1;
                Ok(value)
            }
            _ => unreachable!("slot {} changed during removal", idx),
        }
    }

    // Moves out the only key of a table holding exactly one. A nested table would hold at least
    // two, so that key is always a direct leaf.
    fn take_single(&mut self) -> Option<(K, V)> {
        let idx = self
            .array
            .iter()
            .find(|(_, e)| matches!(e, TrieEntry::Leaf { .. }))
            .map(|(i, _)| i)?;
        match self.array.take(idx)? {
            TrieEntry::Leaf { key, value } => {
                self.count -= 1;
                Some((key, value))
            }
            TrieEntry::Branch { .. } => None,
        }
    }

    /// Keys held directly in this table's slots, in slot order. A slot holding a nested table
    /// contributes the prefix it was split on.
    pub fn keys(&self) -> Vec<&K> {
        self.array
            .iter()
            .map(|(_, e)| match e {
                TrieEntry::Leaf { key, .. } => key,
                TrieEntry::Branch { prefix, .. } => prefix,
            })
            .collect()
    }

    /// Values held directly in this table's slots. Nested tables are skipped.
    pub fn values(&self) -> Vec<&V> {
        self.array
            .iter()
            .filter_map(|(_, e)| match e {
                TrieEntry::Leaf { value, .. } => Some(value),
                TrieEntry::Branch { .. } => None,
            })
            .collect()
    }

    /// Every key in the table and all nested tables, in ascending order.
    pub fn sort_keys(&self) -> Vec<&K>
    where
        K: Ord,
    {
        let mut out = Vec::with_capacity(self.count);
        self.collect_sorted(&mut out);
        out
    }

    fn collect_sorted<'a>(&'a self, out: &mut Vec<&'a K>)
    where
        K: Ord,
    {
        let start = out.len();
        for (_, entry) in self.array.iter() {
            match entry {
                TrieEntry::Leaf { key, .. } => out.push(key),
                TrieEntry::Branch { table, .. } => table.collect_sorted(out),
            }
        }
        // Slot order is residue order, not character order, and the overflow slot comes last.
        // Each slot contributes a sorted run; the stable sort merges the runs.
        out[start..].sort();
    }
}

#[cfg(test)]
impl<K: HashKey, V> DigitTrieTable<K, V> {
    /// Checks that counts add up and every nested table holds at least two keys. Returns the
    /// number of keys found.
    pub(crate) fn validate(&self) -> usize {
        let mut found = 0;
        for (idx, entry) in self.array.iter() {
            match entry {
                TrieEntry::Leaf { key, .. } => {
                    assert_eq!(self.hash(key), idx, "leaf in wrong slot");
                    found += 1;
                }
                TrieEntry::Branch { table, .. } => {
                    assert_eq!(table.level, self.level + 1);
                    let below = table.validate();
                    assert!(below >= 2, "nested table with {} keys", below);
                    found += below;
                }
            }
        }
        assert_eq!(found, self.count);
        found
    }
}
