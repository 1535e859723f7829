use log::debug;

use crate::error::{Result, TableError};
use crate::hashing::poly_hash;
use crate::keys::HashKey;
use crate::sizes::SizeSchedule;
use crate::utils::fixed_array::FixedArray;

/// Maps a key to a home slot given the table's current size.
pub type HashFn<K> = fn(&K, usize) -> usize;

/// Outcome of walking a key's probe chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Probe {
    /// The key sits at this slot.
    Found(usize),
    /// The key is absent; this is the first empty slot on its chain.
    Vacant(usize),
    /// Every slot was examined without a match or an empty slot.
    Exhausted,
}

/// Open-addressing table with linear probing, growing through a `SizeSchedule` once more than
/// half its slots are in use.
pub struct ProbeTable<K, V> {
    array: FixedArray<(K, V)>,
    sizes: SizeSchedule,
    hasher: HashFn<K>,
}

impl<K: HashKey, V> Default for ProbeTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: HashKey, V> ProbeTable<K, V> {
    pub fn new() -> Self {
        Self::with_sizes(None)
    }

    pub fn with_sizes(sizes: Option<Vec<usize>>) -> Self {
        Self::with_hasher(sizes, poly_hash::<K>)
    }

    pub fn with_hasher(sizes: Option<Vec<usize>>, hasher: HashFn<K>) -> Self {
        let sizes = SizeSchedule::from(sizes);
        Self {
            array: FixedArray::new(sizes.current()),
            sizes,
            hasher,
        }
    }

    /// Swaps the hash function. Existing entries are re-placed under the new one.
    pub fn set_hasher(&mut self, hasher: HashFn<K>) {
        self.hasher = hasher;
        self.rebuild();
    }

    #[inline]
    pub fn table_size(&self) -> usize {
        self.array.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.array.occupied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hash(&self, key: &K) -> usize {
        (self.hasher)(key, self.table_size()) % self.table_size()
    }

    pub(crate) fn probe(&self, key: &K) -> Probe {
        let size = self.table_size();
        let mut pos = self.hash(key);
        for _ in 0..size {
            match self.array.get(pos) {
                None => return Probe::Vacant(pos),
                Some((k, _)) if k == key => return Probe::Found(pos),
                Some(_) => pos = (pos + 1) % size,
            }
        }
        Probe::Exhausted
    }

    /// Returns the slot holding `key`.
    pub fn position_of(&self, key: &K) -> Result<usize> {
        match self.probe(key) {
            Probe::Found(pos) => Ok(pos),
            _ => Err(TableError::not_found(key)),
        }
    }

    /// Returns the slot a write of `key` would land in, without writing: its current slot if
    /// present, otherwise the first empty slot on its probe chain.
    pub fn intended_position(&self, key: &K) -> Result<usize> {
        match self.probe(key) {
            Probe::Found(pos) | Probe::Vacant(pos) => Ok(pos),
            Probe::Exhausted => Err(TableError::TableFull {
                table_size: self.table_size(),
            }),
        }
    }

    pub fn get(&self, key: &K) -> Result<&V> {
        let pos = self.position_of(key)?;
        self.array
            .get(pos)
            .map(|(_, v)| v)
            .ok_or_else(|| TableError::not_found(key))
    }

    pub fn get_mut(&mut self, key: &K) -> Result<&mut V> {
        let pos = self.position_of(key)?;
        self.array
            .get_mut(pos)
            .map(|(_, v)| v)
            .ok_or_else(|| TableError::not_found(key))
    }

    pub fn contains(&self, key: &K) -> bool {
        matches!(self.probe(key), Probe::Found(_))
    }

    /// The entry stored at slot `pos`, if any.
    pub fn slot(&self, pos: usize) -> Option<(&K, &V)> {
        self.array.get(pos).map(|(k, v)| (k, v))
    }

    /// Inserts or updates `key`, returning the value it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let pos = self.intended_position(&key)?;
        Ok(self.write_at(pos, key, value))
    }

    /// Commits a write at a slot obtained from `intended_position` for the same key, with no
    /// mutation in between. Grows the table afterwards if it is now over half full.
    pub fn write_at(&mut self, pos: usize, key: K, value: V) -> Option<V> {
        debug_assert!(self.array.get(pos).map_or(true, |(k, _)| *k == key));
        let prev = self.array.set(pos, (key, value)).map(|(_, v)| v);
        if prev.is_none() && self.len() * 2 > self.table_size() {
            self.grow();
        }
        prev
    }

    /// Removes `key`, then re-places the rest of its cluster so no probe chain runs through the
    /// emptied slot.
    pub fn remove(&mut self, key: &K) -> Result<V> {
        let pos = self.position_of(key)?;
        let (_, value) = self
            .array
            .take(pos)
            .ok_or_else(|| TableError::not_found(key))?;

        let size = self.table_size();
        let mut next = (pos + 1) % size;
        while let Some((k, v)) = self.array.take(next) {
            self.place(k, v);
            next = (next + 1) % size;
        }
        Ok(value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.array.iter().map(|(_, (k, _))| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.array.iter().map(|(_, (_, v))| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.array.iter().map(|(_, (k, v))| (k, v))
    }

    /// Snapshot of the raw slot layout, empty slots included.
    pub fn table_state(&self) -> Vec<Option<(&K, &V)>> {
        self.array.slots().map(|s| s.map(|(k, v)| (k, v))).collect()
    }

    /// Moves every entry out, in slot order. The table keeps its current size.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        self.array.drain_occupied()
    }

    // Writes an entry known to be absent into the first empty slot on its chain.
    fn place(&mut self, key: K, value: V) {
        match self.probe(&key) {
            Probe::Vacant(pos) => {
                self.array.set(pos, (key, value));
            }
            Probe::Found(_) => unreachable!("re-placed key already present"),
            Probe::Exhausted => unreachable!("no free slot while re-placing"),
        }
    }

    fn grow(&mut self) {
        let old_size = self.table_size();
        if !self.sizes.advance() {
            debug!(
                "probe table at capacity {} cannot grow further ({} entries)",
                old_size,
                self.len()
            );
            return;
        }
        self.rebuild();
        debug!(
            "probe table grew {} -> {} ({} entries)",
            old_size,
            self.table_size(),
            self.len()
        );
    }

    // Re-places every entry into a fresh array at the schedule's current size.
    fn rebuild(&mut self) {
        let entries = self.array.drain_occupied();
        self.array = FixedArray::new(self.sizes.current());
        for (k, v) in entries {
            self.place(k, v);
        }
    }
}
