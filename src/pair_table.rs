use log::{debug, trace};

use crate::error::{Result, TableError};
use crate::hashing::poly_hash;
use crate::keys::HashKey;
use crate::probe_table::{Probe, ProbeTable};
use crate::sizes::SizeSchedule;
use crate::utils::fixed_array::FixedArray;

// An outer key and the table holding every inner key stored under it. Never left empty.
struct OuterSlot<K1, K2, V> {
    key: K1,
    table: ProbeTable<K2, V>,
}

/// Two-level open-addressing table mapping `(K1, K2)` to `V`. The outer array is probed
/// linearly by `K1`; each occupied outer slot owns a `ProbeTable` keyed by `K2`.
///
/// The outer table grows once more than half of its slots are occupied. Inner tables grow on
/// their own schedule.
pub struct PairKeyedTable<K1, K2, V> {
    array: FixedArray<OuterSlot<K1, K2, V>>,
    sizes: SizeSchedule,
    inner_sizes: Option<Vec<usize>>,
}

impl<K1: HashKey, K2: HashKey, V> Default for PairKeyedTable<K1, K2, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K1: HashKey, K2: HashKey, V> PairKeyedTable<K1, K2, V> {
    pub fn new() -> Self {
        Self::with_sizes(None, None)
    }

    /// `sizes` is the outer capacity ladder, `inner_sizes` the one every inner table uses.
    /// `None` selects the default prime ladder.
    pub fn with_sizes(sizes: Option<Vec<usize>>, inner_sizes: Option<Vec<usize>>) -> Self {
        let sizes = SizeSchedule::from(sizes);
        Self {
            array: FixedArray::new(sizes.current()),
            sizes,
            inner_sizes,
        }
    }

    #[inline]
    pub fn table_size(&self) -> usize {
        self.array.len()
    }

    /// Number of occupied outer slots, i.e. distinct outer keys.
    #[inline]
    pub fn outer_len(&self) -> usize {
        self.array.occupied()
    }

    /// Number of stored `(K1, K2)` pairs.
    pub fn len(&self) -> usize {
        self.array.iter().map(|(_, s)| s.table.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.outer_len() == 0
    }

    pub fn hash1(&self, key: &K1) -> usize {
        poly_hash(key, self.table_size())
    }

    pub fn hash2(&self, key: &K2, sub_table: &ProbeTable<K2, V>) -> usize {
        poly_hash(key, sub_table.table_size())
    }

    fn probe_outer(&self, key: &K1) -> Probe {
        let size = self.table_size();
        let mut pos = self.hash1(key);
        for _ in 0..size {
            match self.array.get(pos) {
                None => return Probe::Vacant(pos),
                Some(slot) if slot.key == *key => return Probe::Found(pos),
                Some(_) => pos = (pos + 1) % size,
            }
        }
        Probe::Exhausted
    }

    fn new_inner(&self) -> ProbeTable<K2, V> {
        ProbeTable::with_hasher(self.inner_sizes.clone(), poly_hash::<K2>)
    }

    fn sub_table(&self, key: &K1) -> Result<&ProbeTable<K2, V>> {
        let Probe::Found(pos) = self.probe_outer(key) else {
            return Err(TableError::not_found(key));
        };
        self.array
            .get(pos)
            .map(|s| &s.table)
            .ok_or_else(|| TableError::not_found(key))
    }

    /// Finds the outer and inner slots holding `(k1, k2)`.
    fn locate(&self, k1: &K1, k2: &K2) -> Result<(usize, usize)> {
        let Probe::Found(pos) = self.probe_outer(k1) else {
            return Err(TableError::not_found(k1));
        };
        let Some(slot) = self.array.get(pos) else {
            return Err(TableError::not_found(k1));
        };
        Ok((pos, slot.table.position_of(k2)?))
    }

    /// Finds the slots a write of `(k1, k2)` belongs in, claiming a new outer slot with an empty
    /// inner table if `k1` is new. The inner position is computed without touching the inner
    /// table.
    fn locate_for_insert(&mut self, k1: K1, k2: &K2) -> Result<(usize, usize)> {
        match self.probe_outer(&k1) {
            Probe::Found(pos) => {
                let Some(slot) = self.array.get(pos) else {
                    unreachable!("probed outer slot {} is empty", pos)
                };
                Ok((pos, slot.table.intended_position(k2)?))
            }
            Probe::Vacant(pos) => {
                let table = self.new_inner();
                let inner = table.intended_position(k2)?;
                self.array.set(pos, OuterSlot { key: k1, table });
                Ok((pos, inner))
            }
            Probe::Exhausted => Err(TableError::TableFull {
                table_size: self.table_size(),
            }),
        }
    }

    pub fn get(&self, k1: &K1, k2: &K2) -> Result<&V> {
        let (pos, inner) = self.locate(k1, k2)?;
        self.array
            .get(pos)
            .and_then(|s| s.table.slot(inner))
            .map(|(_, v)| v)
            .ok_or_else(|| TableError::not_found(k2))
    }

    pub fn get_mut(&mut self, k1: &K1, k2: &K2) -> Result<&mut V> {
        let (pos, _) = self.locate(k1, k2)?;
        match self.array.get_mut(pos) {
            Some(slot) => slot.table.get_mut(k2),
            None => Err(TableError::not_found(k1)),
        }
    }

    pub fn contains(&self, k1: &K1, k2: &K2) -> bool {
        self.locate(k1, k2).is_ok()
    }

    /// Inserts or updates `(k1, k2)`, returning the value it replaced. Grows the outer table
    /// afterwards if more than half its slots are occupied.
    pub fn set(&mut self, k1: K1, k2: K2, value: V) -> Result<Option<V>> {
        let prev = self.put(k1, k2, value)?;
        if self.outer_len() * 2 > self.table_size() {
            self.grow()?;
        }
        Ok(prev)
    }

    fn put(&mut self, k1: K1, k2: K2, value: V) -> Result<Option<V>> {
        let (pos, inner) = self.locate_for_insert(k1, &k2)?;
        let Some(slot) = self.array.get_mut(pos) else {
            unreachable!("located outer slot {} is empty", pos)
        };
        Ok(slot.table.write_at(inner, k2, value))
    }

    /// Removes `(k1, k2)`. Removing the last inner key of `k1` frees its outer slot.
    pub fn remove(&mut self, k1: &K1, k2: &K2) -> Result<V> {
        let (pos, _) = self.locate(k1, k2)?;
        let Some(slot) = self.array.get_mut(pos) else {
            return Err(TableError::not_found(k1));
        };
        let value = slot.table.remove(k2)?;
        if slot.table.is_empty() {
            self.array.take(pos);
            self.repair_cluster(pos);
        }
        Ok(value)
    }

    // Re-places the outer slots following a freed one, up to the next empty slot, so that no
    // probe chain is cut short by the hole.
    fn repair_cluster(&mut self, freed: usize) {
        let size = self.table_size();
        let mut next = (freed + 1) % size;
        let mut moved = 0;
        while let Some(slot) = self.array.take(next) {
            match self.probe_outer(&slot.key) {
                Probe::Vacant(pos) => {
                    self.array.set(pos, slot);
                }
                _ => unreachable!("no free outer slot while repairing cluster"),
            }
            moved += 1;
            next = (next + 1) % size;
        }
        trace!("freed outer slot {}, re-placed {} following slots", freed, moved);
    }

    fn grow(&mut self) -> Result<()> {
        let old_size = self.table_size();
        if !self.sizes.advance() {
            debug!(
                "pair table at capacity {} cannot grow further ({} outer keys)",
                old_size,
                self.outer_len()
            );
            return Ok(());
        }

        let old_slots = self.array.drain_occupied();
        self.array = FixedArray::new(self.sizes.current());
        for OuterSlot { key, mut table } in old_slots {
            for (k2, v) in table.drain() {
                self.put(key.clone(), k2, v)?;
            }
        }
        debug!(
            "pair table grew {} -> {} ({} outer keys)",
            old_size,
            self.table_size(),
            self.outer_len()
        );
        Ok(())
    }

    /// Outer keys, in slot order.
    pub fn iter_keys(&self) -> impl Iterator<Item = &K1> {
        self.array.iter().map(|(_, s)| &s.key)
    }

    /// Inner keys stored under `k1`.
    pub fn iter_keys_in(&self, k1: &K1) -> Result<impl Iterator<Item = &K2>> {
        Ok(self.sub_table(k1)?.keys())
    }

    /// Every stored value, grouped by outer slot.
    pub fn iter_values(&self) -> impl Iterator<Item = &V> {
        self.array.iter().flat_map(|(_, s)| s.table.values())
    }

    /// Values stored under `k1`.
    pub fn iter_values_in(&self, k1: &K1) -> Result<impl Iterator<Item = &V>> {
        Ok(self.sub_table(k1)?.values())
    }

    pub fn keys(&self) -> Vec<&K1> {
        self.iter_keys().collect()
    }

    pub fn keys_in(&self, k1: &K1) -> Result<Vec<&K2>> {
        Ok(self.iter_keys_in(k1)?.collect())
    }

    pub fn values(&self) -> Vec<&V> {
        self.iter_values().collect()
    }

    pub fn values_in(&self, k1: &K1) -> Result<Vec<&V>> {
        Ok(self.iter_values_in(k1)?.collect())
    }
}

#[cfg(test)]
impl<K1: HashKey, K2: HashKey, V> PairKeyedTable<K1, K2, V> {
    /// Checks that every outer slot is non-empty and reachable from its key's home slot.
    pub(crate) fn validate(&self) {
        for (pos, slot) in self.array.iter() {
            assert!(!slot.table.is_empty(), "outer slot {} holds an empty table", pos);
            assert_eq!(self.probe_outer(&slot.key), Probe::Found(pos));
        }
    }
}
