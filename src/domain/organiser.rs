use log::debug;

use crate::domain::mountain::Mountain;
use crate::error::{Result, TableError};
use crate::trie_table::DigitTrieTable;

/// Keeps mountains by name and answers where a name ranks among them.
#[derive(Default)]
pub struct MountainOrganiser {
    mountains: DigitTrieTable<String, Mountain>,
}

impl MountainOrganiser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.mountains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mountains.is_empty()
    }

    /// Zero-based rank of `mountain`'s name among all stored names, in ascending order.
    pub fn cur_position(&self, mountain: &Mountain) -> Result<usize> {
        self.mountains
            .sort_keys()
            .binary_search(&&mountain.name)
            .map_err(|_| TableError::not_found(&mountain.name))
    }

    /// Adds every mountain, a later mountain replacing an earlier one of the same name. Stops at
    /// the first mountain that cannot be stored.
    pub fn add_mountains<I: IntoIterator<Item = Mountain>>(&mut self, mountains: I) -> Result<()> {
        let before = self.len();
        for mountain in mountains {
            self.mountains.insert(mountain.name.clone(), mountain)?;
        }
        debug!("organiser holds {} mountains (was {})", self.len(), before);
        Ok(())
    }
}
