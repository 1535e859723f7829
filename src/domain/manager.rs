use crate::domain::mountain::Mountain;
use crate::error::Result;
use crate::keys::{decimal_key, parse_decimal_key};
use crate::pair_table::PairKeyedTable;

/// Stores mountains under `(difficulty, name)`.
#[derive(Default)]
pub struct MountainManager {
    mountains: PairKeyedTable<String, String, Mountain>,
}

fn key_of(mountain: &Mountain) -> (String, String) {
    (decimal_key(mountain.difficulty_level), mountain.name.clone())
}

impl MountainManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.mountains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mountains.is_empty()
    }

    /// Adds `mountain`, replacing any mountain with the same name and difficulty.
    pub fn add_mountain(&mut self, mountain: Mountain) -> Result<()> {
        let (difficulty, name) = key_of(&mountain);
        self.mountains.set(difficulty, name, mountain)?;
        Ok(())
    }

    pub fn remove_mountain(&mut self, mountain: &Mountain) -> Result<Mountain> {
        let (difficulty, name) = key_of(mountain);
        self.mountains.remove(&difficulty, &name)
    }

    /// Replaces `old` with `new`. Nothing changes if `old` is not stored.
    pub fn edit_mountain(&mut self, old: &Mountain, new: Mountain) -> Result<()> {
        self.remove_mountain(old)?;
        self.add_mountain(new)
    }

    /// Every mountain at difficulty `diff`; empty if there are none.
    pub fn mountains_with_difficulty(&self, diff: u32) -> Vec<&Mountain> {
        self.mountains
            .iter_values_in(&decimal_key(diff))
            .map(|it| it.collect())
            .unwrap_or_default()
    }

    /// Mountains grouped by difficulty, easiest group first.
    pub fn group_by_difficulty(&self) -> Vec<Vec<&Mountain>> {
        let mut difficulties: Vec<u32> = self
            .mountains
            .iter_keys()
            .filter_map(|k| parse_decimal_key(k))
            .collect();
        difficulties.sort_unstable();
        difficulties
            .into_iter()
            .map(|d| self.mountains_with_difficulty(d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::MountainManager;
    use crate::domain::mountain::Mountain;
    use crate::error::TableError;

    fn names(ms: &[&Mountain]) -> Vec<String> {
        let mut names: Vec<String> = ms.iter().map(|m| m.name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_group_by_difficulty() {
        let mut mm = MountainManager::new();
        mm.add_mountain(Mountain::new("Everest", 12, 3)).unwrap();
        mm.add_mountain(Mountain::new("K2", 2, 4)).unwrap();
        mm.add_mountain(Mountain::new("Lhotse", 2, 5)).unwrap();
        mm.add_mountain(Mountain::new("Makalu", 7, 2)).unwrap();
        assert_eq!(mm.len(), 4);

        let groups = mm.group_by_difficulty();
        assert_eq!(groups.len(), 3);
        assert_eq!(names(&groups[0]), vec!["K2", "Lhotse"]);
        assert_eq!(names(&groups[1]), vec!["Makalu"]);
        assert_eq!(names(&groups[2]), vec!["Everest"]);
    }

    #[test]
    fn test_edit_and_remove() {
        let mut mm = MountainManager::new();
        let k2 = Mountain::new("K2", 2, 4);
        mm.add_mountain(k2.clone()).unwrap();
        mm.add_mountain(Mountain::new("Lhotse", 2, 5)).unwrap();

        let harder = Mountain::new("K2", 9, 4);
        mm.edit_mountain(&k2, harder.clone()).unwrap();
        assert_eq!(names(&mm.mountains_with_difficulty(2)), vec!["Lhotse"]);
        assert_eq!(mm.mountains_with_difficulty(9), vec![&harder]);

        // The old record is gone, so editing it again fails and changes nothing.
        assert!(matches!(
            mm.edit_mountain(&k2, Mountain::new("K2", 1, 1)),
            Err(TableError::KeyNotFound(_))
        ));
        assert!(mm.mountains_with_difficulty(1).is_empty());

        assert_eq!(mm.remove_mountain(&harder), Ok(harder));
        assert!(mm.mountains_with_difficulty(9).is_empty());
        assert_eq!(mm.group_by_difficulty().len(), 1);
    }
}
