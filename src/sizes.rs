/// Prime capacities, roughly doubling. Large enough for a million entries per table.
pub const TABLE_SIZES: [usize; 19] = [
    5, 13, 29, 53, 97, 193, 389, 769, 1543, 3079, 6151, 12289, 24593, 49157, 98317, 196613,
    393241, 786433, 1572869,
];

/// The ladder of capacities a table grows through, with a cursor on the current one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeSchedule {
    sizes: Vec<usize>,
    index: usize,
}

impl SizeSchedule {
    pub fn new(sizes: Vec<usize>) -> Self {
        assert!(!sizes.is_empty(), "size schedule must not be empty");
        assert!(
            sizes.windows(2).all(|w| w[0] < w[1]),
            "size schedule must be strictly increasing"
        );
        Self { sizes, index: 0 }
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.sizes[self.index]
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Moves to the next capacity. Returns false, without moving, once the ladder is exhausted.
    pub fn advance(&mut self) -> bool {
        if self.index + 1 >= self.sizes.len() {
            return false;
        }
        self.index += 1;
        true
    }
}

impl Default for SizeSchedule {
    fn default() -> Self {
        Self::new(TABLE_SIZES.to_vec())
    }
}

impl From<Option<Vec<usize>>> for SizeSchedule {
    fn from(sizes: Option<Vec<usize>>) -> Self {
        sizes.map(SizeSchedule::new).unwrap_or_default()
    }
}
