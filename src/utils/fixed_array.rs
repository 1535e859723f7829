use std::ops::Index;

/// A fixed-length run of slots, each either empty or holding one owned value. The length is set
/// at construction and never changes; growing means building a new array and moving values over.
pub struct FixedArray<T> {
    slots: Box<[Option<T>]>,
    occupied: usize,
}

impl<T> FixedArray<T> {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
            occupied: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of non-empty slots.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn is_occupied(&self, idx: usize) -> bool {
        self.slots[idx].is_some()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.slots[idx].as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots[idx].as_mut()
    }

    /// Places `value` at `idx`, returning whatever was there before.
    pub fn set(&mut self, idx: usize, value: T) -> Option<T> {
        let prev = self.slots[idx].replace(value);
        if prev.is_none() {
            self.occupied += 1;
        }
        prev
    }

    /// Empties the slot at `idx`.
    pub fn take(&mut self, idx: usize) -> Option<T> {
        let prev = self.slots[idx].take();
        if prev.is_some() {
            self.occupied -= 1;
        }
        prev
    }

    /// Iterates the raw slot layout, empty slots included.
    pub fn slots(&self) -> impl Iterator<Item = Option<&T>> {
        self.slots.iter().map(|s| s.as_ref())
    }

    /// Iterates occupied slots with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|v| (i, v)))
    }

    /// Moves every value out in slot order, leaving the array empty.
    pub fn drain_occupied(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.occupied);
        out.extend(self.slots.iter_mut().filter_map(|s| s.take()));
        self.occupied = 0;
        out
    }
}

impl<T> Index<usize> for FixedArray<T> {
    type Output = Option<T>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.slots[index]
    }
}
