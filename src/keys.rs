use std::fmt::{Debug, Display};

use num_traits::{Num, Unsigned};

/// A key viewed as a sequence of character codes. Both table kinds hash keys code by code, so
/// this is all they need to know about a key beyond equality.
pub trait HashKey: Eq + Clone + Debug {
    /// Returns the number of character codes in the key.
    fn code_len(&self) -> usize;
    /// Returns the code at `pos`, or `None` past the end of the key.
    fn code_at(&self, pos: usize) -> Option<u32>;
    /// Returns the codes of the key in order.
    fn codes(&self) -> Box<dyn Iterator<Item = u32> + '_>;
    /// Returns the key truncated to its first `len` codes.
    fn prefix(&self, len: usize) -> Self;
}

// Unicode scalar values, one per char.
impl HashKey for String {
    fn code_len(&self) -> usize {
        self.chars().count()
    }

    fn code_at(&self, pos: usize) -> Option<u32> {
        self.chars().nth(pos).map(|c| c as u32)
    }

    fn codes(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(self.chars().map(|c| c as u32))
    }

    fn prefix(&self, len: usize) -> Self {
        self.chars().take(len).collect()
    }
}

impl HashKey for Vec<u8> {
    fn code_len(&self) -> usize {
        self.len()
    }

    fn code_at(&self, pos: usize) -> Option<u32> {
        self.get(pos).map(|&b| b as u32)
    }

    fn codes(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(self.iter().map(|&b| b as u32))
    }

    fn prefix(&self, len: usize) -> Self {
        self[..len.min(self.len())].to_vec()
    }
}

/// Renders an unsigned category (e.g. a difficulty level) as an outer key.
pub fn decimal_key<T: Unsigned + Display>(n: T) -> String {
    n.to_string()
}

/// Reverses `decimal_key`. Returns `None` for keys that are not base-10 numbers.
pub fn parse_decimal_key<T: Num>(key: &str) -> Option<T> {
    T::from_str_radix(key, 10).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_codes() {
        let k = String::from("K2é");
        assert_eq!(k.code_len(), 3);
        assert_eq!(k.code_at(0), Some('K' as u32));
        assert_eq!(k.code_at(2), Some('é' as u32));
        assert_eq!(k.code_at(3), None);
        assert_eq!(k.codes().collect::<Vec<_>>(), vec![75, 50, 233]);
        assert_eq!(k.prefix(2), "K2");
        assert_eq!(k.prefix(10), "K2é");
    }

    #[test]
    fn test_byte_codes() {
        let k = b"abc".to_vec();
        assert_eq!(k.code_len(), 3);
        assert_eq!(k.code_at(1), Some(98));
        assert_eq!(k.code_at(3), None);
        assert_eq!(k.prefix(1), b"a".to_vec());
        assert_eq!(k.prefix(7), b"abc".to_vec());
    }

    #[test]
    fn test_decimal_keys() {
        assert_eq!(decimal_key(7u32), "7");
        assert_eq!(parse_decimal_key::<u32>("12"), Some(12));
        assert_eq!(parse_decimal_key::<u32>("x12"), None);
        let mut levels: Vec<u64> = ["10", "2", "1"]
            .iter()
            .filter_map(|k| parse_decimal_key(k))
            .collect();
        levels.sort();
        assert_eq!(levels, vec![1, 2, 10]);
    }
}
