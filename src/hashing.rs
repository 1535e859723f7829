use crate::keys::HashKey;

pub const HASH_SEED: u128 = 31415;
pub const HASH_BASE: u128 = 31;

/// Polynomial rolling hash of `key` into `[0, modulus)`. The multiplier is itself reduced modulo
/// `modulus - 1` after every character, so the result depends on the table size as a whole and
/// must be recomputed whenever the size changes.
pub fn poly_hash<K: HashKey>(key: &K, modulus: usize) -> usize {
    if modulus <= 1 {
        return 0;
    }
    let m = modulus as u128;
    let mut value: u128 = 0;
    let mut a = HASH_SEED;
    for code in key.codes() {
        value = (code as u128 + a * value) % m;
        a = a * HASH_BASE % (m - 1);
    }
    value as usize
}
