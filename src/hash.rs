/// Word-at-a-time key hash.
///
/// Sums the key as 4-byte little-endian words with wrapping arithmetic, then
/// adds any tail bytes one at a time. Cheap and deterministic, and it
/// collides easily (`"ab"` and `"ba"` hash alike), so callers must compare
/// key bytes on every hash match.
#[inline(always)]
pub fn hash_key(key: &[u8]) -> i32 {
    let mut words = key.chunks_exact(4);
    let mut hash: i32 = 0;
    for w in words.by_ref() {
        hash = hash.wrapping_add(i32::from_le_bytes([w[0], w[1], w[2], w[3]]));
    }
    for &b in words.remainder() {
        hash = hash.wrapping_add(b as i32);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = b"Cardinal";
        let b = b"Greater Manchester";
        assert_eq!(hash_key(a), hash_key(a));
        assert_eq!(hash_key(b), hash_key(b));
        assert_ne!(hash_key(a), hash_key(b));
    }

    #[test]
    fn empty_key_hashes_to_zero() {
        assert_eq!(hash_key(b""), 0);
    }

    #[test]
    fn tail_bytes_are_added_individually() {
        assert_eq!(hash_key(b"A"), 65);
        assert_eq!(hash_key(b"AB"), 65 + 66);
        assert_eq!(hash_key(b"ab"), hash_key(b"ba"));
    }

    #[test]
    fn words_are_little_endian() {
        let expected = i32::from_le_bytes(*b"abcd");
        assert_eq!(hash_key(b"abcd"), expected);
        assert_eq!(hash_key(b"abcdX"), expected + b'X' as i32);
    }

    #[test]
    fn sum_wraps() {
        let key = [0xffu8; 64];
        assert_eq!(hash_key(&key), (-1i32).wrapping_mul(16));
    }

    #[test]
    fn reordered_words_collide() {
        assert_eq!(hash_key(b"abcdefgh"), hash_key(b"efghabcd"));
    }
}
