//! Byte-array primitives: XOR, hex, split, concat and a one-shot hash.
//!
//! These are the glue the encoding layers sit on. XOR cycles the shorter
//! operand, which makes single-byte masks and repeating-key patterns fall
//! out of the same function.

use crate::error::{Error, Result};

/// XOR `a` against `x`, cycling `x` if it is shorter than `a`.
pub fn xor(a: &[u8], x: &[u8]) -> Vec<u8> {
    std::iter::zip(a, x.iter().cycle())
        .map(|(&a, &b)| a ^ b)
        .collect()
}

/// Concatenate two byte strings into a fresh buffer.
pub fn concat(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}

/// Split `a` at `index`, failing instead of panicking when the index is
/// past the end.
pub fn split(a: &[u8], index: usize) -> Result<(Vec<u8>, Vec<u8>)> {
    if index > a.len() {
        return Err(Error::InvalidInput("split index past end of buffer"));
    }
    let (l, r) = a.split_at(index);
    Ok((l.to_vec(), r.to_vec()))
}

pub fn to_hex(input: &[u8]) -> String {
    hex::encode(input)
}

pub fn from_hex(input: &str) -> Result<Vec<u8>> {
    hex::decode(input).map_err(|_| Error::Encoding("invalid hex string"))
}

/// SHA-256 of a byte string.
pub fn sha256(input: &[u8]) -> Vec<u8> {
    hmac_sha256::Hash::hash(input).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_cycles_short_operand() {
        assert_eq!(xor(&[0xff, 0x00, 0xff], &[0x0f]), vec![0xf0, 0x0f, 0xf0]);
        assert_eq!(xor(&[1, 2, 3], &[1, 2, 3]), vec![0, 0, 0]);
    }

    #[test]
    fn concat_and_split_round_trip() {
        let joined = concat(b"head", b"tail");
        let (l, r) = split(&joined, 4).unwrap();
        assert_eq!(l, b"head");
        assert_eq!(r, b"tail");
        assert!(split(b"abc", 4).is_err());
    }

    #[test]
    fn hex_round_trip() {
        let bytes = from_hex("00ff10").unwrap();
        assert_eq!(bytes, vec![0x00, 0xff, 0x10]);
        assert_eq!(to_hex(&bytes), "00ff10");
        assert!(from_hex("zz").is_err());
    }

    #[test]
    fn sha256_known_vector() {
        // SHA-256 of the empty string.
        assert_eq!(
            to_hex(&sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
