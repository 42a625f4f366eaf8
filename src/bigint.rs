//! Arbitrary-precision helpers for the lattice side of the toolkit.
//!
//! NTRU message packing treats a byte string as one big integer and
//! expands it into base-q digits, q being the ring modulus. The digit
//! expansion here keeps the running value a big integer throughout; the
//! remainder is only narrowed once it is provably below q.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use crate::error::{Error, Result};
use crate::util;

/// Big-endian bytes of `b`, with no leading-zero trimming surprises:
/// zero encodes as a single zero byte.
pub fn to_byte_array(b: &BigUint) -> Vec<u8> {
    b.to_bytes_be()
}

pub fn from_byte_array(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Expand `b` into exactly `len` base-`q` digits, least significant
/// first. Fails if `b` does not fit in `len` digits.
pub fn to_int_array_mod_q(b: &BigUint, q: u32, len: usize) -> Result<Vec<u32>> {
    if q < 2 {
        return Err(Error::Config("radix must be at least 2"));
    }
    let q_big = BigUint::from(q);
    let mut rest = b.clone();
    let mut digits = vec![0u32; len];
    for d in digits.iter_mut() {
        // The modulus stays a big integer; the remainder is < q and
        // narrows losslessly.
        let (quot, rem) = rest.div_rem(&q_big);
        *d = rem
            .to_u32()
            .ok_or(Error::Arithmetic("division remainder exceeded the radix"))?;
        rest = quot;
    }
    if !rest.is_zero() {
        return Err(Error::InvalidInput("integer does not fit in digit array"));
    }
    Ok(digits)
}

/// Recompose base-`q` digits (least significant first) into an integer.
pub fn from_int_array(digits: &[u32], q: u32) -> Result<BigUint> {
    if q < 2 {
        return Err(Error::Config("radix must be at least 2"));
    }
    let q_big = BigUint::from(q);
    let mut acc = BigUint::zero();
    for &d in digits.iter().rev() {
        if d >= q {
            return Err(Error::InvalidInput("digit not below radix"));
        }
        acc = acc * &q_big + BigUint::from(d);
    }
    Ok(acc)
}

/// Equality through the byte encoding with an accumulator rather than an
/// early exit. The length of the encodings still leaks; full constant
/// time is out of scope here.
pub fn equals(a: &BigUint, b: &BigUint) -> bool {
    util::equals_u8(&a.to_bytes_be(), &b.to_bytes_be())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_round_trip() {
        let n = BigUint::from(0x0102_0304u32);
        assert_eq!(to_byte_array(&n), vec![1, 2, 3, 4]);
        assert_eq!(from_byte_array(&[1, 2, 3, 4]), n);
    }

    #[test]
    fn digit_expansion_round_trip() {
        let n = BigUint::from(123_456_789u32);
        let digits = to_int_array_mod_q(&n, 2048, 5).unwrap();
        for &d in &digits {
            assert!(d < 2048);
        }
        assert_eq!(from_int_array(&digits, 2048).unwrap(), n);
    }

    #[test]
    fn expansion_rejects_overflow() {
        // 2048^2 needs three digits.
        let n = BigUint::from(2048u32 * 2048);
        assert!(to_int_array_mod_q(&n, 2048, 2).is_err());
        assert!(to_int_array_mod_q(&n, 2048, 3).is_ok());
    }

    #[test]
    fn recompose_rejects_bad_digit() {
        assert!(from_int_array(&[2048], 2048).is_err());
    }

    #[test]
    fn compare_without_early_exit() {
        let a = BigUint::from(99u32);
        let b = BigUint::from(99u32);
        let c = BigUint::from(100u32);
        assert!(equals(&a, &b));
        assert!(!equals(&a, &c));
    }
}
