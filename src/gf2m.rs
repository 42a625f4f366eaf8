//! Arithmetic in GF(2^m) for small m.
//!
//! Elements are polynomials over GF(2) modulo a fixed irreducible
//! polynomial of degree m, stored as integers whose bit k is the
//! coefficient of X^k. If you squint, the elements look like the binary
//! expansions of the integers counting up from zero, which gives an
//! obvious representation in a `u32` for m up to 31.
//!
//! Addition is XOR. Multiplication and inversion go through discrete-log
//! tables: construction walks the powers of the generator X, recording
//! exp\[i\] = X^i and the inverse mapping log. Every nonzero element is
//! then `exp[log[a]]`, products are sums of logs modulo 2^m - 1, and
//! inverses are negated logs. The table lookups are not constant-time;
//! that caveat holds for the whole crate.

use log::debug;
use rand::Rng;

use crate::error::{Error, Result};

/// Default irreducible (and primitive) polynomials per degree, m = 2..=31.
/// Bit k of an entry is the coefficient of X^k.
const DEFAULT_POLYS: [u32; 30] = [
    7,          // m =  2: x^2 + x + 1
    11,         // m =  3: x^3 + x + 1
    19,         // m =  4: x^4 + x + 1
    37,         // m =  5: x^5 + x^2 + 1
    67,         // m =  6: x^6 + x + 1
    131,        // m =  7: x^7 + x + 1
    285,        // m =  8: x^8 + x^4 + x^3 + x^2 + 1
    529,        // m =  9: x^9 + x^4 + 1
    1033,       // m = 10: x^10 + x^3 + 1
    2053,       // m = 11: x^11 + x^2 + 1
    4179,       // m = 12: x^12 + x^6 + x^4 + x + 1
    8219,       // m = 13: x^13 + x^4 + x^3 + x + 1
    17475,      // m = 14: x^14 + x^10 + x^6 + x + 1
    32771,      // m = 15: x^15 + x + 1
    65581,      // m = 16: x^16 + x^5 + x^3 + x^2 + 1
    131081,     // m = 17: x^17 + x^3 + 1
    262273,     // m = 18: x^18 + x^7 + 1
    524327,     // m = 19: x^19 + x^5 + x^2 + x + 1
    1048585,    // m = 20: x^20 + x^3 + 1
    2097157,    // m = 21: x^21 + x^2 + 1
    4194307,    // m = 22: x^22 + x + 1
    8388641,    // m = 23: x^23 + x^5 + 1
    16777243,   // m = 24: x^24 + x^4 + x^3 + x + 1
    33554441,   // m = 25: x^25 + x^3 + 1
    67108935,   // m = 26: x^26 + x^6 + x^2 + x + 1
    134217767,  // m = 27: x^27 + x^5 + x^2 + x + 1
    268435465,  // m = 28: x^28 + x^3 + 1
    536870917,  // m = 29: x^29 + x^2 + 1
    1073741907, // m = 30: x^30 + x^6 + x^4 + x + 1
    2147483657, // m = 31: x^31 + x^3 + 1
];

/// The field GF(2^m), 2 <= m <= 31.
///
/// Immutable after construction. Two fields are equal iff their degree
/// and reduction polynomial match; the tables are derived and shared
/// freely across threads behind an `Arc`.
pub struct Gf2mField {
    m: u32,
    poly: u32,
    exp: Vec<u32>,
    log: Vec<u32>,
}

impl Gf2mField {
    /// Construct the field using the default polynomial for `m`.
    pub fn new(m: u32) -> Result<Self> {
        if !(2..=31).contains(&m) {
            return Err(Error::Config("field degree must be in [2, 31]"));
        }
        Self::with_polynomial(m, DEFAULT_POLYS[(m - 2) as usize])
    }

    /// Construct the field from a caller-supplied polynomial of degree
    /// `m`. The polynomial must have no roots in GF(2) and X must
    /// generate the multiplicative group, otherwise the log/exp tables
    /// would be inconsistent.
    pub fn with_polynomial(m: u32, poly: u32) -> Result<Self> {
        if !(2..=31).contains(&m) {
            return Err(Error::Config("field degree must be in [2, 31]"));
        }
        if poly >> m != 1 {
            return Err(Error::Config("polynomial degree does not match field degree"));
        }
        // One-root test over GF(2): p(0) is the constant term, p(1) the
        // parity of the coefficients.
        if poly & 1 == 0 || poly.count_ones() % 2 == 0 {
            return Err(Error::Config("polynomial has a root in GF(2)"));
        }

        let size = 1usize << m;
        let mut exp = vec![0u32; size];
        let mut log = vec![0u32; size];
        exp[0] = 1;
        let mut e = 1u32;
        for x in exp.iter_mut().skip(1) {
            e <<= 1;
            if e & (1 << m) != 0 {
                e ^= poly;
            }
            *x = e;
        }
        if exp[size - 1] != 1 {
            return Err(Error::Config("polynomial is not irreducible"));
        }
        // An early return to 1 means X is not a generator: some elements
        // never occur as powers and the log table would be partial.
        if exp[1..size - 1].contains(&1) {
            return Err(Error::Config("X does not generate the multiplicative group"));
        }
        for (i, &x) in exp.iter().enumerate().take(size - 1) {
            log[x as usize] = i as u32;
        }

        debug!("constructed GF(2^{m}) with polynomial {poly:#x}");
        Ok(Self { m, poly, exp, log })
    }

    pub fn degree(&self) -> u32 {
        self.m
    }

    pub fn polynomial(&self) -> u32 {
        self.poly
    }

    /// Number of elements, 2^m.
    pub fn size(&self) -> u32 {
        1 << self.m
    }

    pub fn is_element(&self, a: u32) -> bool {
        a < self.size()
    }

    /// a + b = a - b = a XOR b in characteristic 2.
    pub fn add(&self, a: u32, b: u32) -> u32 {
        a ^ b
    }

    pub fn mult(&self, a: u32, b: u32) -> u32 {
        if a == 0 || b == 0 {
            return 0;
        }
        let order = (self.size() - 1) as usize;
        self.exp[(self.log[a as usize] as usize + self.log[b as usize] as usize) % order]
    }

    /// a^k; 0^0 is 1 by convention.
    pub fn pow(&self, a: u32, k: u32) -> u32 {
        if a == 0 {
            return if k == 0 { 1 } else { 0 };
        }
        let order = (self.size() - 1) as u64;
        self.exp[((self.log[a as usize] as u64 * k as u64) % order) as usize]
    }

    pub fn inverse(&self, a: u32) -> Result<u32> {
        if a == 0 {
            return Err(Error::Arithmetic("inverse of zero field element"));
        }
        let order = (self.size() - 1) as usize;
        Ok(self.exp[(order - self.log[a as usize] as usize) % order])
    }

    /// The unique square root of `a`: squaring is the Frobenius map, a
    /// bijection, and its inverse is a ↦ a^(2^(m-1)).
    pub fn sq_root(&self, a: u32) -> u32 {
        self.pow(a, 1 << (self.m - 1))
    }

    /// Solve x^2 + x = c. The left side is GF(2)-linear in x, so this
    /// reduces to an m×m linear system over the polynomial basis. Fails
    /// when c has trace 1, in which case no solution exists; when a
    /// solution exists, x and x + 1 both work and one of them is
    /// returned.
    pub fn solve_quadratic(&self, c: u32) -> Result<u32> {
        if !self.is_element(c) {
            return Err(Error::InvalidInput("not an element of this field"));
        }
        let m = self.m as usize;
        // Row i of the augmented system: coefficient bits over the
        // unknowns x_j in the low m bits, the right-hand side in bit m.
        let mut rows = vec![0u64; m];
        for j in 0..m {
            let e = 1u32 << j;
            let l = self.mult(e, e) ^ e;
            for (i, row) in rows.iter_mut().enumerate() {
                if (l >> i) & 1 == 1 {
                    *row |= 1 << j;
                }
            }
        }
        for (i, row) in rows.iter_mut().enumerate() {
            if (c >> i) & 1 == 1 {
                *row |= 1 << m;
            }
        }

        let mut pivots = Vec::new();
        let mut r = 0usize;
        for col in 0..m {
            if let Some(p) = (r..m).find(|&i| (rows[i] >> col) & 1 == 1) {
                rows.swap(r, p);
                for i in 0..m {
                    if i != r && (rows[i] >> col) & 1 == 1 {
                        rows[i] ^= rows[r];
                    }
                }
                pivots.push((r, col));
                r += 1;
            }
        }
        if rows[r..m].iter().any(|row| (row >> m) & 1 == 1) {
            return Err(Error::Arithmetic("quadratic has no solution in this field"));
        }
        let mut x = 0u32;
        for &(row, col) in &pivots {
            if (rows[row] >> m) & 1 == 1 {
                x |= 1 << col;
            }
        }
        Ok(x)
    }

    pub fn random_element<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.gen_range(0..self.size())
    }

    pub fn random_nonzero_element<R: Rng>(&self, rng: &mut R) -> u32 {
        loop {
            let e = rng.gen_range(0..self.size());
            if e != 0 {
                return e;
            }
        }
    }
}

impl PartialEq for Gf2mField {
    fn eq(&self, other: &Self) -> bool {
        self.m == other.m && self.poly == other.poly
    }
}

impl Eq for Gf2mField {}

impl std::fmt::Debug for Gf2mField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gf2mField")
            .field("m", &self.m)
            .field("poly", &self.poly)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn gf8_known_values() {
        // GF(8) with x^3 + x + 1 (0b1011).
        let f = Gf2mField::with_polynomial(3, 0b1011).unwrap();
        assert_eq!(f.mult(3, 5), 4);
        assert_eq!(f.inverse(3).unwrap(), 6);
        // (x+1)^2 = x^2 + 1, so sqrt(5) = 3; (x^2+x)^2 = x, so sqrt(2) = 6.
        assert_eq!(f.sq_root(5), 3);
        assert_eq!(f.sq_root(2), 6);
    }

    #[test]
    fn default_table_matches_explicit_gf8() {
        let a = Gf2mField::new(3).unwrap();
        let b = Gf2mField::with_polynomial(3, 11).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn degree_out_of_range() {
        assert!(Gf2mField::new(1).is_err());
        assert!(Gf2mField::new(32).is_err());
        assert!(Gf2mField::new(2).is_ok());
    }

    #[test]
    fn rejects_polynomial_with_gf2_root() {
        // x^2 + 1 = (x + 1)^2 has the root 1.
        assert!(Gf2mField::with_polynomial(2, 0b101).is_err());
        // x^2 + x has the root 0.
        assert!(Gf2mField::with_polynomial(2, 0b110).is_err());
    }

    #[test]
    fn inverse_of_zero_fails() {
        let f = Gf2mField::new(8).unwrap();
        assert!(f.inverse(0).is_err());
    }

    #[test]
    fn every_nonzero_element_has_inverse() {
        for m in [3u32, 8] {
            let f = Gf2mField::new(m).unwrap();
            for a in 1..f.size() {
                let inv = f.inverse(a).unwrap();
                assert_eq!(f.mult(a, inv), 1, "a = {a} in GF(2^{m})");
            }
        }
    }

    #[test]
    fn multiplication_commutes() {
        let f = Gf2mField::new(11).unwrap();
        let mut rng = thread_rng();
        for _ in 0..200 {
            let a = f.random_element(&mut rng);
            let b = f.random_element(&mut rng);
            assert_eq!(f.mult(a, b), f.mult(b, a));
        }
    }

    #[test]
    fn square_root_inverts_squaring() {
        let f = Gf2mField::new(10).unwrap();
        for a in 0..f.size() {
            let r = f.sq_root(a);
            assert_eq!(f.mult(r, r), a);
        }
    }

    #[test]
    fn pow_matches_repeated_mult() {
        let f = Gf2mField::new(5).unwrap();
        for a in 0..f.size() {
            let mut acc = 1;
            for k in 0..10 {
                assert_eq!(f.pow(a, k), acc);
                acc = f.mult(acc, a);
            }
        }
    }

    #[test]
    fn quadratic_solver_round_trip() {
        let f = Gf2mField::new(8).unwrap();
        let mut rng = thread_rng();
        for _ in 0..100 {
            let x = f.random_element(&mut rng);
            let c = f.add(f.mult(x, x), x);
            let got = f.solve_quadratic(c).unwrap();
            assert_eq!(f.add(f.mult(got, got), got), c);
        }
    }

    #[test]
    fn quadratic_solver_rejects_trace_one() {
        // Exactly half the elements are of the form x^2 + x; the rest
        // must be rejected.
        let f = Gf2mField::new(6).unwrap();
        let solvable = (0..f.size())
            .filter(|&c| f.solve_quadratic(c).is_ok())
            .count();
        assert_eq!(solvable as u32, f.size() / 2);
    }

    #[test]
    fn random_nonzero_is_nonzero() {
        let f = Gf2mField::new(4).unwrap();
        let mut rng = thread_rng();
        for _ in 0..50 {
            let e = f.random_nonzero_element(&mut rng);
            assert!(e != 0 && f.is_element(e));
        }
    }
}
