//! Dense polynomials over GF(2^m).
//!
//! Coefficients sit in a plain vector indexed by exponent, with the
//! degree cached and re-scanned whenever a coefficient-mutating call
//! lands. The zero polynomial has degree -1. Arithmetic hands back fresh
//! instances; the `*_this_*` variants mutate in place and recompute the
//! degree.
//!
//! Multiplication is Karatsuba all the way down to constant multiplies:
//! split both operands at the middle, do three half-size products, and
//! stitch them together with two monomial shifts. Division, gcd, modular
//! inverse and the square-root machinery are the textbook algorithms run
//! over the field's table arithmetic; the continued-fraction split
//! (`mod_polynomial_to_fraction`) is the half-gcd step Patterson's
//! decoder relies on.

use std::sync::Arc;

use rand::Rng;
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::gf2m::Gf2mField;
use crate::util;
use crate::vector::Gf2mVector;

#[derive(Clone)]
pub struct Gf2mPoly {
    field: Arc<Gf2mField>,
    coefficients: Vec<u32>,
    degree: i32,
}

// ---------------------------------------------------------------------
// coefficient-array helpers

fn compute_degree(a: &[u32]) -> i32 {
    match a.iter().rposition(|&c| c != 0) {
        Some(i) => i as i32,
        None => -1,
    }
}

fn head_coefficient(a: &[u32]) -> u32 {
    match compute_degree(a) {
        -1 => 0,
        d => a[d as usize],
    }
}

/// Trim trailing zeros; the zero polynomial normalizes to `[0]`.
fn normal_form(a: &[u32]) -> Vec<u32> {
    match compute_degree(a) {
        -1 => vec![0],
        d => a[..=(d as usize)].to_vec(),
    }
}

fn add_arrays(a: &[u32], b: &[u32]) -> Vec<u32> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = long.to_vec();
    for (o, &s) in out.iter_mut().zip(short.iter()) {
        *o ^= s;
    }
    out
}

fn mult_with_element_arr(a: &[u32], element: u32, field: &Gf2mField) -> Vec<u32> {
    match element {
        0 => vec![0],
        1 => a.to_vec(),
        _ => a.iter().map(|&c| field.mult(c, element)).collect(),
    }
}

fn mult_with_monomial_arr(a: &[u32], k: usize) -> Vec<u32> {
    let d = compute_degree(a);
    if d == -1 {
        return vec![0];
    }
    let mut out = vec![0u32; d as usize + k + 1];
    out[k..].copy_from_slice(&a[..=(d as usize)]);
    out
}

fn multiply_arr(a: &[u32], b: &[u32], field: &Gf2mField) -> Vec<u32> {
    let (m1, m2) = if compute_degree(a) < compute_degree(b) {
        (b, a)
    } else {
        (a, b)
    };
    let m1 = normal_form(m1);
    let m2 = normal_form(m2);
    if m2.len() == 1 {
        return mult_with_element_arr(&m1, m2[0], field);
    }

    let d1 = m1.len();
    let d2 = m2.len();
    if d1 != d2 {
        // Split the longer operand; the lower part now matches the
        // shorter operand's length exactly.
        let low = multiply_arr(&m1[..d2], &m2, field);
        let high = multiply_arr(&m1[d2..], &m2, field);
        let high = mult_with_monomial_arr(&high, d2);
        add_arrays(&low, &high)
    } else {
        let half = (d1 + 1) >> 1;
        let (a1, a2) = m1.split_at(half);
        let (b1, b2) = m2.split_at(half);
        let combined_a = add_arrays(a1, a2);
        let combined_b = add_arrays(b1, b2);
        let low = multiply_arr(a1, b1, field);
        let cross = multiply_arr(&combined_a, &combined_b, field);
        let high = multiply_arr(a2, b2, field);
        // (a1 + a2)(b1 + b2) + a1·b1 + a2·b2 = a1·b2 + a2·b1
        let mut middle = add_arrays(&cross, &low);
        middle = add_arrays(&middle, &high);
        let middle = mult_with_monomial_arr(&middle, half);
        let high = mult_with_monomial_arr(&high, 2 * half);
        add_arrays(&add_arrays(&low, &middle), &high)
    }
}

fn div_arr(a: &[u32], f: &[u32], field: &Gf2mField) -> Result<(Vec<u32>, Vec<u32>)> {
    let df = compute_degree(f);
    if df == -1 {
        return Err(Error::Arithmetic("division by zero polynomial"));
    }
    let hc_inv = field.inverse(head_coefficient(f))?;
    let mut q: Vec<u32> = vec![0];
    let mut r = normal_form(a);
    while df <= compute_degree(&r) {
        let coeff = field.mult(head_coefficient(&r), hc_inv);
        let shift = (compute_degree(&r) - df) as usize;
        let sub = mult_with_monomial_arr(&mult_with_element_arr(f, coeff, field), shift);
        q = add_arrays(&mult_with_monomial_arr(&[coeff], shift), &q);
        r = add_arrays(&sub, &r);
    }
    Ok((q, r))
}

fn mod_arr(a: &[u32], f: &[u32], field: &Gf2mField) -> Result<Vec<u32>> {
    Ok(div_arr(a, f, field)?.1)
}

fn mod_multiply_arr(a: &[u32], b: &[u32], modulus: &[u32], field: &Gf2mField) -> Result<Vec<u32>> {
    mod_arr(&multiply_arr(a, b, field), modulus, field)
}

/// Monic gcd via Euclid's algorithm.
fn gcd_arr(f: &[u32], g: &[u32], field: &Gf2mField) -> Result<Vec<u32>> {
    if compute_degree(f) == -1 && compute_degree(g) == -1 {
        return Err(Error::Arithmetic("gcd of two zero polynomials"));
    }
    let mut a = normal_form(f);
    let mut b = normal_form(g);
    while compute_degree(&b) != -1 {
        let r = mod_arr(&a, &b, field)?;
        a = b;
        b = normal_form(&r);
    }
    let hc_inv = field.inverse(head_coefficient(&a))?;
    Ok(mult_with_element_arr(&a, hc_inv, field))
}

/// a / b mod g by the extended Euclidean algorithm. The invariant is
/// r_i · (a/b) ≡ s_i (mod g); the loop ends with r_i a constant, which
/// must be a unit for the quotient to exist.
fn mod_div_arr(a: &[u32], b: &[u32], g: &[u32], field: &Gf2mField) -> Result<Vec<u32>> {
    let mut r0 = normal_form(g);
    let mut r1 = mod_arr(b, g, field)?;
    let mut s0 = vec![0u32];
    let mut s1 = mod_arr(a, g, field)?;
    while compute_degree(&r1) != -1 {
        let (q, rem) = div_arr(&r0, &r1, field)?;
        r0 = r1;
        r1 = normal_form(&rem);
        let s2 = add_arrays(&s0, &mod_multiply_arr(&q, &s1, g, field)?);
        s0 = s1;
        s1 = s2;
    }
    if compute_degree(&r0) != 0 {
        return Err(Error::Arithmetic("polynomial has no inverse modulo the modulus"));
    }
    let hc_inv = field.inverse(head_coefficient(&r0))?;
    Ok(mult_with_element_arr(&s0, hc_inv, field))
}

fn is_irreducible_arr(a: &[u32], field: &Gf2mField) -> Result<bool> {
    let a = normal_form(a);
    let d = compute_degree(&a);
    if d < 1 {
        return Ok(false);
    }
    // Degree 1 never factors into non-units; beyond that, a zero
    // constant term means X divides the polynomial.
    if d >= 2 && a[0] == 0 {
        return Ok(false);
    }
    // Irreducible over GF(2^m) iff gcd(X^(2^(m·i)) + X, a) is constant
    // for every i up to half the degree. u runs through the repeated
    // squarings of X modulo a.
    let x = [0u32, 1];
    let mut u = vec![0u32, 1];
    for _ in 0..(d >> 1) {
        for _ in 0..field.degree() {
            u = mod_multiply_arr(&u, &u, &a, field)?;
        }
        u = normal_form(&u);
        let g = gcd_arr(&add_arrays(&u, &x), &a, field)?;
        if compute_degree(&g) != 0 {
            return Ok(false);
        }
    }
    Ok(true)
}

// ---------------------------------------------------------------------

impl Gf2mPoly {
    fn from_raw(field: Arc<Gf2mField>, mut coefficients: Vec<u32>) -> Self {
        if coefficients.is_empty() {
            coefficients.push(0);
        }
        let degree = compute_degree(&coefficients);
        Self {
            field,
            coefficients,
            degree,
        }
    }

    pub fn zero(field: Arc<Gf2mField>) -> Self {
        Self::from_raw(field, vec![0])
    }

    pub fn constant(field: Arc<Gf2mField>, c: u32) -> Result<Self> {
        if !field.is_element(c) {
            return Err(Error::InvalidInput("constant is not an element of the field"));
        }
        Ok(Self::from_raw(field, vec![c]))
    }

    /// X^k.
    pub fn monomial(field: Arc<Gf2mField>, k: usize) -> Self {
        let mut coefficients = vec![0u32; k + 1];
        coefficients[k] = 1;
        Self::from_raw(field, coefficients)
    }

    pub fn from_coefficients(field: Arc<Gf2mField>, coefficients: &[u32]) -> Result<Self> {
        if coefficients.iter().any(|&c| !field.is_element(c)) {
            return Err(Error::InvalidInput("coefficient is not an element of the field"));
        }
        Ok(Self::from_raw(field, coefficients.to_vec()))
    }

    /// Reinterpret a GF(2^m) vector as the polynomial whose coefficient
    /// of X^i is the vector's element i.
    pub fn from_vector(v: &Gf2mVector) -> Self {
        Self::from_raw(v.field().clone(), v.elements().to_vec())
    }

    /// A uniformly random monic irreducible polynomial of the given
    /// degree with nonzero constant term; resamples one coefficient at a
    /// time until the irreducibility test passes.
    pub fn random_irreducible<R: Rng>(
        field: &Arc<Gf2mField>,
        degree: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if degree < 1 {
            return Err(Error::Config("irreducible polynomial degree must be positive"));
        }
        let mut coefficients = vec![0u32; degree + 1];
        coefficients[degree] = 1;
        coefficients[0] = field.random_nonzero_element(rng);
        for c in coefficients[1..degree].iter_mut() {
            *c = field.random_element(rng);
        }
        while !is_irreducible_arr(&coefficients, field)? {
            let n = rng.gen_range(0..degree);
            if n == 0 {
                coefficients[0] = field.random_nonzero_element(rng);
            } else {
                coefficients[n] = field.random_element(rng);
            }
        }
        Ok(Self::from_raw(field.clone(), coefficients))
    }

    /// Parse the wire form: ⌈m/8⌉ bytes per coefficient, little-endian
    /// within each coefficient. The head coefficient must be nonzero
    /// unless the whole polynomial is a single coefficient.
    pub fn decode(field: Arc<Gf2mField>, enc: &[u8]) -> Result<Self> {
        let count = (field.degree() as usize + 7) / 8;
        if enc.is_empty() || enc.len() % count != 0 {
            return Err(Error::Encoding("byte length is not a multiple of the coefficient size"));
        }
        let mut coefficients = vec![0u32; enc.len() / count];
        for (i, chunk) in enc.chunks(count).enumerate() {
            let mut c = 0u32;
            for (j, &byte) in chunk.iter().enumerate() {
                c ^= (byte as u32) << (8 * j);
            }
            if !field.is_element(c) {
                return Err(Error::Encoding("decoded coefficient is not a field element"));
            }
            coefficients[i] = c;
        }
        if coefficients.len() != 1 && coefficients[coefficients.len() - 1] == 0 {
            return Err(Error::Encoding("head coefficient of encoded polynomial is zero"));
        }
        Ok(Self::from_raw(field, coefficients))
    }

    pub fn encoded(&self) -> Vec<u8> {
        let count = (self.field.degree() as usize + 7) / 8;
        let mut out = Vec::with_capacity(self.coefficients.len() * count);
        for &c in &self.coefficients {
            for j in 0..count {
                out.push((c >> (8 * j)) as u8);
            }
        }
        out
    }

    pub fn field(&self) -> &Arc<Gf2mField> {
        &self.field
    }

    pub fn degree(&self) -> i32 {
        self.degree
    }

    pub fn is_zero(&self) -> bool {
        self.degree == -1
    }

    /// Coefficient of X^i; zero beyond the stored length.
    pub fn coefficient(&self, i: usize) -> u32 {
        self.coefficients.get(i).copied().unwrap_or(0)
    }

    pub fn head_coefficient(&self) -> u32 {
        head_coefficient(&self.coefficients)
    }

    pub fn coefficients(&self) -> &[u32] {
        &self.coefficients
    }

    /// Horner evaluation, Θ(deg) field operations.
    pub fn evaluate_at(&self, e: u32) -> u32 {
        let mut result = 0;
        for &c in self.coefficients.iter().rev() {
            result = self.field.add(self.field.mult(result, e), c);
        }
        result
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::from_raw(
            self.field.clone(),
            add_arrays(&self.coefficients, &other.coefficients),
        )
    }

    pub fn add_to_this(&mut self, other: &Self) {
        self.coefficients = add_arrays(&self.coefficients, &other.coefficients);
        self.degree = compute_degree(&self.coefficients);
    }

    /// this + X^k.
    pub fn add_monomial(&self, k: usize) -> Self {
        let mono = mult_with_monomial_arr(&[1], k);
        Self::from_raw(self.field.clone(), add_arrays(&self.coefficients, &mono))
    }

    pub fn mult_with_element(&self, element: u32) -> Result<Self> {
        if !self.field.is_element(element) {
            return Err(Error::Arithmetic("multiplier is not an element of the field"));
        }
        Ok(Self::from_raw(
            self.field.clone(),
            mult_with_element_arr(&self.coefficients, element, &self.field),
        ))
    }

    pub fn mult_this_with_element(&mut self, element: u32) -> Result<()> {
        if !self.field.is_element(element) {
            return Err(Error::Arithmetic("multiplier is not an element of the field"));
        }
        self.coefficients = mult_with_element_arr(&self.coefficients, element, &self.field);
        self.degree = compute_degree(&self.coefficients);
        Ok(())
    }

    /// this · X^k.
    pub fn mult_with_monomial(&self, k: usize) -> Self {
        Self::from_raw(
            self.field.clone(),
            mult_with_monomial_arr(&self.coefficients, k),
        )
    }

    pub fn multiply(&self, other: &Self) -> Self {
        Self::from_raw(
            self.field.clone(),
            multiply_arr(&self.coefficients, &other.coefficients, &self.field),
        )
    }

    /// Division with remainder: returns (q, r) with this = q·f + r and
    /// deg r < deg f.
    pub fn div(&self, f: &Self) -> Result<(Self, Self)> {
        let (q, r) = div_arr(&self.coefficients, &f.coefficients, &self.field)?;
        Ok((
            Self::from_raw(self.field.clone(), q),
            Self::from_raw(self.field.clone(), r),
        ))
    }

    /// this mod f.
    pub fn rem(&self, f: &Self) -> Result<Self> {
        let r = mod_arr(&self.coefficients, &f.coefficients, &self.field)?;
        Ok(Self::from_raw(self.field.clone(), r))
    }

    pub fn gcd(&self, other: &Self) -> Result<Self> {
        let g = gcd_arr(&self.coefficients, &other.coefficients, &self.field)?;
        Ok(Self::from_raw(self.field.clone(), g))
    }

    pub fn mod_multiply(&self, other: &Self, modulus: &Self) -> Result<Self> {
        let r = mod_multiply_arr(
            &self.coefficients,
            &other.coefficients,
            &modulus.coefficients,
            &self.field,
        )?;
        Ok(Self::from_raw(self.field.clone(), r))
    }

    /// this / divisor mod modulus.
    pub fn mod_div(&self, divisor: &Self, modulus: &Self) -> Result<Self> {
        let r = mod_div_arr(
            &self.coefficients,
            &divisor.coefficients,
            &modulus.coefficients,
            &self.field,
        )?;
        Ok(Self::from_raw(self.field.clone(), r))
    }

    pub fn mod_inverse(&self, modulus: &Self) -> Result<Self> {
        let one = [1u32];
        let r = mod_div_arr(&one, &self.coefficients, &modulus.coefficients, &self.field)?;
        Ok(Self::from_raw(self.field.clone(), r))
    }

    /// Square root in GF(2^m)\[X\]/modulus by fixed-point iteration:
    /// squaring is a permutation of the quotient ring, so iterating it
    /// from `this` must come back around to `this`, and the stop just
    /// before that is the square root. The modulus must be squarefree
    /// (irreducible, in all uses here) for squaring to be a permutation.
    pub fn mod_square_root(&self, modulus: &Self) -> Result<Self> {
        let target = mod_arr(&self.coefficients, &modulus.coefficients, &self.field)?;
        let mut r = target.clone();
        loop {
            let sq = mod_multiply_arr(&r, &r, &modulus.coefficients, &self.field)?;
            if util::equals_u32(&normal_form(&sq), &normal_form(&target)) {
                return Ok(Self::from_raw(self.field.clone(), r));
            }
            r = sq;
        }
    }

    /// Square root through a precomputed matrix: apply the inverse of
    /// the squaring map (columns of `matrix`) to the coefficients, then
    /// take the field square root of each resulting coefficient. The
    /// input must already be reduced modulo the ring modulus: only the
    /// first `matrix.len()` coefficients are read.
    pub fn mod_square_root_matrix(&self, matrix: &[Gf2mPoly]) -> Self {
        let t = matrix.len();
        let mut result = vec![0u32; t];
        for (i, r) in result.iter_mut().enumerate() {
            for (j, column) in matrix.iter().enumerate() {
                let cj = self.coefficient(j);
                let mij = column.coefficient(i);
                if cj != 0 && mij != 0 {
                    *r = self.field.add(*r, self.field.mult(mij, cj));
                }
            }
        }
        for c in result.iter_mut() {
            *c = self.field.sq_root(*c);
        }
        Self::from_raw(self.field.clone(), result)
    }

    /// Half-gcd split: run the extended Euclidean algorithm on
    /// (g, this mod g) and stop as soon as the remainder degree drops to
    /// ⌊deg g / 2⌋, returning (a, b) with b·this ≡ a (mod g).
    pub fn mod_polynomial_to_fraction(&self, g: &Self) -> Result<(Self, Self)> {
        let dg = compute_degree(&g.coefficients);
        if dg == -1 {
            return Err(Error::Arithmetic("fraction modulus is the zero polynomial"));
        }
        let half = dg / 2;
        let mut a0 = normal_form(&g.coefficients);
        let mut a1 = mod_arr(&self.coefficients, &g.coefficients, &self.field)?;
        let mut b0 = vec![0u32];
        let mut b1 = vec![1u32];
        while compute_degree(&a1) > half {
            let (q, r) = div_arr(&a0, &a1, &self.field)?;
            a0 = a1;
            a1 = normal_form(&r);
            let b2 = add_arrays(&b0, &multiply_arr(&q, &b1, &self.field));
            b0 = b1;
            b1 = b2;
        }
        Ok((
            Self::from_raw(self.field.clone(), a1),
            Self::from_raw(self.field.clone(), b1),
        ))
    }

    /// A degree-d polynomial is irreducible over GF(2^m) iff
    /// gcd(X^(2^(m·i)) + X, this) is constant for every i in
    /// \[1, ⌊d/2⌋\].
    pub fn is_irreducible(&self) -> Result<bool> {
        is_irreducible_arr(&self.coefficients, &self.field)
    }

    /// Scrub the coefficient buffer. Used by the decoder on
    /// secret-bearing intermediates before they are dropped.
    pub(crate) fn wipe(&mut self) {
        self.coefficients.zeroize();
        self.coefficients = vec![0];
        self.degree = -1;
    }
}

impl PartialEq for Gf2mPoly {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && util::equals_u32(
                &normal_form(&self.coefficients),
                &normal_form(&other.coefficients),
            )
    }
}

impl Eq for Gf2mPoly {}

impl std::fmt::Debug for Gf2mPoly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gf2mPoly(deg {}, {:?})", self.degree, self.coefficients)
    }
}
