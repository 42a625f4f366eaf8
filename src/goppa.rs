//! Binary Goppa codes: the canonical parity-check matrix, its systematic
//! form, and Patterson syndrome decoding.
//!
//! A Goppa polynomial g of degree t over GF(2^m) defines a code of
//! length n = 2^m. The canonical check matrix comes out of the identity
//!
//! ```text
//! (g(X) - g(j)) / (X - j) = Σ_i X^(t-1-i) · Σ_{k≤i} g_{t+k-i} j^k
//! ```
//!
//! evaluated at every field element j: divide by g(j), collect the t
//! coefficients per column, and expand each GF(2^m) entry into m rows of
//! bits. A received word's syndrome against that matrix, regrouped into
//! field elements, is then exactly the classical syndrome polynomial
//! S = Σ e_j / (X - j) mod g, which is what Patterson's algorithm
//! consumes: invert S, take the square root of T + X, reconstruct the
//! rational approximation (a, b), and read the error positions off the
//! roots of the locator σ = a² + X·b².

use log::{debug, trace};
use rand::Rng;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::gf2m::Gf2mField;
use crate::matrix::Gf2Matrix;
use crate::permutation::Permutation;
use crate::poly::Gf2mPoly;
use crate::vector::Gf2Vector;

/// The systematic triple (S⁻¹, M, P) with S·H·P = (I | M).
pub struct SystematicForm {
    pub s_inv: Gf2Matrix,
    pub m: Gf2Matrix,
    pub p: Permutation,
}

/// A generator matrix G together with the column index set J on which
/// its submatrix is the identity.
pub struct GeneratorMatrix {
    pub g: Gf2Matrix,
    pub set_j: Vec<usize>,
}

/// Build the canonical t·m × n check matrix of the code defined by `gp`
/// over `field`. Every field element serves both as column index and as
/// evaluation point; `gp` must not vanish anywhere, which holds whenever
/// it is irreducible.
pub fn create_canonical_check_matrix(
    field: &Arc<Gf2mField>,
    gp: &Gf2mPoly,
) -> Result<Gf2Matrix> {
    let m = field.degree() as usize;
    let n = 1usize << m;
    let t = gp.degree();
    if t < 1 {
        return Err(Error::InvalidInput("Goppa polynomial must have positive degree"));
    }
    let t = t as usize;

    // yz[i][j] = j^i / gp(j)
    let mut yz = vec![vec![0u32; n]; t];
    for j in 0..n {
        let val = gp.evaluate_at(j as u32);
        yz[0][j] = field
            .inverse(val)
            .map_err(|_| Error::InvalidInput("Goppa polynomial has a root in the field"))?;
    }
    for i in 1..t {
        for j in 0..n {
            yz[i][j] = field.mult(yz[i - 1][j], j as u32);
        }
    }

    // Multiply by the upper triangular of Goppa coefficients:
    // h[i][j] = Σ_{k≤i} yz[k][j] · g_{t+k-i}
    let mut h = vec![vec![0u32; n]; t];
    for i in 0..t {
        for j in 0..n {
            for k in 0..=i {
                let g_coeff = gp.coefficient(t + k - i);
                h[i][j] = field.add(h[i][j], field.mult(yz[k][j], g_coeff));
            }
        }
    }

    // Expand each GF(2^m) entry into m rows of bits; the low bit of the
    // element lands on the highest row of its block.
    let mut out = Gf2Matrix::zero(t * m, n)?;
    for j in 0..n {
        for (i, h_row) in h.iter().enumerate() {
            let e = h_row[j];
            for u in 0..m {
                if (e >> u) & 1 == 1 {
                    out.set_bit((i + 1) * m - u - 1, j);
                }
            }
        }
    }
    Ok(out)
}

/// Find a permutation P and row operation S bringing H into the form
/// S·H·P = (I | M). Samples permutations until the left square block
/// becomes invertible; a singular draw is the one arithmetic error that
/// gets swallowed and retried here.
pub fn compute_systematic_form<R: Rng>(h: &Gf2Matrix, rng: &mut R) -> Result<SystematicForm> {
    let n = h.columns();
    let mut rounds = 0usize;
    loop {
        rounds += 1;
        let p = Permutation::random(n, rng);
        let hp = h.right_multiply(&p)?;
        let s_inv = hp.left_sub_matrix()?;
        match s_inv.compute_inverse() {
            Ok(s) => {
                let shp = s.multiply_matrix(&hp)?;
                let m = shp.right_sub_matrix()?;
                debug!("systematic form found after {rounds} permutation samples");
                return Ok(SystematicForm { s_inv, m, p });
            }
            Err(Error::Arithmetic(_)) => {
                trace!("left submatrix singular, resampling permutation");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Derive the generator G = (Mᵀ | I) of the permuted code from the
/// systematic triple. `set_j` maps the identity block back to the
/// original column indices through P.
pub fn create_generator_matrix(sf: &SystematicForm) -> Result<GeneratorMatrix> {
    let g = sf.m.compute_transpose()?.extend_right_identity()?;
    let rows = sf.s_inv.rows();
    let set_j = sf.p.vector()[rows..].to_vec();
    Ok(GeneratorMatrix { g, set_j })
}

/// Patterson decoding: recover the error vector whose syndrome against
/// the canonical check matrix is `syndrome`. Fails when the syndrome
/// polynomial is not invertible modulo `gp`, which means the input is
/// not a syndrome of this code.
pub fn syndrome_decode(
    syndrome: &Gf2Vector,
    field: &Arc<Gf2mField>,
    gp: &Gf2mPoly,
    sq_root_matrix: &[Gf2mPoly],
) -> Result<Gf2Vector> {
    let n = 1usize << field.degree();
    let mut errors = Gf2Vector::new(n);
    if syndrome.is_zero() {
        return Ok(errors);
    }

    let mut s_poly = Gf2mPoly::from_vector(&syndrome.to_extension_field_vector(field)?);
    let mut t = s_poly
        .mod_inverse(gp)
        .map_err(|_| Error::Decoding("syndrome is not invertible modulo the Goppa polynomial"))?;
    // τ = sqrt(T + X mod g); the precomputed matrix does the square
    // root in one linear pass but only covers residues, so reduce
    // first. For deg g = 1 the added X term would otherwise fall
    // outside the matrix.
    let mut tau = t
        .add_monomial(1)
        .rem(gp)?
        .mod_square_root_matrix(sq_root_matrix);
    let (mut a, mut b) = tau.mod_polynomial_to_fraction(gp)?;
    let mut sigma = a.multiply(&a).add(&b.multiply(&b).mult_with_monomial(1));
    let head_inv = field
        .inverse(sigma.head_coefficient())
        .map_err(|_| Error::Decoding("error locator polynomial vanished"))?;
    sigma.mult_this_with_element(head_inv)?;

    // The error positions are the roots of σ.
    for j in 0..n {
        if sigma.evaluate_at(j as u32) == 0 {
            errors.set_bit(j);
        }
    }

    // Scrub the secret-bearing intermediates before they drop.
    s_poly.wipe();
    t.wipe();
    tau.wipe();
    a.wipe();
    b.wipe();
    sigma.wipe();
    Ok(errors)
}
