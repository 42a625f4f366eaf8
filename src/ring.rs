//! The quotient ring GF(2^m)[X]/g and the two matrices the decoder
//! needs from it.
//!
//! Squaring is GF(2)-linear on the quotient ring, so its action on the
//! monomial basis can be tabulated: column j of the squaring matrix is
//! (X^j)² mod g. The square-root matrix is the inverse of that linear
//! map, computed by elimination on the columns; during decoding it turns
//! τ² back into τ without running the fixed-point iteration.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::gf2m::Gf2mField;
use crate::poly::Gf2mPoly;

pub struct Gf2mPolyRing {
    field: Arc<Gf2mField>,
    modulus: Gf2mPoly,
    squaring_matrix: Vec<Gf2mPoly>,
    square_root_matrix: Vec<Gf2mPoly>,
}

impl Gf2mPolyRing {
    /// Build both matrices for a monic modulus g of degree ≥ 1.
    pub fn new(field: Arc<Gf2mField>, modulus: Gf2mPoly) -> Result<Self> {
        let t = modulus.degree();
        if t < 1 {
            return Err(Error::InvalidInput("ring modulus must have positive degree"));
        }
        if modulus.head_coefficient() != 1 {
            return Err(Error::InvalidInput("ring modulus must be monic"));
        }
        let squaring_matrix = Self::compute_squaring_matrix(&field, &modulus, t as usize)?;
        let square_root_matrix =
            Self::compute_square_root_matrix(&field, &squaring_matrix, t as usize)?;
        Ok(Self {
            field,
            modulus,
            squaring_matrix,
            square_root_matrix,
        })
    }

    fn compute_squaring_matrix(
        field: &Arc<Gf2mField>,
        modulus: &Gf2mPoly,
        t: usize,
    ) -> Result<Vec<Gf2mPoly>> {
        let mut columns = Vec::with_capacity(t);
        // For 2j < t the square X^(2j) needs no reduction.
        for j in 0..t {
            let square = Gf2mPoly::monomial(field.clone(), 2 * j);
            if 2 * j < t {
                columns.push(square);
            } else {
                columns.push(square.rem(modulus)?);
            }
        }
        Ok(columns)
    }

    /// Invert the squaring map by Gauss–Jordan elimination over the
    /// coefficient columns, tracking the same column operations on an
    /// identity matrix. A missing pivot would mean the squaring map is
    /// not invertible, which cannot happen over a squarefree modulus.
    fn compute_square_root_matrix(
        field: &Arc<Gf2mField>,
        squaring_matrix: &[Gf2mPoly],
        t: usize,
    ) -> Result<Vec<Gf2mPoly>> {
        let mut work: Vec<Gf2mPoly> = squaring_matrix.to_vec();
        let mut inv: Vec<Gf2mPoly> = (0..t)
            .map(|i| Gf2mPoly::monomial(field.clone(), i))
            .collect();

        for i in 0..t {
            if work[i].coefficient(i) == 0 {
                let pivot = (i + 1..t).find(|&j| work[j].coefficient(i) != 0);
                match pivot {
                    Some(j) => {
                        work.swap(i, j);
                        inv.swap(i, j);
                    }
                    None => {
                        return Err(Error::Arithmetic("squaring matrix is not invertible"));
                    }
                }
            }
            let inv_coef = field.inverse(work[i].coefficient(i))?;
            work[i].mult_this_with_element(inv_coef)?;
            inv[i].mult_this_with_element(inv_coef)?;
            for j in 0..t {
                if j != i {
                    let coef = work[j].coefficient(i);
                    if coef != 0 {
                        let work_col = work[i].mult_with_element(coef)?;
                        let inv_col = inv[i].mult_with_element(coef)?;
                        work[j].add_to_this(&work_col);
                        inv[j].add_to_this(&inv_col);
                    }
                }
            }
        }
        Ok(inv)
    }

    pub fn field(&self) -> &Arc<Gf2mField> {
        &self.field
    }

    pub fn modulus(&self) -> &Gf2mPoly {
        &self.modulus
    }

    /// Column j is (X^j)² mod g.
    pub fn squaring_matrix(&self) -> &[Gf2mPoly] {
        &self.squaring_matrix
    }

    /// The inverse map, consumed by `Gf2mPoly::mod_square_root_matrix`.
    pub fn square_root_matrix(&self) -> &[Gf2mPoly] {
        &self.square_root_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;
    use rand::Rng;

    fn ring(m: u32, t: usize) -> Gf2mPolyRing {
        let mut rng = thread_rng();
        let field = Arc::new(Gf2mField::new(m).unwrap());
        let g = Gf2mPoly::random_irreducible(&field, t, &mut rng).unwrap();
        Gf2mPolyRing::new(field, g).unwrap()
    }

    fn random_residue<R: Rng>(ring: &Gf2mPolyRing, rng: &mut R) -> Gf2mPoly {
        let t = ring.modulus().degree() as usize;
        let coeffs: Vec<u32> = (0..t).map(|_| ring.field().random_element(rng)).collect();
        Gf2mPoly::from_coefficients(ring.field().clone(), &coeffs).unwrap()
    }

    #[test]
    fn squaring_matrix_columns_are_squared_monomials() {
        let r = ring(4, 5);
        for (j, col) in r.squaring_matrix().iter().enumerate() {
            let mono = Gf2mPoly::monomial(r.field().clone(), j);
            let expect = mono.mod_multiply(&mono, r.modulus()).unwrap();
            assert_eq!(*col, expect);
        }
    }

    #[test]
    fn square_then_root_is_identity() {
        let r = ring(4, 6);
        let mut rng = thread_rng();
        for _ in 0..20 {
            let p = random_residue(&r, &mut rng);
            let sq = p.mod_multiply(&p, r.modulus()).unwrap();
            assert_eq!(sq.mod_square_root_matrix(r.square_root_matrix()), p);
        }
    }

    #[test]
    fn root_then_square_is_identity() {
        let r = ring(5, 4);
        let mut rng = thread_rng();
        for _ in 0..20 {
            let p = random_residue(&r, &mut rng);
            let root = p.mod_square_root_matrix(r.square_root_matrix());
            assert_eq!(root.mod_multiply(&root, r.modulus()).unwrap(), p);
        }
    }

    #[test]
    fn matrix_root_agrees_with_iterated_root() {
        let r = ring(4, 4);
        let mut rng = thread_rng();
        for _ in 0..10 {
            let p = random_residue(&r, &mut rng);
            assert_eq!(
                p.mod_square_root_matrix(r.square_root_matrix()),
                p.mod_square_root(r.modulus()).unwrap()
            );
        }
    }

    #[test]
    fn degree_one_modulus_reduces_through_the_matrix() {
        // With a degree-1 modulus every residue is a constant and the
        // square-root matrix is the single column [1]. The decoder's
        // T + X step only stays inside that column after reduction:
        // X ≡ 7 (mod X + 7).
        let field = Arc::new(Gf2mField::new(4).unwrap());
        let g = Gf2mPoly::from_coefficients(field.clone(), &[7, 1]).unwrap();
        let r = Gf2mPolyRing::new(field.clone(), g.clone()).unwrap();
        assert_eq!(r.square_root_matrix().len(), 1);
        for c in 0..field.size() {
            let p = Gf2mPoly::constant(field.clone(), c).unwrap();
            let reduced = p.add_monomial(1).rem(&g).unwrap();
            assert!(reduced.degree() <= 0);
            assert_eq!(reduced.coefficient(0), c ^ 7);
            let root = reduced.mod_square_root_matrix(r.square_root_matrix());
            assert_eq!(field.mult(root.coefficient(0), root.coefficient(0)), c ^ 7);
        }
    }

    #[test]
    fn rejects_bad_moduli() {
        let field = Arc::new(Gf2mField::new(4).unwrap());
        let constant = Gf2mPoly::constant(field.clone(), 1).unwrap();
        assert!(Gf2mPolyRing::new(field.clone(), constant).is_err());
        // Not monic.
        let non_monic = Gf2mPoly::from_coefficients(field.clone(), &[1, 0, 3]).unwrap();
        assert!(Gf2mPolyRing::new(field, non_monic).is_err());
    }
}
