//! Permutations of {0, …, n-1}.

use itertools::Itertools;
use rand::Rng;

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    perm: Vec<usize>,
}

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Self {
            perm: (0..n).collect(),
        }
    }

    /// A uniformly random permutation by Fisher–Yates: draw from the
    /// shrinking pool of unused values, backfilling the hole with the
    /// last pool entry.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut help: Vec<usize> = (0..n).collect();
        let mut perm = vec![0usize; n];
        let mut k = n;
        for p in perm.iter_mut() {
            let j = rng.gen_range(0..k);
            k -= 1;
            *p = help[j];
            help[j] = help[k];
        }
        Self { perm }
    }

    /// Validated construction: every value in [0, n) must appear exactly
    /// once.
    pub fn from_vec(perm: Vec<usize>) -> Result<Self> {
        let n = perm.len();
        if perm.iter().any(|&p| p >= n) {
            return Err(Error::InvalidInput("permutation entry out of range"));
        }
        if !perm.iter().all_unique() {
            return Err(Error::InvalidInput("permutation contains a duplicate entry"));
        }
        Ok(Self { perm })
    }

    pub fn len(&self) -> usize {
        self.perm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    pub fn vector(&self) -> &[usize] {
        &self.perm
    }

    /// Composition: (self ∘ other)(i) = self(other(i)).
    pub fn right_multiply(&self, other: &Self) -> Result<Self> {
        if self.perm.len() != other.perm.len() {
            return Err(Error::InvalidInput("permutation sizes differ"));
        }
        let perm = other.perm.iter().map(|&i| self.perm[i]).collect();
        Ok(Self { perm })
    }

    pub fn compute_inverse(&self) -> Self {
        let mut perm = vec![0usize; self.perm.len()];
        for (i, &p) in self.perm.iter().enumerate() {
            perm[p] = i;
        }
        Self { perm }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn identity_maps_in_place() {
        let p = Permutation::identity(5);
        assert_eq!(p.vector(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn validation_rejects_bad_arrays() {
        assert!(Permutation::from_vec(vec![0, 1, 1]).is_err());
        assert!(Permutation::from_vec(vec![0, 3]).is_err());
        assert!(Permutation::from_vec(vec![1, 0, 2]).is_ok());
    }

    #[test]
    fn random_permutations_are_bijections() {
        let mut rng = thread_rng();
        for _ in 0..20 {
            let p = Permutation::random(50, &mut rng);
            assert!(Permutation::from_vec(p.vector().to_vec()).is_ok());
        }
    }

    #[test]
    fn inverse_composes_to_identity() {
        let mut rng = thread_rng();
        let p = Permutation::random(30, &mut rng);
        let inv = p.compute_inverse();
        assert_eq!(p.right_multiply(&inv).unwrap(), Permutation::identity(30));
        assert_eq!(inv.right_multiply(&p).unwrap(), Permutation::identity(30));
    }

    #[test]
    fn composition_applies_right_operand_first() {
        // self ∘ other: other picks 2, then self sends 2 to 0.
        let a = Permutation::from_vec(vec![2, 0, 1]).unwrap();
        let b = Permutation::from_vec(vec![2, 1, 0]).unwrap();
        let c = a.right_multiply(&b).unwrap();
        assert_eq!(c.vector(), &[1, 0, 2]);
        assert!(a.right_multiply(&Permutation::identity(4)).is_err());
    }
}
