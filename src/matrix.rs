//! Dense bit-matrices over GF(2).
//!
//! Rows are packed LSB-first into 32-bit words, ⌈cols/32⌉ words per row,
//! and the padding bits above the declared column count are kept zero by
//! every mutating operation. Inversion is plain Gauss–Jordan with row
//! swaps; a missing pivot surfaces as an arithmetic error that the
//! systematic-form loop turns into a permutation resample.

use byteorder::{ByteOrder, LittleEndian};
use rand::Rng;

use crate::error::{Error, Result};
use crate::permutation::Permutation;
use crate::vector::Gf2Vector;

#[derive(Clone)]
pub struct Gf2Matrix {
    rows: usize,
    columns: usize,
    /// Words per row.
    words: usize,
    m: Vec<Vec<u32>>,
}

impl Gf2Matrix {
    pub fn zero(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(Error::Config("matrix dimensions must be positive"));
        }
        let words = (columns + 31) / 32;
        Ok(Self {
            rows,
            columns,
            words,
            m: vec![vec![0u32; words]; rows],
        })
    }

    pub fn identity(n: usize) -> Result<Self> {
        let mut out = Self::zero(n, n)?;
        for i in 0..n {
            out.m[i][i >> 5] |= 1 << (i & 0x1f);
        }
        Ok(out)
    }

    /// A random invertible matrix: the product of a random unit lower
    /// triangular and a random unit upper triangular matrix, with the
    /// rows shuffled afterwards.
    pub fn random_invertible<R: Rng>(n: usize, rng: &mut R) -> Result<Self> {
        let mut lower = Self::identity(n)?;
        let mut upper = Self::identity(n)?;
        for i in 0..n {
            for j in 0..i {
                if rng.gen::<bool>() {
                    lower.set_bit(i, j);
                }
            }
            for j in i + 1..n {
                if rng.gen::<bool>() {
                    upper.set_bit(i, j);
                }
            }
        }
        let product = lower.multiply_matrix(&upper)?;
        let p = Permutation::random(n, rng);
        let mut out = Self::zero(n, n)?;
        for (i, &src) in p.vector().iter().enumerate() {
            out.m[i].copy_from_slice(&product.m[src]);
        }
        Ok(out)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn bit(&self, row: usize, col: usize) -> bool {
        assert!(row < self.rows && col < self.columns, "matrix index out of range");
        (self.m[row][col >> 5] >> (col & 0x1f)) & 1 == 1
    }

    pub fn set_bit(&mut self, row: usize, col: usize) {
        assert!(row < self.rows && col < self.columns, "matrix index out of range");
        self.m[row][col >> 5] |= 1 << (col & 0x1f);
    }

    pub fn is_zero(&self) -> bool {
        self.m.iter().flatten().all(|&w| w == 0)
    }

    /// Apply a column permutation: result column i is this matrix's
    /// column π(i).
    pub fn right_multiply(&self, p: &Permutation) -> Result<Self> {
        let pv = p.vector();
        if pv.len() != self.columns {
            return Err(Error::InvalidInput("permutation size does not match column count"));
        }
        let mut out = Self::zero(self.rows, self.columns)?;
        for (i, &src) in pv.iter().enumerate() {
            let (q, r) = (i >> 5, i & 0x1f);
            let (pq, pr) = (src >> 5, src & 0x1f);
            for (out_row, in_row) in out.m.iter_mut().zip(self.m.iter()) {
                out_row[q] |= ((in_row[pq] >> pr) & 1) << r;
            }
        }
        Ok(out)
    }

    /// The square submatrix of the first `rows` columns.
    pub fn left_sub_matrix(&self) -> Result<Self> {
        if self.columns <= self.rows {
            return Err(Error::InvalidInput("matrix has no proper left submatrix"));
        }
        self.sub_matrix_columns(0, self.rows)
    }

    /// The submatrix of the columns from `rows` on.
    pub fn right_sub_matrix(&self) -> Result<Self> {
        if self.columns <= self.rows {
            return Err(Error::InvalidInput("matrix has no proper right submatrix"));
        }
        self.sub_matrix_columns(self.rows, self.columns)
    }

    fn sub_matrix_columns(&self, from: usize, to: usize) -> Result<Self> {
        let mut out = Self::zero(self.rows, to - from)?;
        for i in 0..self.rows {
            for (j, col) in (from..to).enumerate() {
                if self.bit(i, col) {
                    out.set_bit(i, j);
                }
            }
        }
        Ok(out)
    }

    /// Gauss–Jordan inversion. Fails with an arithmetic error when no
    /// pivot can be found for some column, i.e. the matrix is singular.
    pub fn compute_inverse(&self) -> Result<Self> {
        if self.rows != self.columns {
            return Err(Error::Arithmetic("only square matrices can be inverted"));
        }
        let mut work = self.clone();
        let mut inv = Self::identity(self.rows)?;
        for i in 0..self.rows {
            let (q, mask) = (i >> 5, 1u32 << (i & 0x1f));
            if work.m[i][q] & mask == 0 {
                let pivot = (i + 1..self.rows).find(|&j| work.m[j][q] & mask != 0);
                match pivot {
                    Some(j) => {
                        work.m.swap(i, j);
                        inv.m.swap(i, j);
                    }
                    None => return Err(Error::Arithmetic("matrix is singular")),
                }
            }
            // Clear the pivot column everywhere else, tracking the same
            // row operations in the inverse. Words below the pivot word
            // of the working row are already zero.
            let pivot_row = work.m[i].clone();
            let inv_pivot_row = inv.m[i].clone();
            for j in (0..self.rows).rev() {
                if j != i && work.m[j][q] & mask != 0 {
                    for k in q..work.words {
                        work.m[j][k] ^= pivot_row[k];
                    }
                    for k in 0..inv.words {
                        inv.m[j][k] ^= inv_pivot_row[k];
                    }
                }
            }
        }
        Ok(inv)
    }

    pub fn compute_transpose(&self) -> Result<Self> {
        let mut out = Self::zero(self.columns, self.rows)?;
        for i in 0..self.rows {
            for j in 0..self.columns {
                if self.bit(i, j) {
                    out.set_bit(j, i);
                }
            }
        }
        Ok(out)
    }

    /// self × other over GF(2): each set bit (i, j) of self adds row j
    /// of the other matrix into result row i.
    pub fn multiply_matrix(&self, other: &Self) -> Result<Self> {
        if self.columns != other.rows {
            return Err(Error::InvalidInput("inner matrix dimensions do not match"));
        }
        let mut out = Self::zero(self.rows, other.columns)?;
        for i in 0..self.rows {
            for j in 0..self.columns {
                if self.bit(i, j) {
                    for k in 0..out.words {
                        out.m[i][k] ^= other.m[j][k];
                    }
                }
            }
        }
        Ok(out)
    }

    /// Row vector × matrix: XOR together the rows selected by the set
    /// bits of `vec`. The input length must match the row count.
    pub fn left_multiply(&self, vec: &Gf2Vector) -> Result<Gf2Vector> {
        if vec.len() != self.rows {
            return Err(Error::InvalidInput("vector length does not match row count"));
        }
        let mut words = vec![0u32; self.words];
        for (i, row) in self.m.iter().enumerate() {
            if vec.bit(i) {
                for (w, &r) in words.iter_mut().zip(row.iter()) {
                    *w ^= r;
                }
            }
        }
        let mut out = Gf2Vector::new(self.columns);
        for j in 0..self.columns {
            if (words[j >> 5] >> (j & 0x1f)) & 1 == 1 {
                out.set_bit(j);
            }
        }
        Ok(out)
    }

    /// Matrix × column vector: bit i of the result is the parity of
    /// row i AND `vec`. This is the syndrome map s = H·eᵀ.
    pub fn right_multiply_vector(&self, vec: &Gf2Vector) -> Result<Gf2Vector> {
        if vec.len() != self.columns {
            return Err(Error::InvalidInput("vector length does not match column count"));
        }
        let mut out = Gf2Vector::new(self.rows);
        for (i, row) in self.m.iter().enumerate() {
            let parity = row
                .iter()
                .zip(vec.words().iter())
                .fold(0u32, |acc, (&r, &v)| acc ^ (r & v));
            if parity.count_ones() & 1 == 1 {
                out.set_bit(i);
            }
        }
        Ok(out)
    }

    /// (self | I): append an identity block of size `rows` on the right.
    pub fn extend_right_identity(&self) -> Result<Self> {
        let mut out = Self::zero(self.rows, self.columns + self.rows)?;
        for i in 0..self.rows {
            for j in 0..self.columns {
                if self.bit(i, j) {
                    out.set_bit(i, j);
                }
            }
            out.set_bit(i, self.columns + i);
        }
        Ok(out)
    }

    /// 4 bytes of little-endian signed row count, then the rows in
    /// order, each ⌈cols/32⌉ little-endian words.
    pub fn encoded(&self) -> Vec<u8> {
        let mut out = vec![0u8; 4 + self.rows * self.words * 4];
        LittleEndian::write_i32(&mut out[..4], self.rows as i32);
        let mut offset = 4;
        for row in &self.m {
            for &w in row {
                LittleEndian::write_u32(&mut out[offset..offset + 4], w);
                offset += 4;
            }
        }
        out
    }

    /// Parse the byte form back. The column count cannot be recovered
    /// from the row prefix alone, so the caller supplies it.
    pub fn decode(enc: &[u8], columns: usize) -> Result<Self> {
        if enc.len() < 4 {
            return Err(Error::Encoding("matrix encoding shorter than its header"));
        }
        let rows = LittleEndian::read_i32(&enc[..4]);
        if rows <= 0 {
            return Err(Error::Encoding("matrix encoding has a non-positive row count"));
        }
        let rows = rows as usize;
        let words = (columns + 31) / 32;
        if enc.len() != 4 + rows * words * 4 {
            return Err(Error::Encoding("matrix encoding has the wrong length"));
        }
        let mut out = Self::zero(rows, columns)?;
        let mut offset = 4;
        for row in out.m.iter_mut() {
            for w in row.iter_mut() {
                *w = LittleEndian::read_u32(&enc[offset..offset + 4]);
                offset += 4;
            }
        }
        out.mask_padding();
        Ok(out)
    }

    /// Clear the padding bits above the column count in every row.
    fn mask_padding(&mut self) {
        let r = self.columns & 0x1f;
        if r != 0 {
            let mask = (1u32 << r) - 1;
            for row in self.m.iter_mut() {
                if let Some(last) = row.last_mut() {
                    *last &= mask;
                }
            }
        }
    }
}

impl PartialEq for Gf2Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.columns == other.columns && self.m == other.m
    }
}

impl Eq for Gf2Matrix {}

impl std::fmt::Debug for Gf2Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Gf2Matrix {}x{}", self.rows, self.columns)?;
        for i in 0..self.rows {
            for j in 0..self.columns {
                write!(f, "{}", self.bit(i, j) as u8)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    fn random_matrix<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Gf2Matrix {
        let mut m = Gf2Matrix::zero(rows, cols).unwrap();
        for i in 0..rows {
            for j in 0..cols {
                if rng.gen::<bool>() {
                    m.set_bit(i, j);
                }
            }
        }
        m
    }

    #[test]
    fn identity_multiplication_is_neutral() {
        let mut rng = thread_rng();
        let a = random_matrix(10, 10, &mut rng);
        let id = Gf2Matrix::identity(10).unwrap();
        assert_eq!(a.multiply_matrix(&id).unwrap(), a);
        assert_eq!(id.multiply_matrix(&a).unwrap(), a);
    }

    #[test]
    fn zero_vector_maps_to_zero() {
        let mut rng = thread_rng();
        let a = random_matrix(12, 12, &mut rng);
        let z = Gf2Vector::new(12);
        assert!(a.left_multiply(&z).unwrap().is_zero());
        assert!(a.right_multiply_vector(&z).unwrap().is_zero());
    }

    #[test]
    fn identity_permutation_preserves_matrix() {
        let mut rng = thread_rng();
        let a = random_matrix(9, 40, &mut rng);
        let id = Permutation::identity(40);
        assert_eq!(a.right_multiply(&id).unwrap(), a);
    }

    #[test]
    fn column_permutation_moves_columns() {
        let mut a = Gf2Matrix::zero(2, 3).unwrap();
        a.set_bit(0, 0);
        a.set_bit(1, 2);
        let p = Permutation::from_vec(vec![2, 0, 1]).unwrap();
        // Result column i is input column p[i].
        let b = a.right_multiply(&p).unwrap();
        assert!(b.bit(1, 0) && b.bit(0, 1) && !b.bit(0, 0));
    }

    #[test]
    fn inverse_of_random_invertible_matrix() {
        let mut rng = thread_rng();
        for n in [5usize, 33, 64] {
            let a = Gf2Matrix::random_invertible(n, &mut rng).unwrap();
            let inv = a.compute_inverse().unwrap();
            assert_eq!(
                a.multiply_matrix(&inv).unwrap(),
                Gf2Matrix::identity(n).unwrap()
            );
        }
    }

    #[test]
    fn singular_matrix_inversion_fails() {
        // Two equal rows can never be reduced to the identity.
        let mut a = Gf2Matrix::zero(3, 3).unwrap();
        a.set_bit(0, 0);
        a.set_bit(0, 1);
        a.set_bit(1, 0);
        a.set_bit(1, 1);
        a.set_bit(2, 2);
        assert_eq!(
            a.compute_inverse(),
            Err(Error::Arithmetic("matrix is singular"))
        );
    }

    #[test]
    fn submatrix_split_reassembles() {
        let mut rng = thread_rng();
        let a = random_matrix(6, 20, &mut rng);
        let left = a.left_sub_matrix().unwrap();
        let right = a.right_sub_matrix().unwrap();
        assert_eq!(left.columns(), 6);
        assert_eq!(right.columns(), 14);
        for i in 0..6 {
            for j in 0..20 {
                let expect = a.bit(i, j);
                let got = if j < 6 {
                    left.bit(i, j)
                } else {
                    right.bit(i, j - 6)
                };
                assert_eq!(expect, got);
            }
        }
    }

    #[test]
    fn transpose_swaps_indices() {
        let mut rng = thread_rng();
        let a = random_matrix(7, 13, &mut rng);
        let t = a.compute_transpose().unwrap();
        assert_eq!(t.rows(), 13);
        assert_eq!(t.columns(), 7);
        for i in 0..7 {
            for j in 0..13 {
                assert_eq!(a.bit(i, j), t.bit(j, i));
            }
        }
    }

    #[test]
    fn encoding_round_trip() {
        let mut rng = thread_rng();
        for cols in [8usize, 32, 45] {
            let a = random_matrix(5, cols, &mut rng);
            let enc = a.encoded();
            assert_eq!(enc.len(), 4 + 5 * ((cols + 31) / 32) * 4);
            assert_eq!(Gf2Matrix::decode(&enc, cols).unwrap(), a);
        }
        assert!(Gf2Matrix::decode(&[1, 2], 8).is_err());
        assert!(Gf2Matrix::decode(&[0, 0, 0, 0], 8).is_err());
    }

    #[test]
    fn left_multiply_selects_rows() {
        let mut a = Gf2Matrix::zero(3, 5).unwrap();
        a.set_bit(0, 0);
        a.set_bit(1, 1);
        a.set_bit(2, 0);
        let mut v = Gf2Vector::new(3);
        v.set_bit(0);
        v.set_bit(2);
        // Rows 0 and 2 XOR to zero.
        assert!(a.left_multiply(&v).unwrap().is_zero());
        let mut w = Gf2Vector::new(3);
        w.set_bit(1);
        let out = a.left_multiply(&w).unwrap();
        assert!(out.bit(1) && out.weight() == 1);
    }

    #[test]
    fn right_multiply_vector_computes_parities() {
        let mut a = Gf2Matrix::zero(2, 4).unwrap();
        a.set_bit(0, 0);
        a.set_bit(0, 1);
        a.set_bit(1, 3);
        let mut v = Gf2Vector::new(4);
        v.set_bit(0);
        v.set_bit(1);
        v.set_bit(3);
        let out = a.right_multiply_vector(&v).unwrap();
        // Row 0 meets two set bits (even), row 1 meets one (odd).
        assert!(!out.bit(0) && out.bit(1));
    }

    #[test]
    fn extend_right_identity_appends_unit_block() {
        let mut rng = thread_rng();
        let a = random_matrix(4, 6, &mut rng);
        let ext = a.extend_right_identity().unwrap();
        assert_eq!(ext.columns(), 10);
        for i in 0..4 {
            for j in 0..6 {
                assert_eq!(ext.bit(i, j), a.bit(i, j));
            }
            for j in 0..4 {
                assert_eq!(ext.bit(i, 6 + j), i == j);
            }
        }
    }
}
