//! Vectors over GF(2) and over GF(2^m).
//!
//! The bit-vector packs its entries LSB-first into 32-bit words and
//! carries its length explicitly; the packed array never dictates it, so
//! the unused high bits of the last word stay zero. The extension-field
//! vector is a plain element array tied to its field. A tagged `Vector`
//! wraps the two shapes and dispatches the operations they share.

use std::sync::Arc;

use rand::Rng;

use crate::error::{Error, Result};
use crate::gf2m::Gf2mField;
use crate::permutation::Permutation;
use crate::util;

/// A dense bit-vector, an element of GF(2)^n.
#[derive(Clone)]
pub struct Gf2Vector {
    length: usize,
    v: Vec<u32>,
}

impl Gf2Vector {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            v: vec![0u32; (length + 31) / 32],
        }
    }

    /// A random vector of Hamming weight exactly `t`: a partial
    /// Fisher–Yates draw of t distinct positions.
    pub fn random_weight<R: Rng>(length: usize, t: usize, rng: &mut R) -> Result<Self> {
        if t > length {
            return Err(Error::InvalidInput("weight exceeds vector length"));
        }
        let mut help: Vec<usize> = (0..length).collect();
        let mut k = length;
        let mut out = Self::new(length);
        for _ in 0..t {
            let j = rng.gen_range(0..k);
            k -= 1;
            out.set_bit(help[j]);
            help[j] = help[k];
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn words(&self) -> &[u32] {
        &self.v
    }

    pub fn bit(&self, i: usize) -> bool {
        assert!(i < self.length, "bit index out of range");
        (self.v[i >> 5] >> (i & 0x1f)) & 1 == 1
    }

    pub fn set_bit(&mut self, i: usize) {
        assert!(i < self.length, "bit index out of range");
        self.v[i >> 5] |= 1 << (i & 0x1f);
    }

    pub fn is_zero(&self) -> bool {
        self.v.iter().all(|&w| w == 0)
    }

    pub fn weight(&self) -> usize {
        self.v.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Coefficient-wise XOR.
    pub fn add(&self, other: &Self) -> Result<Self> {
        if self.length != other.length {
            return Err(Error::InvalidInput("vector lengths differ"));
        }
        let v = self
            .v
            .iter()
            .zip(other.v.iter())
            .map(|(a, b)| a ^ b)
            .collect();
        Ok(Self {
            length: self.length,
            v,
        })
    }

    /// Result bit i is this vector's bit π(i).
    pub fn multiply_by_permutation(&self, p: &Permutation) -> Result<Self> {
        let pv = p.vector();
        if pv.len() != self.length {
            return Err(Error::InvalidInput("permutation size does not match vector length"));
        }
        let mut out = Self::new(self.length);
        for (i, &src) in pv.iter().enumerate() {
            if self.bit(src) {
                out.set_bit(i);
            }
        }
        Ok(out)
    }

    /// Reinterpret consecutive m-bit groups as GF(2^m) elements, reading
    /// the packed bits LSB-first across word boundaries. The first bit
    /// read lands in the top coefficient position of the last element,
    /// matching the row layout of the canonical check matrix.
    pub fn to_extension_field_vector(&self, field: &Arc<Gf2mField>) -> Result<Gf2mVector> {
        let m = field.degree() as usize;
        if self.length % m != 0 {
            return Err(Error::InvalidInput("vector length is not a multiple of the field degree"));
        }
        let t = self.length / m;
        let mut elements = vec![0u32; t];
        let mut count = 0usize;
        for i in (0..t).rev() {
            for j in (0..m).rev() {
                if (self.v[count >> 5] >> (count & 0x1f)) & 1 == 1 {
                    elements[i] ^= 1 << j;
                }
                count += 1;
            }
        }
        Gf2mVector::new(field.clone(), elements)
    }

    /// ⌈n/8⌉ bytes, little-endian within each 32-bit word.
    pub fn encoded(&self) -> Vec<u8> {
        let nbytes = (self.length + 7) / 8;
        (0..nbytes)
            .map(|k| (self.v[k >> 2] >> (8 * (k & 3))) as u8)
            .collect()
    }

    pub fn decode(length: usize, enc: &[u8]) -> Result<Self> {
        if enc.len() != (length + 7) / 8 {
            return Err(Error::Encoding("byte length does not match bit length"));
        }
        let mut out = Self::new(length);
        for (k, &b) in enc.iter().enumerate() {
            out.v[k >> 2] |= (b as u32) << (8 * (k & 3));
        }
        out.mask_padding();
        Ok(out)
    }

    /// Clear the unused high bits of the last word.
    fn mask_padding(&mut self) {
        let r = self.length & 0x1f;
        if r != 0 {
            if let Some(last) = self.v.last_mut() {
                *last &= (1u32 << r) - 1;
            }
        }
    }
}

impl PartialEq for Gf2Vector {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && util::equals_u32(&self.v, &other.v)
    }
}

impl Eq for Gf2Vector {}

impl std::fmt::Debug for Gf2Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gf2Vector(")?;
        for i in 0..self.length {
            write!(f, "{}", self.bit(i) as u8)?;
        }
        write!(f, ")")
    }
}

/// A length-bounded vector of GF(2^m) elements.
#[derive(Clone)]
pub struct Gf2mVector {
    field: Arc<Gf2mField>,
    elements: Vec<u32>,
}

impl Gf2mVector {
    pub fn new(field: Arc<Gf2mField>, elements: Vec<u32>) -> Result<Self> {
        if elements.iter().any(|&e| !field.is_element(e)) {
            return Err(Error::InvalidInput("entry is not an element of the field"));
        }
        Ok(Self { field, elements })
    }

    pub fn zero(field: Arc<Gf2mField>, length: usize) -> Self {
        Self {
            field,
            elements: vec![0u32; length],
        }
    }

    pub fn field(&self) -> &Arc<Gf2mField> {
        &self.field
    }

    pub fn elements(&self) -> &[u32] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.elements.iter().all(|&e| e == 0)
    }

    /// Coefficient-wise XOR; addition in characteristic 2.
    pub fn add(&self, other: &Self) -> Result<Self> {
        if self.field != other.field {
            return Err(Error::InvalidInput("vectors live in different fields"));
        }
        if self.elements.len() != other.elements.len() {
            return Err(Error::InvalidInput("vector lengths differ"));
        }
        let elements = self
            .elements
            .iter()
            .zip(other.elements.iter())
            .map(|(a, b)| a ^ b)
            .collect();
        Ok(Self {
            field: self.field.clone(),
            elements,
        })
    }

    pub fn multiply_by_permutation(&self, p: &Permutation) -> Result<Self> {
        let pv = p.vector();
        if pv.len() != self.elements.len() {
            return Err(Error::InvalidInput("permutation size does not match vector length"));
        }
        let elements = pv.iter().map(|&src| self.elements[src]).collect();
        Ok(Self {
            field: self.field.clone(),
            elements,
        })
    }

    /// ⌈m/8⌉ bytes per element, little-endian within each element.
    pub fn encoded(&self) -> Vec<u8> {
        let count = (self.field.degree() as usize + 7) / 8;
        let mut out = Vec::with_capacity(self.elements.len() * count);
        for &e in &self.elements {
            for j in 0..count {
                out.push((e >> (8 * j)) as u8);
            }
        }
        out
    }

    pub fn decode(field: Arc<Gf2mField>, enc: &[u8]) -> Result<Self> {
        let count = (field.degree() as usize + 7) / 8;
        if enc.len() % count != 0 {
            return Err(Error::Encoding("byte length is not a multiple of the element size"));
        }
        let mut elements = vec![0u32; enc.len() / count];
        for (i, chunk) in enc.chunks(count).enumerate() {
            let mut e = 0u32;
            for (j, &byte) in chunk.iter().enumerate() {
                e ^= (byte as u32) << (8 * j);
            }
            if !field.is_element(e) {
                return Err(Error::Encoding("decoded entry is not a field element"));
            }
            elements[i] = e;
        }
        Ok(Self { field, elements })
    }
}

impl PartialEq for Gf2mVector {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && util::equals_u32(&self.elements, &other.elements)
    }
}

impl Eq for Gf2mVector {}

impl std::fmt::Debug for Gf2mVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gf2mVector{:?}", self.elements)
    }
}

/// The two vector shapes behind one tag, dispatching the operations
/// both of them support.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Vector {
    Bit(Gf2Vector),
    Field(Gf2mVector),
}

impl Vector {
    pub fn encoded(&self) -> Vec<u8> {
        match self {
            Vector::Bit(v) => v.encoded(),
            Vector::Field(v) => v.encoded(),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Vector::Bit(v) => v.is_zero(),
            Vector::Field(v) => v.is_zero(),
        }
    }

    pub fn multiply_by_permutation(&self, p: &Permutation) -> Result<Vector> {
        Ok(match self {
            Vector::Bit(v) => Vector::Bit(v.multiply_by_permutation(p)?),
            Vector::Field(v) => Vector::Field(v.multiply_by_permutation(p)?),
        })
    }

    pub fn add(&self, other: &Vector) -> Result<Vector> {
        match (self, other) {
            (Vector::Bit(a), Vector::Bit(b)) => Ok(Vector::Bit(a.add(b)?)),
            (Vector::Field(a), Vector::Field(b)) => Ok(Vector::Field(a.add(b)?)),
            _ => Err(Error::InvalidInput("cannot add vectors of different shapes")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn bits_and_length_are_independent_of_words() {
        let mut v = Gf2Vector::new(40);
        assert_eq!(v.len(), 40);
        assert_eq!(v.words().len(), 2);
        assert!(v.is_zero());
        v.set_bit(0);
        v.set_bit(33);
        assert!(v.bit(0) && v.bit(33) && !v.bit(1));
        assert_eq!(v.weight(), 2);
        assert!(!v.is_zero());
    }

    #[test]
    fn random_weight_vectors_have_exact_weight() {
        let mut rng = thread_rng();
        for _ in 0..10 {
            let v = Gf2Vector::random_weight(100, 7, &mut rng).unwrap();
            assert_eq!(v.weight(), 7);
        }
        assert!(Gf2Vector::random_weight(5, 6, &mut rng).is_err());
    }

    #[test]
    fn bit_vector_encoding_round_trip() {
        let mut v = Gf2Vector::new(13);
        v.set_bit(0);
        v.set_bit(8);
        v.set_bit(12);
        let enc = v.encoded();
        assert_eq!(enc, vec![0x01, 0x11]);
        assert_eq!(Gf2Vector::decode(13, &enc).unwrap(), v);
        assert!(Gf2Vector::decode(20, &enc).is_err());
    }

    #[test]
    fn bit_vector_add_is_xor() {
        let mut a = Gf2Vector::new(10);
        let mut b = Gf2Vector::new(10);
        a.set_bit(1);
        a.set_bit(5);
        b.set_bit(5);
        b.set_bit(9);
        let c = a.add(&b).unwrap();
        assert!(c.bit(1) && !c.bit(5) && c.bit(9));
        assert!(a.add(&Gf2Vector::new(9)).is_err());
    }

    #[test]
    fn permutation_moves_bits() {
        let mut v = Gf2Vector::new(4);
        v.set_bit(2);
        let p = Permutation::from_vec(vec![2, 0, 3, 1]).unwrap();
        // Result bit i picks up input bit p[i], so bit 0 is set.
        let moved = v.multiply_by_permutation(&p).unwrap();
        assert!(moved.bit(0));
        assert_eq!(moved.weight(), 1);
        // The identity leaves the vector alone.
        let id = Permutation::identity(4);
        assert_eq!(v.multiply_by_permutation(&id).unwrap(), v);
    }

    #[test]
    fn extension_field_grouping() {
        let f = Arc::new(Gf2mField::new(4).unwrap());
        // Eight bits over GF(16) make two elements; the first bit read
        // is the top coefficient of the last element.
        let mut v = Gf2Vector::new(8);
        v.set_bit(0);
        let ext = v.to_extension_field_vector(&f).unwrap();
        assert_eq!(ext.elements(), &[0, 0b1000]);
        // Length must divide evenly.
        let odd = Gf2Vector::new(7);
        assert!(odd.to_extension_field_vector(&f).is_err());
    }

    #[test]
    fn field_vector_add_validates() {
        let f = Arc::new(Gf2mField::new(4).unwrap());
        let a = Gf2mVector::new(f.clone(), vec![1, 2, 3]).unwrap();
        let b = Gf2mVector::new(f.clone(), vec![3, 2, 1]).unwrap();
        let c = a.add(&b).unwrap();
        assert_eq!(c.elements(), &[2, 0, 2]);
        let short = Gf2mVector::new(f.clone(), vec![1]).unwrap();
        assert!(a.add(&short).is_err());
        assert!(Gf2mVector::new(f, vec![16]).is_err());
    }

    #[test]
    fn field_vector_encoding_round_trip() {
        let f = Arc::new(Gf2mField::new(12).unwrap());
        let v = Gf2mVector::new(f.clone(), vec![0xabc, 0x001]).unwrap();
        let enc = v.encoded();
        assert_eq!(enc, vec![0xbc, 0x0a, 0x01, 0x00]);
        assert_eq!(Gf2mVector::decode(f.clone(), &enc).unwrap(), v);
        // An entry above 2^12 is rejected.
        assert!(Gf2mVector::decode(f, &[0xff, 0xff]).is_err());
    }

    #[test]
    fn tagged_vector_dispatch() {
        let f = Arc::new(Gf2mField::new(4).unwrap());
        let bits = Vector::Bit(Gf2Vector::new(8));
        let elems = Vector::Field(Gf2mVector::zero(f, 2));
        assert!(bits.is_zero() && elems.is_zero());
        assert_eq!(bits.encoded().len(), 1);
        assert_eq!(elems.encoded().len(), 2);
        // Mixed-shape addition is refused.
        assert!(bits.add(&elems).is_err());
        assert!(bits.add(&bits).unwrap().is_zero());
    }
}
