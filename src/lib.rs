//! Arithmetic core for a post-quantum cryptography toolkit.
//!
//! Two families share this machinery: the code-based McEliece and
//! Niederreiter cryptosystems over binary Goppa codes, and the
//! lattice-based NTRUEncrypt cryptosystem over a polynomial ring. What
//! lives here is the math they are built on, not the cryptosystems
//! themselves:
//!
//! * [`gf2m`]: GF(2^m) arithmetic through log/exp tables, 2 ≤ m ≤ 31;
//! * [`poly`]: dense polynomials over GF(2^m) with Karatsuba
//!   multiplication, division, gcd, modular inverse and the square-root
//!   machinery Patterson decoding needs;
//! * [`vector`], [`matrix`], [`permutation`]: bit-vectors and
//!   row-packed bit-matrices over GF(2), vectors over GF(2^m), and
//!   permutations with compose/invert;
//! * [`ring`]: the squaring and square-root matrices of
//!   GF(2^m)\[X\]/g;
//! * [`goppa`]: the canonical parity-check matrix, its systematic
//!   form, and syndrome decoding;
//! * [`ntru`]: the NTRUEncrypt parameter block with its predefined
//!   sets and canonical serialization;
//! * [`bigint`], [`bytes`], [`digest`], [`util`]: the supporting cast
//!   of radix conversions over big integers, byte-string primitives,
//!   the digest collaborator, and integer-array helpers.
//!
//! Everything is synchronous and single-threaded; completed objects
//! (fields, permutations, matrices) are immutable and can be shared by
//! reference across threads. None of the arithmetic is constant-time.

pub mod bigint;
pub mod bytes;
pub mod digest;
pub mod error;
pub mod gf2m;
pub mod goppa;
pub mod matrix;
pub mod ntru;
pub mod permutation;
pub mod poly;
pub mod ring;
pub mod util;
pub mod vector;

pub use digest::{Digest, DigestAlgorithm, DigestFactory, StandardDigestFactory};
pub use error::{Error, Result};
pub use gf2m::Gf2mField;
pub use goppa::{
    compute_systematic_form, create_canonical_check_matrix, create_generator_matrix,
    syndrome_decode, GeneratorMatrix, SystematicForm,
};
pub use matrix::Gf2Matrix;
pub use ntru::{NtruEncryptParams, PolyType};
pub use permutation::Permutation;
pub use poly::Gf2mPoly;
pub use ring::Gf2mPolyRing;
pub use vector::{Gf2Vector, Gf2mVector, Vector};
