//! Error taxonomy shared by every module of the crate.
//!
//! Five kinds cover everything that can go wrong in the arithmetic core:
//! bad construction parameters, malformed caller input, impossible
//! arithmetic (inverting zero, singular matrices), byte buffers that do
//! not parse, and syndromes that are not in the code. Errors always
//! propagate to the caller; the one deliberate exception is the
//! systematic-form loop, which turns a singular-submatrix error into a
//! permutation resample.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Out-of-range or unsupported construction parameters.
    #[error("configuration error: {0}")]
    Config(&'static str),

    /// Structurally malformed caller input (bad permutation array, size
    /// mismatches between vectors and matrices).
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// An operation with no defined result: division by the zero
    /// polynomial, inverse of zero, inversion of a singular matrix.
    #[error("arithmetic error: {0}")]
    Arithmetic(&'static str),

    /// A byte buffer that cannot be parsed back into the claimed object.
    #[error("encoding error: {0}")]
    Encoding(&'static str),

    /// A syndrome that does not belong to the Goppa code.
    #[error("decoding error: {0}")]
    Decoding(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let e = Error::Arithmetic("division by zero polynomial");
        assert_eq!(
            e.to_string(),
            "arithmetic error: division by zero polynomial"
        );
    }
}
