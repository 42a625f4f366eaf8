//! The digest collaborator threaded through the NTRU parameter block.
//!
//! Parameter sets only record which algorithm they use; the parameter
//! block serializes the algorithm name and deserialization maps the name
//! back through a factory. The two concrete digests here wrap the
//! streaming hashers from `hmac-sha256` and `hmac-sha512`.

use crate::error::{Error, Result};

pub trait Digest {
    fn update(&mut self, data: &[u8]);
    /// Produce the digest of everything fed so far and reset the state.
    fn finalize_reset(&mut self) -> Vec<u8>;
    fn reset(&mut self);
    fn algorithm_name(&self) -> &'static str;
    /// Digest length in bytes.
    fn output_len(&self) -> usize;
}

/// The digest algorithms the predefined NTRU parameter sets use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha256,
    Sha512,
}

impl DigestAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }

    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    pub fn instantiate(&self) -> Box<dyn Digest> {
        match self {
            DigestAlgorithm::Sha256 => Box::new(Sha256::new()),
            DigestAlgorithm::Sha512 => Box::new(Sha512::new()),
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "SHA-256" => Ok(DigestAlgorithm::Sha256),
            "SHA-512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(Error::Config("unknown digest algorithm name")),
        }
    }
}

pub struct Sha256 {
    inner: hmac_sha256::Hash,
}

impl Sha256 {
    pub fn new() -> Self {
        Self {
            inner: hmac_sha256::Hash::new(),
        }
    }
}

impl Digest for Sha256 {
    fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        let done = std::mem::replace(&mut self.inner, hmac_sha256::Hash::new());
        done.finalize().to_vec()
    }

    fn reset(&mut self) {
        self.inner = hmac_sha256::Hash::new();
    }

    fn algorithm_name(&self) -> &'static str {
        "SHA-256"
    }

    fn output_len(&self) -> usize {
        32
    }
}

pub struct Sha512 {
    inner: hmac_sha512::Hash,
}

impl Sha512 {
    pub fn new() -> Self {
        Self {
            inner: hmac_sha512::Hash::new(),
        }
    }
}

impl Digest for Sha512 {
    fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        let done = std::mem::replace(&mut self.inner, hmac_sha512::Hash::new());
        done.finalize().to_vec()
    }

    fn reset(&mut self) {
        self.inner = hmac_sha512::Hash::new();
    }

    fn algorithm_name(&self) -> &'static str {
        "SHA-512"
    }

    fn output_len(&self) -> usize {
        64
    }
}

/// Factory collaborator handed to parameter-block deserialization.
pub trait DigestFactory {
    fn create(&self, name: &str) -> Result<Box<dyn Digest>>;
}

/// Maps the two standard names to their implementations.
pub struct StandardDigestFactory;

impl DigestFactory for StandardDigestFactory {
    fn create(&self, name: &str) -> Result<Box<dyn Digest>> {
        Ok(DigestAlgorithm::from_name(name)?.instantiate())
    }
}

pub fn digest_from_name(name: &str) -> Result<Box<dyn Digest>> {
    StandardDigestFactory.create(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_streaming_matches_one_shot() {
        let mut d = Sha256::new();
        d.update(b"abc");
        let streamed = d.finalize_reset();
        assert_eq!(streamed, hmac_sha256::Hash::hash(b"abc").to_vec());
        // State is fresh after finalize_reset.
        d.update(b"abc");
        assert_eq!(d.finalize_reset(), streamed);
    }

    #[test]
    fn sha512_known_vector() {
        let mut d = Sha512::new();
        d.update(b"");
        let out = d.finalize_reset();
        assert_eq!(out.len(), 64);
        assert_eq!(
            hex::encode(&out[..8]),
            // First 8 bytes of SHA-512("").
            "cf83e1357eefb8bd"
        );
    }

    #[test]
    fn factory_resolves_names() {
        let f = StandardDigestFactory;
        assert_eq!(f.create("SHA-256").unwrap().output_len(), 32);
        assert_eq!(f.create("SHA-512").unwrap().output_len(), 64);
        assert!(f.create("MD5").is_err());
    }

    #[test]
    fn reset_clears_pending_input() {
        let mut d = Sha256::new();
        d.update(b"garbage");
        d.reset();
        d.update(b"abc");
        assert_eq!(d.finalize_reset(), hmac_sha256::Hash::hash(b"abc").to_vec());
    }
}
