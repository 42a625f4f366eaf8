//! NTRUEncrypt parameter sets.
//!
//! A parameter block carries the primary inputs (N, q, the ternary
//! weights, buffer sizes, IGF tuning) plus a handful of derived values
//! that key generation and the encryption buffers depend on. The derived
//! values are a pure function of the primaries, recomputed on
//! construction and on deserialization, so two blocks built from the
//! same primaries are equal in every field.
//!
//! Blank coefficients come in two shapes: SIMPLE uses one ternary
//! polynomial of weight df, PRODUCT expresses it as f1·f2 + f3 with
//! separate weights df1, df2, df3 for the three factors.

use std::io;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::digest::{DigestAlgorithm, DigestFactory};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolyType {
    Simple,
    Product,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NtruEncryptParams {
    pub n: i32,
    pub q: i32,
    pub df: i32,
    pub df1: i32,
    pub df2: i32,
    pub df3: i32,
    pub dr: i32,
    pub dr1: i32,
    pub dr2: i32,
    pub dr3: i32,
    pub dg: i32,
    pub llen: i32,
    pub max_msg_len_bytes: i32,
    pub db: i32,
    pub buffer_len_bits: i32,
    pub buffer_len_trits: i32,
    pub dm0: i32,
    pub pk_len: i32,
    pub c: i32,
    pub min_calls_r: i32,
    pub min_calls_mask: i32,
    pub hash_seed: bool,
    pub oid: Vec<u8>,
    pub sparse: bool,
    pub fast_fp: bool,
    pub poly_type: PolyType,
    pub digest: DigestAlgorithm,
}

impl NtruEncryptParams {
    /// A parameter set whose blinding polynomial is a single ternary
    /// polynomial of weight `df`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_simple(
        n: i32,
        q: i32,
        df: i32,
        dm0: i32,
        db: i32,
        c: i32,
        min_calls_r: i32,
        min_calls_mask: i32,
        hash_seed: bool,
        oid: [u8; 3],
        sparse: bool,
        fast_fp: bool,
        digest: DigestAlgorithm,
    ) -> Self {
        let mut params = Self {
            n,
            q,
            df,
            df1: 0,
            df2: 0,
            df3: 0,
            dr: 0,
            dr1: 0,
            dr2: 0,
            dr3: 0,
            dg: 0,
            llen: 0,
            max_msg_len_bytes: 0,
            db,
            buffer_len_bits: 0,
            buffer_len_trits: 0,
            dm0,
            pk_len: 0,
            c,
            min_calls_r,
            min_calls_mask,
            hash_seed,
            oid: oid.to_vec(),
            sparse,
            fast_fp,
            poly_type: PolyType::Simple,
            digest,
        };
        params.init();
        params
    }

    /// A parameter set with a product-form blinding polynomial
    /// f1·f2 + f3 of weights `df1`, `df2`, `df3`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_product(
        n: i32,
        q: i32,
        df1: i32,
        df2: i32,
        df3: i32,
        dm0: i32,
        db: i32,
        c: i32,
        min_calls_r: i32,
        min_calls_mask: i32,
        hash_seed: bool,
        oid: [u8; 3],
        sparse: bool,
        fast_fp: bool,
        digest: DigestAlgorithm,
    ) -> Self {
        let mut params = Self {
            n,
            q,
            df: 0,
            df1,
            df2,
            df3,
            dr: 0,
            dr1: 0,
            dr2: 0,
            dr3: 0,
            dg: 0,
            llen: 0,
            max_msg_len_bytes: 0,
            db,
            buffer_len_bits: 0,
            buffer_len_trits: 0,
            dm0,
            pk_len: 0,
            c,
            min_calls_r,
            min_calls_mask,
            hash_seed,
            oid: oid.to_vec(),
            sparse,
            fast_fp,
            poly_type: PolyType::Product,
            digest,
        };
        params.init();
        params
    }

    /// Recompute every derived value from the primaries.
    fn init(&mut self) {
        match self.poly_type {
            PolyType::Simple => {
                self.dr = self.df;
            }
            PolyType::Product => {
                self.dr1 = self.df1;
                self.dr2 = self.df2;
                self.dr3 = self.df3;
            }
        }
        self.dg = self.n / 3;
        self.llen = 1;
        self.max_msg_len_bytes = self.n * 3 / 2 / 8 - self.llen - self.db / 8 - 1;
        self.buffer_len_bits = (self.n * 3 / 2 + 7) / 8 * 8 + 1;
        self.buffer_len_trits = self.n - 1;
        self.pk_len = self.db;
    }

    // -- predefined sets ----------------------------------------------

    pub fn ees1087ep2() -> Self {
        Self::new_simple(
            1087,
            2048,
            120,
            120,
            256,
            13,
            25,
            14,
            true,
            [0, 6, 3],
            true,
            false,
            DigestAlgorithm::Sha512,
        )
    }

    pub fn ees1171ep1() -> Self {
        Self::new_simple(
            1171,
            2048,
            106,
            106,
            256,
            13,
            20,
            15,
            true,
            [0, 6, 4],
            true,
            false,
            DigestAlgorithm::Sha512,
        )
    }

    pub fn ees1499ep1() -> Self {
        Self::new_simple(
            1499,
            2048,
            79,
            79,
            256,
            13,
            17,
            19,
            true,
            [0, 6, 5],
            true,
            false,
            DigestAlgorithm::Sha512,
        )
    }

    /// The extended variant of EES1499EP1 with a 512-bit random salt.
    pub fn ees1499ep1_ext() -> Self {
        Self::new_simple(
            1499,
            2048,
            79,
            79,
            512,
            13,
            17,
            19,
            true,
            [0, 6, 6],
            true,
            false,
            DigestAlgorithm::Sha512,
        )
    }

    pub fn apr2011_439() -> Self {
        Self::new_simple(
            439,
            2048,
            146,
            130,
            128,
            9,
            32,
            9,
            true,
            [0, 7, 101],
            true,
            false,
            DigestAlgorithm::Sha256,
        )
    }

    pub fn apr2011_439_fast() -> Self {
        Self::new_product(
            439,
            2048,
            9,
            8,
            5,
            130,
            128,
            9,
            32,
            9,
            true,
            [0, 7, 101],
            true,
            true,
            DigestAlgorithm::Sha256,
        )
    }

    pub fn apr2011_743() -> Self {
        Self::new_simple(
            743,
            2048,
            248,
            220,
            256,
            10,
            27,
            14,
            true,
            [0, 7, 105],
            false,
            false,
            DigestAlgorithm::Sha512,
        )
    }

    pub fn apr2011_743_fast() -> Self {
        Self::new_product(
            743,
            2048,
            11,
            11,
            15,
            220,
            256,
            10,
            27,
            14,
            true,
            [0, 7, 105],
            false,
            true,
            DigestAlgorithm::Sha512,
        )
    }

    // -- serialization ------------------------------------------------

    /// Little-endian fixed-width layout: the signed 32-bit primaries,
    /// the three booleans as single bytes, the OID and the digest
    /// algorithm name with one-byte length prefixes.
    pub fn write_to<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_i32::<LittleEndian>(self.n)?;
        w.write_i32::<LittleEndian>(self.q)?;
        w.write_i32::<LittleEndian>(self.df)?;
        w.write_i32::<LittleEndian>(self.df1)?;
        w.write_i32::<LittleEndian>(self.df2)?;
        w.write_i32::<LittleEndian>(self.df3)?;
        w.write_i32::<LittleEndian>(self.db)?;
        w.write_i32::<LittleEndian>(self.dm0)?;
        w.write_i32::<LittleEndian>(self.c)?;
        w.write_i32::<LittleEndian>(self.min_calls_r)?;
        w.write_i32::<LittleEndian>(self.min_calls_mask)?;
        w.write_u8(self.hash_seed as u8)?;
        w.write_u8(self.oid.len() as u8)?;
        w.write_all(&self.oid)?;
        w.write_u8(self.sparse as u8)?;
        w.write_u8(self.fast_fp as u8)?;
        w.write_i32::<LittleEndian>(match self.poly_type {
            PolyType::Simple => 0,
            PolyType::Product => 1,
        })?;
        let name = self.digest.name().as_bytes();
        w.write_u8(name.len() as u8)?;
        w.write_all(name)?;
        Ok(())
    }

    /// Parse a parameter block, resolving the stored digest name through
    /// the factory collaborator.
    pub fn read_from<R: io::Read>(r: &mut R, factory: &impl DigestFactory) -> Result<Self> {
        fn short(_: io::Error) -> Error {
            Error::Encoding("truncated parameter block")
        }

        let n = r.read_i32::<LittleEndian>().map_err(short)?;
        let q = r.read_i32::<LittleEndian>().map_err(short)?;
        let df = r.read_i32::<LittleEndian>().map_err(short)?;
        let df1 = r.read_i32::<LittleEndian>().map_err(short)?;
        let df2 = r.read_i32::<LittleEndian>().map_err(short)?;
        let df3 = r.read_i32::<LittleEndian>().map_err(short)?;
        let db = r.read_i32::<LittleEndian>().map_err(short)?;
        let dm0 = r.read_i32::<LittleEndian>().map_err(short)?;
        let c = r.read_i32::<LittleEndian>().map_err(short)?;
        let min_calls_r = r.read_i32::<LittleEndian>().map_err(short)?;
        let min_calls_mask = r.read_i32::<LittleEndian>().map_err(short)?;
        let hash_seed = r.read_u8().map_err(short)? != 0;
        let oid_len = r.read_u8().map_err(short)? as usize;
        let mut oid = vec![0u8; oid_len];
        r.read_exact(&mut oid).map_err(short)?;
        let sparse = r.read_u8().map_err(short)? != 0;
        let fast_fp = r.read_u8().map_err(short)? != 0;
        let poly_type = match r.read_i32::<LittleEndian>().map_err(short)? {
            0 => PolyType::Simple,
            1 => PolyType::Product,
            _ => return Err(Error::Config("unknown polynomial type")),
        };
        let name_len = r.read_u8().map_err(short)? as usize;
        let mut name = vec![0u8; name_len];
        r.read_exact(&mut name).map_err(short)?;
        let name = String::from_utf8(name)
            .map_err(|_| Error::Encoding("digest algorithm name is not UTF-8"))?;
        let digest_instance = factory.create(&name)?;
        let digest = DigestAlgorithm::from_name(digest_instance.algorithm_name())?;

        let mut params = Self {
            n,
            q,
            df,
            df1,
            df2,
            df3,
            dr: 0,
            dr1: 0,
            dr2: 0,
            dr3: 0,
            dg: 0,
            llen: 0,
            max_msg_len_bytes: 0,
            db,
            buffer_len_bits: 0,
            buffer_len_trits: 0,
            dm0,
            pk_len: 0,
            c,
            min_calls_r,
            min_calls_mask,
            hash_seed,
            oid,
            sparse,
            fast_fp,
            poly_type,
            digest,
        };
        params.init();
        Ok(params)
    }
}
