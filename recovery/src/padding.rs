//! = RFC 8017
//!
//! === EMSA-PKCS1-v1_5
//!
//! em = 0x00 || 0x01 || ps || 0x00 || DigestInfo(hash, H(msg)), ps是至少8字节的0xff
//!

use crate::{HashAlgorithm, RecoveryError};
use num_bigint::BigUint;

/// 0x00 0x01 + at least 8 padding bytes + 0x00
const MIN_OVERHEAD: usize = 11;

/// Rebuilds the padded digest an RSASSA-PKCS1-v1_5 signer raises to the private exponent.
#[derive(Clone, Copy, Debug, Default)]
pub struct PaddedHashBuilder;

impl PaddedHashBuilder {
    /// minimum modulus byte length that can hold the encoding for `hash`
    pub fn min_len(hash: HashAlgorithm) -> usize {
        hash.digest_info_prefix().len() + hash.digest_len() + MIN_OVERHEAD
    }

    /// the encoded message `em`, exactly `klen` bytes
    pub fn encode(
        signed_bytes: &[u8],
        hash: HashAlgorithm,
        klen: usize,
    ) -> Result<Vec<u8>, RecoveryError> {
        let required = Self::min_len(hash);
        if klen < required {
            return Err(RecoveryError::PaddingLength {
                required,
                actual: klen,
            });
        }

        let (prefix, digest) = (hash.digest_info_prefix(), hash.digest(signed_bytes));
        let tlen = prefix.len() + digest.len();

        let (mut em, mut idx) = (vec![0xffu8; klen], 0);
        em[idx] = 0x00;
        idx += 1;
        em[idx] = 0x01;
        idx = klen - tlen - 1;
        em[idx] = 0x00;
        idx += 1;
        em[idx..(idx + prefix.len())].copy_from_slice(prefix);
        idx += prefix.len();
        em[idx..].copy_from_slice(digest.as_slice());

        Ok(em)
    }

    /// the encoded message as a big-endian integer
    pub fn build(
        signed_bytes: &[u8],
        hash: HashAlgorithm,
        klen: usize,
    ) -> Result<BigUint, RecoveryError> {
        Self::encode(signed_bytes, hash, klen).map(|em| BigUint::from_bytes_be(em.as_slice()))
    }
}
