use crate::HashAlgorithm;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The presumed signing identity, records with the same identity are assumed to share a key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignerId {
    pub domain: String,
    pub selector: String,
}

impl SignerId {
    pub fn new(domain: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            selector: selector.into(),
        }
    }
}

impl Display for SignerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "d={}; s={}", self.domain, self.selector)
    }
}

/// One signed message: the canonicalized bytes that were hashed and the raw RSA signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureRecord {
    signed_bytes: Vec<u8>,
    signature: BigUint,
    hash: HashAlgorithm,
    signer: SignerId,
    exponent_hint: Option<u32>,
    // byte length of the signature as it was encoded
    encoded_len: Option<usize>,
}

impl SignatureRecord {
    pub fn new(
        signed_bytes: Vec<u8>,
        signature: BigUint,
        hash: HashAlgorithm,
        signer: SignerId,
    ) -> Self {
        Self {
            signed_bytes,
            signature,
            hash,
            signer,
            exponent_hint: None,
            encoded_len: None,
        }
    }

    /// `signature` is the big-endian signature octet string, its length is kept as a modulus size hint.
    pub fn from_signature_bytes(
        signed_bytes: Vec<u8>,
        signature: &[u8],
        hash: HashAlgorithm,
        signer: SignerId,
    ) -> Self {
        Self {
            encoded_len: Some(signature.len()),
            ..Self::new(
                signed_bytes,
                BigUint::from_bytes_be(signature),
                hash,
                signer,
            )
        }
    }

    pub fn with_exponent_hint(mut self, e: u32) -> Self {
        self.exponent_hint = Some(e);
        self
    }

    pub fn signed_bytes(&self) -> &[u8] {
        self.signed_bytes.as_slice()
    }

    pub fn signature(&self) -> &BigUint {
        &self.signature
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    pub fn signer(&self) -> &SignerId {
        &self.signer
    }

    pub fn exponent_hint(&self) -> Option<u32> {
        self.exponent_hint
    }

    pub fn encoded_len(&self) -> Option<usize> {
        self.encoded_len
    }
}
