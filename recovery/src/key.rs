use crate::SignerId;
use num_bigint::BigUint;
use std::fmt::{Display, Formatter};

/// A public key recovered from, and verified against, every signature of a group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveredKey {
    // n = p * q
    n: BigUint,
    e: u32,
    source: SignerId,
    verified: usize,
}

impl RecoveredKey {
    pub(crate) fn new(n: BigUint, e: u32, source: SignerId, verified: usize) -> Self {
        Self {
            n,
            e,
            source,
            verified,
        }
    }

    /// n
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// e
    pub fn exponent(&self) -> u32 {
        self.e
    }

    pub fn bit_length(&self) -> usize {
        self.n.bits() as usize
    }

    pub fn source_group(&self) -> &SignerId {
        &self.source
    }

    /// number of group records whose signature verified under this key
    pub fn verified_count(&self) -> usize {
        self.verified
    }

    pub fn modulus_hex(&self) -> String {
        format!("{:#x}", self.n)
    }

    pub fn exponent_hex(&self) -> String {
        format!("{:#x}", self.e)
    }
}

impl Display for RecoveredKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}, bits={}, n={:#x}, e={:#x}, verified={}}}",
            self.source,
            self.bit_length(),
            self.n,
            self.e,
            self.verified
        )
    }
}
