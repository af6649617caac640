use crate::RecoveryError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RecoveryConfig {
    /// candidate public exponents
    pub exponents: Vec<u32>,

    /// candidate modulus bit lengths, tried in this order
    pub bit_lengths: Vec<usize>,

    /// primes below this bound are divided out of the GCD
    pub trial_division_bound: u32,

    /// groups smaller than this are not attempted
    pub min_group_size: usize,

    /// records feeding one GCD, extra records are only used for validation
    pub max_records_per_gcd: usize,

    /// a GCD wider than this is not trial divided
    pub max_gcd_bits: usize,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            exponents: vec![65537, 3, 17],
            bit_lengths: vec![1024, 2048, 3072, 4096],
            trial_division_bound: 100000,
            min_group_size: 2,
            max_records_per_gcd: 8,
            max_gcd_bits: 10000,
        }
    }
}

impl RecoveryConfig {
    pub const MIN_BIT_LENGTH: usize = 512;

    /// the sieve holds one byte per number below the bound
    pub const MAX_TRIAL_DIVISION_BOUND: u32 = 1 << 24;

    pub fn validate(&self) -> Result<(), RecoveryError> {
        if self.exponents.is_empty() {
            return Err(RecoveryError::InvalidConfig(
                "at least one candidate exponent is required".to_string(),
            ));
        }

        if let Some(e) = self.exponents.iter().find(|&&e| e < 3 || e & 1 == 0) {
            return Err(RecoveryError::InvalidConfig(format!(
                "the exponent `{e}` is not an odd number greater than 2"
            )));
        }

        if self.bit_lengths.is_empty() {
            return Err(RecoveryError::InvalidConfig(
                "at least one candidate bit length is required".to_string(),
            ));
        }

        if let Some(l) = self
            .bit_lengths
            .iter()
            .find(|&&l| l & 7 != 0 || l < Self::MIN_BIT_LENGTH)
        {
            return Err(RecoveryError::InvalidConfig(format!(
                "the bit length `{l}` must be a multiple of 8 and at least {}",
                Self::MIN_BIT_LENGTH
            )));
        }

        if self.min_group_size < 2 {
            return Err(RecoveryError::InvalidConfig(format!(
                "the minimum group size `{}` is less than 2",
                self.min_group_size
            )));
        }

        if !(3..=Self::MAX_TRIAL_DIVISION_BOUND).contains(&self.trial_division_bound) {
            return Err(RecoveryError::InvalidConfig(format!(
                "the trial division bound `{}` is not in [3, {}]",
                self.trial_division_bound,
                Self::MAX_TRIAL_DIVISION_BOUND
            )));
        }

        if self.max_records_per_gcd < 2 {
            return Err(RecoveryError::InvalidConfig(format!(
                "`{}` records per GCD cannot isolate a modulus",
                self.max_records_per_gcd
            )));
        }

        if self.max_gcd_bits <= self.max_bit_length() {
            return Err(RecoveryError::InvalidConfig(format!(
                "max_gcd_bits `{}` must be greater than the largest bit length `{}`",
                self.max_gcd_bits,
                self.max_bit_length()
            )));
        }

        Ok(())
    }

    pub fn max_bit_length(&self) -> usize {
        self.bit_lengths.iter().copied().max().unwrap_or_default()
    }
}
