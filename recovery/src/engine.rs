//! GCD based modulus recovery
//!
//! 对于同一个密钥的签名$s_i$和填充后的摘要$m_i$, 有$s_i^e \equiv m_i \mod n$, 即
//! $n \mid s_i^e - m_i$. 因此$g = \gcd(s_1^e - m_1, s_2^e - m_2, ...)$是$n$的倍数,
//! $g = n \cdot r$, 其中$r$通常只包含小素因子.
//!
//! $s_i^e$ is computed exactly (no modulus is known), for `e = 65537` and a 2048-bit key that is
//! a 134 million bit integer, so the exponentiation and the GCD run on GMP (`rug::Integer`),
//! which has sub-quadratic GCD. Everything narrower stays on `BigUint`.

use crate::{CandidateGroup, PaddedHashBuilder, RecoveryConfig, RecoveryError, SignatureRecord};
use num_bigint::BigUint;
use num_traits::One;
use rug::integer::Order;
use rug::ops::Pow;
use rug::Integer;
use std::fmt::{Display, Formatter};
use utils::{BigUintExt, SmallPrimes, Stripped};

/// The reason a single (exponent, bit length) candidate produced no modulus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CandidateMiss {
    /// the padding of some record does not fit in `bits / 8` bytes
    Padding(RecoveryError),
    /// less than two records produced a usable difference
    TooFewRecords { usable: usize },
    /// the GCD is narrower than the candidate modulus
    GcdTooSmall { bits: u32 },
    /// the GCD is too wide to be trial divided
    GcdTooLarge { bits: u32 },
    /// after removing the small factors the value is not an odd `bits`-bit number
    OutOfRange { bits: u64 },
}

impl Display for CandidateMiss {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Padding(e) => write!(f, "{e}"),
            Self::TooFewRecords { usable } => write!(f, "only `{usable}` usable records"),
            Self::GcdTooSmall { bits } => write!(f, "the gcd shrinks to `{bits}` bits"),
            Self::GcdTooLarge { bits } => write!(f, "skip the gcd with `{bits}` bits"),
            Self::OutOfRange { bits } => {
                write!(f, "the stripped gcd with `{bits}` bits is not a modulus")
            }
        }
    }
}

/// Signatures of a group raised to one exponent, shared by every candidate bit length.
pub struct ExponentiatedGroup<'g> {
    group: &'g CandidateGroup,
    e: u32,
    // (record, s^e)
    powers: Vec<(&'g SignatureRecord, Integer)>,
}

impl<'g> ExponentiatedGroup<'g> {
    pub fn group(&self) -> &'g CandidateGroup {
        self.group
    }

    pub fn exponent(&self) -> u32 {
        self.e
    }

    pub fn len(&self) -> usize {
        self.powers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }
}

pub struct ModulusRecoveryEngine<'a> {
    config: &'a RecoveryConfig,
    primes: &'a SmallPrimes,
}

impl<'a> ModulusRecoveryEngine<'a> {
    /// `primes` should hold every prime below `config.trial_division_bound`
    pub fn new(config: &'a RecoveryConfig, primes: &'a SmallPrimes) -> Self {
        Self { config, primes }
    }

    /// Raise the first `max_records_per_gcd` signatures of `group` to `e`.
    pub fn exponentiate<'g>(&self, group: &'g CandidateGroup, e: u32) -> ExponentiatedGroup<'g> {
        let powers = group
            .records()
            .iter()
            .take(self.config.max_records_per_gcd)
            .map(|r| (r, to_integer(r.signature()).pow(e)))
            .collect();

        ExponentiatedGroup { group, e, powers }
    }

    /// A modulus candidate of about `bits` bits for the exponent of `powered`.
    pub fn modulus_candidate(
        &self,
        powered: &ExponentiatedGroup,
        bits: usize,
    ) -> Result<BigUint, CandidateMiss> {
        let (signer, e, klen) = (powered.group.signer(), powered.e, bits >> 3);
        let low = bits.saturating_sub(8);

        let (mut g, mut usable): (Option<Integer>, usize) = (None, 0);
        for (i, (r, power)) in powered.powers.iter().enumerate() {
            // a signature is always less than its modulus
            if r.signature().bits() as usize > bits {
                log::trace!("{signer}: record {i} signature is wider than {bits} bits");
                continue;
            }

            let em = PaddedHashBuilder::build(r.signed_bytes(), r.hash_algorithm(), klen)
                .map_err(CandidateMiss::Padding)?;

            let Some(delta) = exact_delta(power, &em) else {
                log::warn!("{signer}: record {i} signature equals its padded digest for e={e}, skipped");
                continue;
            };

            usable += 1;
            g = Some(match g {
                None => delta,
                Some(mut g) => {
                    g.gcd_mut(&delta);
                    g
                }
            });

            if let Some(g) = g.as_ref() {
                let gbits = g.significant_bits();
                if usable >= 2 && (gbits as usize) < low {
                    return Err(CandidateMiss::GcdTooSmall { bits: gbits });
                }
            }
        }

        let g = match g {
            Some(g) if usable >= 2 => g,
            _ => return Err(CandidateMiss::TooFewRecords { usable }),
        };

        let gbits = g.significant_bits();
        log::trace!("{signer}: e={e}, {bits} bits, gcd has {gbits} bits");
        if gbits as usize > self.config.max_gcd_bits {
            return Err(CandidateMiss::GcdTooLarge { bits: gbits });
        }

        let Stripped { value: n, removed } = self.primes.strip(to_biguint(&g));
        for (p, k) in removed {
            log::debug!("{signer}: removing small prime factor {p}^{k}");
        }

        let nbits = n.bits();
        if (nbits as usize) < low
            || nbits as usize > bits
            || !BigUintExt(&n).is_odd_number()
            || n.is_one()
        {
            return Err(CandidateMiss::OutOfRange { bits: nbits });
        }

        Ok(n)
    }

    /// `modulus_candidate` for a single (e, bits) pair.
    pub fn recover(
        &self,
        group: &CandidateGroup,
        e: u32,
        bits: usize,
    ) -> Result<BigUint, CandidateMiss> {
        self.modulus_candidate(&self.exponentiate(group, e), bits)
    }
}

/// |s^e - m|, `None` if zero
fn exact_delta(power: &Integer, em: &BigUint) -> Option<Integer> {
    let mut delta = power.clone();
    delta -= to_integer(em);
    delta.abs_mut();

    if delta == 0 {
        None
    } else {
        Some(delta)
    }
}

fn to_integer(n: &BigUint) -> Integer {
    Integer::from_digits(n.to_bytes_be().as_slice(), Order::Msf)
}

fn to_biguint(n: &Integer) -> BigUint {
    BigUint::from_bytes_be(n.to_digits::<u8>(Order::Msf).as_slice())
}
