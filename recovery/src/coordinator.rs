use crate::{
    CandidateGroup, HashAlgorithm, KeyValidator, ModulusRecoveryEngine, RecoveredKey,
    RecoveryConfig, RecoveryError, SignatureRecord, SignerId,
};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use utils::SmallPrimes;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// 记录数量不足, 不尝试恢复
    InsufficientRecords { found: usize, required: usize },
    /// 所有(e, bits)候选都没有通过验证
    Unrecoverable { attempts: usize },
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientRecords { found, required } => {
                write!(f, "insufficient records: found {found}, need at least {required}")
            }
            Self::Unrecoverable { attempts } => {
                write!(f, "unrecoverable: no key validated after {attempts} candidates")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupFailure {
    pub signer: SignerId,
    pub reason: FailureReason,
}

impl Display for GroupFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.signer, self.reason)
    }
}

/// Keys and failures, both in group discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    pub keys: Vec<RecoveredKey>,
    pub failures: Vec<GroupFailure>,
}

pub struct RecoveryCoordinator {
    config: RecoveryConfig,
    primes: SmallPrimes,
    // 0 lets rayon decide
    threads: usize,
}

impl RecoveryCoordinator {
    pub fn new(config: RecoveryConfig) -> Result<Self, RecoveryError> {
        config.validate()?;
        let primes = SmallPrimes::new(config.trial_division_bound);

        Ok(Self {
            config,
            primes,
            threads: 0,
        })
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Group `records` by signer identity and recover one key per group.
    pub fn recover(&self, records: Vec<SignatureRecord>) -> Result<RecoveryReport, RecoveryError> {
        if records.is_empty() {
            return Err(RecoveryError::InvariantViolation(
                "no records to recover a key from".to_string(),
            ));
        }

        self.recover_groups(CandidateGroup::group_records(records))
    }

    pub fn recover_groups(
        &self,
        groups: Vec<CandidateGroup>,
    ) -> Result<RecoveryReport, RecoveryError> {
        if groups.is_empty() {
            return Err(RecoveryError::InvariantViolation(
                "no candidate groups to recover a key from".to_string(),
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| RecoveryError::ThreadPool(e.to_string()))?;

        let results = pool.install(|| {
            groups
                .par_iter()
                .map(|g| self.recover_group(g))
                .collect::<Vec<_>>()
        });

        let mut report = RecoveryReport::default();
        for res in results {
            match res {
                Ok(key) => report.keys.push(key),
                Err(failure) => report.failures.push(failure),
            }
        }

        Ok(report)
    }

    /// Search the (exponent, bit length) candidates of one group, the first validated key wins.
    pub fn recover_group(&self, group: &CandidateGroup) -> Result<RecoveredKey, GroupFailure> {
        let group = self.sanitize(group);
        let signer = group.signer();

        if group.len() < self.config.min_group_size {
            let failure = GroupFailure {
                signer: signer.clone(),
                reason: FailureReason::InsufficientRecords {
                    found: group.len(),
                    required: self.config.min_group_size,
                },
            };
            log::info!("{failure}");
            return Err(failure);
        }

        let (exponents, lengths) = (self.exponent_order(&group), self.length_order(&group));
        let (engine, mut attempts) = (ModulusRecoveryEngine::new(&self.config, &self.primes), 0);

        if !lengths.is_empty() {
            for &e in exponents.iter() {
                let powered = engine.exponentiate(&group, e);

                for &bits in lengths.iter() {
                    attempts += 1;
                    match engine.modulus_candidate(&powered, bits) {
                        Ok(n) => match KeyValidator.validate(&n, e, &group) {
                            Some(key) => {
                                log::info!(
                                    "{signer}: recovered {}-bit key with e={e}",
                                    key.bit_length()
                                );
                                return Ok(key);
                            }
                            None => log::debug!(
                                "{signer}: e={e}, {bits} bits: candidate rejected by the validator"
                            ),
                        },
                        Err(miss) => log::debug!("{signer}: e={e}, {bits} bits: {miss}"),
                    }
                }
            }
        }

        let failure = GroupFailure {
            signer: signer.clone(),
            reason: FailureReason::Unrecoverable { attempts },
        };
        log::info!("{failure}");
        Err(failure)
    }

    /// Two signed messages of unknown hash: both signatures are tried as SHA-256, then as
    /// SHA-512 signatures.
    pub fn recover_pair(
        &self,
        signer: SignerId,
        first: (&[u8], &[u8]),
        second: (&[u8], &[u8]),
    ) -> Result<Option<RecoveredKey>, RecoveryError> {
        if first.1.len() != second.1.len() {
            return Err(RecoveryError::MalformedRecord {
                signer,
                reason: format!(
                    "all signature sizes must be identical, `{}` != `{}`",
                    first.1.len(),
                    second.1.len()
                ),
            });
        }

        if first.1 == second.1 {
            return Err(RecoveryError::MalformedRecord {
                signer,
                reason: "duplicate signatures found".to_string(),
            });
        }

        for hash in [HashAlgorithm::Sha256, HashAlgorithm::Sha512] {
            log::debug!("solving for {hash}");
            let records = [first, second]
                .into_iter()
                .map(|(data, sig)| {
                    SignatureRecord::from_signature_bytes(data.to_vec(), sig, hash, signer.clone())
                })
                .collect();
            let group = CandidateGroup::new(signer.clone(), records)?;

            if let Ok(key) = self.recover_group(&group) {
                return Ok(Some(key));
            }
        }

        Ok(None)
    }

    /// Drop the records no candidate modulus can be recovered from.
    fn sanitize(&self, group: &CandidateGroup) -> CandidateGroup {
        let max_bits = self
            .length_hints(group)
            .chain([self.config.max_bit_length()])
            .max()
            .unwrap_or_default() as u64;
        let mut seen = HashSet::new();

        group.filtered(|i, r| {
            let reason = if r.signature().bits() == 0 {
                "the signature is zero".to_string()
            } else if r.signature().bits() > max_bits {
                format!("the signature is wider than {max_bits} bits")
            } else if !seen.insert(r.signature().clone()) {
                "duplicate signature".to_string()
            } else {
                return true;
            };

            let err = RecoveryError::MalformedRecord {
                signer: group.signer().clone(),
                reason: format!("record {i}: {reason}"),
            };
            log::warn!("{err}, skipped");
            false
        })
    }

    /// Modulus bit lengths from the encoded signature lengths. The GCD of an `L`-bit modulus has
    /// at least `L` bits, so a hint must stay below `max_gcd_bits`.
    fn length_hints<'g>(&self, group: &'g CandidateGroup) -> impl Iterator<Item = usize> + 'g {
        let max_gcd_bits = self.config.max_gcd_bits;
        group
            .records()
            .iter()
            .filter_map(|r| r.encoded_len())
            .map(|len| len << 3)
            .filter(move |&bits| bits >= RecoveryConfig::MIN_BIT_LENGTH && bits < max_gcd_bits)
    }

    /// Record hints first, then the configured exponents from the cheapest exact power up.
    fn exponent_order(&self, group: &CandidateGroup) -> Vec<u32> {
        let mut order = Vec::with_capacity(self.config.exponents.len() + 1);
        for e in group.records().iter().filter_map(|r| r.exponent_hint()) {
            if e < 3 || e & 1 == 0 {
                log::warn!("{}: ignore the exponent hint `{e}`", group.signer());
            } else if !order.contains(&e) {
                order.push(e);
            }
        }

        let mut configured = self.config.exponents.clone();
        configured.sort_unstable();
        for e in configured {
            if !order.contains(&e) {
                order.push(e);
            }
        }

        order
    }

    /// Encoded signature lengths first, then the configured lengths. Lengths narrower than some
    /// signature cannot be the modulus length.
    fn length_order(&self, group: &CandidateGroup) -> Vec<usize> {
        let widest = group
            .records()
            .iter()
            .map(|r| r.signature().bits() as usize)
            .max()
            .unwrap_or_default();

        let mut order = Vec::with_capacity(self.config.bit_lengths.len() + 1);
        let configured = self.config.bit_lengths.iter().copied();
        for bits in self.length_hints(group).chain(configured) {
            if bits >= widest && !order.contains(&bits) {
                order.push(bits);
            }
        }

        order
    }
}
