//! RSA public key recovery from PKCS #1 v1.5 signatures.
//!
//! Signatures made with the same key share the modulus: $n \mid s_i^e - m_i$ for every
//! signature $s_i$ and its padded digest $m_i$, so the GCD of these differences reveals $n$
//! up to small factors.

mod error;
pub use error::RecoveryError;

mod hash;
pub use hash::HashAlgorithm;

mod record;
pub use record::{SignatureRecord, SignerId};

mod padding;
pub use padding::PaddedHashBuilder;

mod config;
pub use config::RecoveryConfig;

mod group;
pub use group::CandidateGroup;

mod key;
pub use key::RecoveredKey;

mod validator;
pub use validator::KeyValidator;

mod engine;
pub use engine::{CandidateMiss, ExponentiatedGroup, ModulusRecoveryEngine};

mod coordinator;
pub use coordinator::{FailureReason, GroupFailure, RecoveryCoordinator, RecoveryReport};

#[cfg(test)]
mod fixtures;
