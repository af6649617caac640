use crate::{CandidateGroup, PaddedHashBuilder, RecoveredKey};
use num_bigint::BigUint;
use utils::BigUintExt;

/// Accepts a modulus candidate only when every signature of the group verifies under it.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyValidator;

impl KeyValidator {
    pub fn validate(&self, n: &BigUint, e: u32, group: &CandidateGroup) -> Option<RecoveredKey> {
        let (klen, exp) = (BigUintExt(n).byte_len(), BigUint::from(e));

        for (i, r) in group.records().iter().enumerate() {
            // RSAVP1 requires s < n
            if r.signature() >= n {
                log::trace!("{}: record {i} signature is not less than the candidate modulus", group.signer());
                return None;
            }

            let em = match PaddedHashBuilder::build(r.signed_bytes(), r.hash_algorithm(), klen) {
                Ok(em) => em,
                Err(err) => {
                    log::trace!("{}: record {i} {err}", group.signer());
                    return None;
                }
            };

            if r.signature().modpow(&exp, n) != em {
                log::debug!(
                    "{}: record {i} rejects the {}-bit candidate with e={e}",
                    group.signer(),
                    n.bits()
                );
                return None;
            }
        }

        Some(RecoveredKey::new(n.clone(), e, group.signer().clone(), group.len()))
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::{KEY_1024_A, KEY_1024_B, MESSAGES};
    use crate::{CandidateGroup, HashAlgorithm, KeyValidator};

    #[test]
    fn accepts_true_key() {
        let key = KEY_1024_A.private_key(65537);
        let records = MESSAGES
            .iter()
            .map(|m| key.sign(m, HashAlgorithm::Sha256, "a.example", "s1"))
            .collect::<Vec<_>>();
        let group = CandidateGroup::new(records[0].signer().clone(), records).unwrap();

        let recovered = KeyValidator.validate(key.modulus(), 65537, &group).unwrap();
        assert_eq!(recovered.modulus(), key.modulus());
        assert_eq!(recovered.exponent(), 65537);
        assert_eq!(recovered.verified_count(), MESSAGES.len());

        // same modulus, wrong exponent
        assert!(KeyValidator.validate(key.modulus(), 3, &group).is_none());
    }

    #[test]
    fn rejects_single_mismatch() {
        let (good, other) = (KEY_1024_A.private_key(65537), KEY_1024_B.private_key(65537));

        let mut records = MESSAGES[..3]
            .iter()
            .map(|m| good.sign(m, HashAlgorithm::Sha256, "a.example", "s1"))
            .collect::<Vec<_>>();
        records.push(other.sign(MESSAGES[3], HashAlgorithm::Sha256, "a.example", "s1"));
        let group = CandidateGroup::new(records[0].signer().clone(), records).unwrap();

        // 3 of 4 records verify under the modulus, the candidate must still be rejected
        let verified = group
            .records()
            .iter()
            .take(3)
            .map(|r| {
                CandidateGroup::new(group.signer().clone(), vec![r.clone()]).unwrap()
            })
            .filter(|g| KeyValidator.validate(good.modulus(), 65537, g).is_some())
            .count();
        assert_eq!(verified, 3);
        assert!(KeyValidator.validate(good.modulus(), 65537, &group).is_none());
    }

    #[test]
    fn rejects_multiple_of_modulus() {
        let key = KEY_1024_A.private_key(3);
        let records = MESSAGES[..2]
            .iter()
            .map(|m| key.sign(m, HashAlgorithm::Sha1, "a.example", "s1"))
            .collect::<Vec<_>>();
        let group = CandidateGroup::new(records[0].signer().clone(), records).unwrap();

        let spurious = key.modulus() * 3u32;
        assert!(KeyValidator.validate(&spurious, 3, &group).is_none());
        assert!(KeyValidator.validate(key.modulus(), 3, &group).is_some());
    }
}
