use crate::{RecoveryError, SignatureRecord, SignerId};
use std::collections::HashMap;

/// Records of one signer identity, in discovery order, assumed to share one RSA key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateGroup {
    signer: SignerId,
    records: Vec<SignatureRecord>,
}

impl CandidateGroup {
    pub fn new(signer: SignerId, records: Vec<SignatureRecord>) -> Result<Self, RecoveryError> {
        if records.is_empty() {
            return Err(RecoveryError::InvariantViolation(format!(
                "empty candidate group for {signer}"
            )));
        }

        if let Some(r) = records.iter().find(|r| r.signer() != &signer) {
            return Err(RecoveryError::InvariantViolation(format!(
                "record of {} in the candidate group of {signer}",
                r.signer()
            )));
        }

        Ok(Self { signer, records })
    }

    pub fn signer(&self) -> &SignerId {
        &self.signer
    }

    pub fn records(&self) -> &[SignatureRecord] {
        self.records.as_slice()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Partition `records` by signer identity, groups keep the order in which their
    /// identity was first seen.
    pub fn group_records(records: Vec<SignatureRecord>) -> Vec<CandidateGroup> {
        let (mut index, mut groups) = (
            HashMap::<SignerId, usize>::new(),
            Vec::<CandidateGroup>::new(),
        );

        for record in records {
            let slot = index.get(record.signer()).copied();
            match slot {
                Some(i) => groups[i].records.push(record),
                None => {
                    index.insert(record.signer().clone(), groups.len());
                    groups.push(CandidateGroup {
                        signer: record.signer().clone(),
                        records: vec![record],
                    });
                }
            }
        }

        groups
    }

    /// Same identity, only the records accepted by `keep`. The result may be empty.
    pub(crate) fn filtered<F>(&self, mut keep: F) -> CandidateGroup
    where
        F: FnMut(usize, &SignatureRecord) -> bool,
    {
        let records = self
            .records
            .iter()
            .enumerate()
            .filter(|(i, r)| keep(*i, r))
            .map(|(_, r)| r.clone())
            .collect();

        CandidateGroup {
            signer: self.signer.clone(),
            records,
        }
    }
}
