use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Sig2RsaError {
    #[error("line {line}: invalid json record, {reason}")]
    InvalidRecordLine { line: usize, reason: String },

    #[error("line {line}: field `{field}` is not valid base64, {reason}")]
    InvalidBase64 {
        line: usize,
        field: &'static str,
        reason: String,
    },

    #[error("line {line}: {reason}")]
    UnsupportedAlgorithm { line: usize, reason: String },

    #[error("the record file `{0}` contains no record")]
    EmptyRecordFile(String),

    #[error("expect 4 base64 lines (data1, signature1, data2, signature2), found `{0}`")]
    InvalidPairInput(usize),

    #[error("{0}")]
    LoadConfigFailed(String),
}
