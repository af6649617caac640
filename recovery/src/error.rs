use crate::SignerId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    /// 记录无法参与计算, 例如签名为0或者签名超出任何候选模数的范围
    #[error("malformed record from {signer}: {reason}")]
    MalformedRecord { signer: SignerId, reason: String },

    /// 模数字节长度不足以容纳PKCS #1 v1.5的填充
    #[error("modulus byte length `{actual}` is too short for the padding, need at least `{required}` bytes")]
    PaddingLength { required: usize, actual: usize },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("invalid recovery config: {0}")]
    InvalidConfig(String),

    #[error("cannot build the worker pool: {0}")]
    ThreadPool(String),
}
