//! Error types for identity operations

use thiserror::Error;

use crate::types::{Address, ClaimId};

pub type Result<T> = std::result::Result<T, IdentityError>;

/// Reasons an identity operation is rejected
///
/// Every variant leaves the identity untouched: the environment discards
/// all state written by the failing operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Invalid key: the zero key id cannot be added or removed")]
    InvalidKey,

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid purpose {0}: purpose must be a nonzero power of two")]
    InvalidPurpose(u64),

    #[error("Purpose can not be approved with this key: {0}")]
    UnauthorizedPurpose(String),

    #[error("Unauthorized caller {caller}: {reason}")]
    Unauthorized { caller: Address, reason: String },

    #[error("Unknown or already executed action: {0}")]
    UnknownAction(u64),

    #[error("Invalid destination: calls to the zero address are not allowed")]
    InvalidDestination,

    #[error("External call has failed: {0}")]
    ExternalCallFailed(String),

    #[error("Call failed: {0}")]
    CallFailed(String),

    #[error("Deployment failed: {0}")]
    DeploymentFailed(String),

    #[error("Unknown execution kind: {0}")]
    UnknownExecutionKind(u8),

    #[error("Unknown claim: {0}")]
    UnknownClaim(ClaimId),

    #[error("Reserved data key: the owner entry is changed through changeOwner only")]
    ReservedDataKey,
}

impl IdentityError {
    /// Shorthand for an `Unauthorized` error
    pub fn unauthorized(caller: Address, reason: impl Into<String>) -> Self {
        IdentityError::Unauthorized {
            caller,
            reason: reason.into(),
        }
    }
}
