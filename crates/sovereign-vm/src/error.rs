//! Error types for the execution environment

use sovereign_core::{Address, IdentityError};
use thiserror::Error;

/// Result type alias for environment operations
pub type Result<T> = std::result::Result<T, VmError>;

/// Reasons a call frame fails
///
/// Any error returned from a frame reverts every change made inside it.
#[derive(Debug, Error)]
pub enum VmError {
    /// The contract rejected the call
    #[error("Reverted: {0}")]
    Revert(#[from] IdentityError),

    /// Call payload or return data could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Calls to the zero address are refused
    #[error("Call to the zero address")]
    ZeroAddress,

    /// Value transfer exceeds the sender's balance
    #[error("Insufficient balance in {account}: has {balance}, needs {required}")]
    InsufficientBalance {
        account: Address,
        balance: u128,
        required: u128,
    },

    /// Crediting the recipient would overflow its balance
    #[error("Balance of {0} would overflow")]
    BalanceOverflow(Address),

    /// A contract was called while one of its frames is still running
    #[error("Re-entrant call into {0}")]
    Reentrancy(Address),

    /// Nested calls went deeper than the configured limit
    #[error("Call depth limit of {0} exceeded")]
    CallDepthExceeded(usize),

    /// Contract creation failed
    #[error("Deployment failed: {0}")]
    DeploymentFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<bincode::Error> for VmError {
    fn from(e: bincode::Error) -> Self {
        VmError::Decode(e.to_string())
    }
}
