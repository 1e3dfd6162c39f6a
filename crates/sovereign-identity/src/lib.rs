//! Sovereign Identity - The contracts that make up an on-chain identity
//!
//! - [`KeyManager`]: key ring, thresholds and multi-signature execution
//! - [`ProxyAccount`]: owner-governed generic executor with metadata
//! - [`ClaimHolder`]: claims issued about the identity
//! - [`Counter`]: trivial dispatch target
//!
//! [`deploy_identity`] wires the first three together inside a
//! [`sovereign_vm::World`].

pub mod abi;
pub mod bootstrap;
pub mod claim_holder;
pub mod counter;
pub mod key_manager;
pub mod proxy_account;

pub use abi::{
    ClaimHolderCall, CounterCall, KeyManagerCall, ProxyCall, OPERATION_CALL, OPERATION_CREATE,
};
pub use bootstrap::{
    deploy_identity, standard_codes, Identity, IdentityConfig, KeyConfig, ThresholdConfig,
};
pub use claim_holder::ClaimHolder;
pub use counter::Counter;
pub use key_manager::KeyManager;
pub use proxy_account::ProxyAccount;
