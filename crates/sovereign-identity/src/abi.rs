//! Call payloads accepted by the identity contracts
//!
//! Each contract decodes its call data into one of these enums. Purposes
//! travel as raw `u64` values so that an invalid purpose is reported as
//! `InvalidPurpose` by the contract instead of failing to decode.

use serde::{Deserialize, Serialize};
use sovereign_core::{ActionId, Address, ClaimId, DataKey, KeyId, KeyType, Purposes, Topic};
use sovereign_vm::codec;

/// Proxy execution kind: plain call
pub const OPERATION_CALL: u8 = 0;

/// Proxy execution kind: contract creation
pub const OPERATION_CREATE: u8 = 1;

/// Key Manager entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyManagerCall {
    AddKey {
        key: KeyId,
        purposes: Purposes,
        key_type: KeyType,
    },
    RemoveKey {
        key: KeyId,
    },
    ChangeKeysRequired {
        purpose: u64,
        number: u64,
    },
    /// Returns the encoded action id
    Execute {
        to: Address,
        value: u128,
        data: Vec<u8>,
    },
    /// Returns whether the action was dispatched
    Approve {
        id: ActionId,
        approved: bool,
    },
}

/// Proxy Account entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyCall {
    ChangeOwner {
        owner: Address,
    },
    SetData {
        key: DataKey,
        value: Vec<u8>,
    },
    /// Returns the callee output for CALL, the encoded address for CREATE
    Execute {
        operation: u8,
        to: Address,
        value: u128,
        data: Vec<u8>,
    },
}

/// Claim Holder entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimHolderCall {
    /// Returns the encoded claim id
    AddClaim {
        topic: Topic,
        scheme: u64,
        data: Vec<u8>,
        uri: String,
    },
    ChangeClaim {
        id: ClaimId,
        scheme: u64,
        data: Vec<u8>,
        uri: String,
    },
    RemoveClaim {
        id: ClaimId,
    },
    ToggleReviewClaim {
        id: ClaimId,
    },
}

/// Counter entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterCall {
    ChangeInteger(u64),
}

macro_rules! impl_encode {
    ($($call:ty),*) => {
        $(
            impl $call {
                /// Encode as call data
                pub fn encode(&self) -> Vec<u8> {
                    codec::encode(self)
                }
            }
        )*
    };
}

impl_encode!(KeyManagerCall, ProxyCall, ClaimHolderCall, CounterCall);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_decode_from_their_encoding() {
        let call = KeyManagerCall::Execute {
            to: Address::new([3; 20]),
            value: 10,
            data: CounterCall::ChangeInteger(5).encode(),
        };
        assert_eq!(codec::decode::<KeyManagerCall>(&call.encode()).unwrap(), call);
    }

    #[test]
    fn test_payloads_are_not_interchangeable() {
        let data = ClaimHolderCall::RemoveClaim { id: ClaimId::ZERO }.encode();
        assert!(codec::decode::<CounterCall>(&data).is_err());
    }
}
