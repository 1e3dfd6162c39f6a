//! Notifications emitted by identity components

use serde::{Deserialize, Serialize};

use crate::actions::ActionId;
use crate::claims::Claim;
use crate::purpose::{Purpose, Purposes};
use crate::types::{Address, ClaimId, DataKey, KeyId, KeyType, Topic};

/// Externally observable notification
///
/// Notifications are recorded in emission order and discarded together
/// with the state of a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Event {
    KeyAdded {
        key: KeyId,
        purposes: Purposes,
        key_type: KeyType,
    },
    KeyRemoved {
        key: KeyId,
        purposes: Purposes,
        key_type: KeyType,
    },
    KeysRequiredChanged {
        purpose: Purpose,
        number: u64,
    },
    ExecutionRequested {
        execution_id: ActionId,
        value: u128,
        to: Address,
        data: Vec<u8>,
    },
    Approved {
        execution_id: ActionId,
        approved: bool,
    },
    Executed {
        execution_id: ActionId,
        value: u128,
        to: Address,
        data: Vec<u8>,
    },
    ClaimAdded {
        claim_id: ClaimId,
        topic: Topic,
        scheme: u64,
        issuer: Address,
        data: Vec<u8>,
        uri: String,
    },
    ClaimChanged {
        claim_id: ClaimId,
        topic: Topic,
        scheme: u64,
        issuer: Address,
        data: Vec<u8>,
        uri: String,
    },
    ClaimRemoved {
        claim_id: ClaimId,
        topic: Topic,
        scheme: u64,
        issuer: Address,
        data: Vec<u8>,
        uri: String,
    },
    ClaimApprovalToggled {
        claim_id: ClaimId,
        topic: Topic,
        scheme: u64,
        issuer: Address,
        data: Vec<u8>,
        uri: String,
    },
    OwnerChanged {
        owner: Address,
    },
    DataChanged {
        key: DataKey,
        value: Vec<u8>,
    },
    ExecutedCall {
        value: u128,
        to: Address,
        data: Vec<u8>,
    },
    ContractCreated {
        contract_address: Address,
    },
}

impl Event {
    pub fn claim_added(claim: &Claim) -> Self {
        Event::ClaimAdded {
            claim_id: claim.id,
            topic: claim.topic,
            scheme: claim.scheme,
            issuer: claim.issuer,
            data: claim.data.clone(),
            uri: claim.uri.clone(),
        }
    }

    pub fn claim_changed(claim: &Claim) -> Self {
        Event::ClaimChanged {
            claim_id: claim.id,
            topic: claim.topic,
            scheme: claim.scheme,
            issuer: claim.issuer,
            data: claim.data.clone(),
            uri: claim.uri.clone(),
        }
    }

    pub fn claim_removed(claim: &Claim) -> Self {
        Event::ClaimRemoved {
            claim_id: claim.id,
            topic: claim.topic,
            scheme: claim.scheme,
            issuer: claim.issuer,
            data: claim.data.clone(),
            uri: claim.uri.clone(),
        }
    }

    pub fn claim_approval_toggled(claim: &Claim) -> Self {
        Event::ClaimApprovalToggled {
            claim_id: claim.id,
            topic: claim.topic,
            scheme: claim.scheme,
            issuer: claim.issuer,
            data: claim.data.clone(),
            uri: claim.uri.clone(),
        }
    }

    /// Notification name, as it appears in receipts
    pub fn name(&self) -> &'static str {
        match self {
            Event::KeyAdded { .. } => "KeyAdded",
            Event::KeyRemoved { .. } => "KeyRemoved",
            Event::KeysRequiredChanged { .. } => "KeysRequiredChanged",
            Event::ExecutionRequested { .. } => "ExecutionRequested",
            Event::Approved { .. } => "Approved",
            Event::Executed { .. } => "Executed",
            Event::ClaimAdded { .. } => "ClaimAdded",
            Event::ClaimChanged { .. } => "ClaimChanged",
            Event::ClaimRemoved { .. } => "ClaimRemoved",
            Event::ClaimApprovalToggled { .. } => "ClaimApprovalToggled",
            Event::OwnerChanged { .. } => "OwnerChanged",
            Event::DataChanged { .. } => "DataChanged",
            Event::ExecutedCall { .. } => "ExecutedCall",
            Event::ContractCreated { .. } => "ContractCreated",
        }
    }
}
