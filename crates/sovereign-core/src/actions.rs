//! Pending multi-signature actions
//!
//! An action is created with the initiator's confirmation, collects further
//! confirmations from distinct keys and is marked executed once, when its
//! dispatch succeeds. There is no cancellation: an action that never
//! reaches its threshold stays pending.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, Result};
use crate::purpose::Purpose;
use crate::types::{Address, KeyId};

/// Sequential action identifier, never reused
pub type ActionId = u64;

/// A proposed call awaiting quorum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub id: ActionId,

    /// Account the call is sent to
    pub destination: Address,

    /// Amount transferred with the call
    pub value: u128,

    /// Opaque payload interpreted by the destination
    pub data: Vec<u8>,

    /// Purpose a key must hold to confirm this action
    pub purpose: Purpose,

    /// Set once the dispatch succeeded
    pub executed: bool,

    /// Confirming keys, each at most once, in confirmation order
    pub confirmations: Vec<KeyId>,
}

impl PendingAction {
    pub fn is_confirmed_by(&self, key: &KeyId) -> bool {
        self.confirmations.contains(key)
    }

    pub fn confirmation_count(&self) -> usize {
        self.confirmations.len()
    }
}

/// All actions ever proposed to one identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionBook {
    actions: BTreeMap<ActionId, PendingAction>,
    next_id: ActionId,
}

impl ActionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new action without confirmations
    pub fn propose(
        &mut self,
        destination: Address,
        value: u128,
        data: Vec<u8>,
        purpose: Purpose,
    ) -> ActionId {
        let id = self.next_id;
        self.next_id += 1;

        self.actions.insert(
            id,
            PendingAction {
                id,
                destination,
                value,
                data,
                purpose,
                executed: false,
                confirmations: Vec::new(),
            },
        );
        id
    }

    /// Look up an action that can still be confirmed
    pub fn pending(&self, id: ActionId) -> Result<&PendingAction> {
        match self.actions.get(&id) {
            Some(action) if !action.executed => Ok(action),
            _ => Err(IdentityError::UnknownAction(id)),
        }
    }

    fn pending_mut(&mut self, id: ActionId) -> Result<&mut PendingAction> {
        match self.actions.get_mut(&id) {
            Some(action) if !action.executed => Ok(action),
            _ => Err(IdentityError::UnknownAction(id)),
        }
    }

    /// Add a confirmation; returns false if the key had already confirmed
    pub fn confirm(&mut self, id: ActionId, key: KeyId) -> Result<bool> {
        let action = self.pending_mut(id)?;
        if action.is_confirmed_by(&key) {
            return Ok(false);
        }
        action.confirmations.push(key);
        Ok(true)
    }

    /// Withdraw a confirmation; returns false if the key had not confirmed
    pub fn revoke(&mut self, id: ActionId, key: &KeyId) -> Result<bool> {
        let action = self.pending_mut(id)?;
        let before = action.confirmations.len();
        action.confirmations.retain(|k| k != key);
        Ok(action.confirmations.len() != before)
    }

    /// Record a successful dispatch
    pub fn mark_executed(&mut self, id: ActionId) -> Result<()> {
        let action = self.pending_mut(id)?;
        action.executed = true;
        Ok(())
    }

    pub fn get(&self, id: ActionId) -> Option<&PendingAction> {
        self.actions.get(&id)
    }

    /// Confirming keys of an action, empty for unknown ids
    pub fn confirmations(&self, id: ActionId) -> Vec<KeyId> {
        self.actions
            .get(&id)
            .map(|action| action.confirmations.clone())
            .unwrap_or_default()
    }

    /// Number of actions ever proposed
    pub fn count(&self) -> u64 {
        self.next_id
    }
}
