//! Key Manager contract
//!
//! Holds the key ring of an identity together with per-purpose thresholds
//! and the book of pending actions. Any call leaving the identity goes
//! through [`KeyManagerCall::Execute`]: the caller's confirmation is recorded
//! and the call is dispatched once the number of confirming keys reaches the
//! threshold for the action's purpose.
//!
//! Actions addressed to the Key Manager itself require MANAGEMENT and are
//! applied in place with the Key Manager as caller, one frame deeper so that
//! nested self-actions stay within the call depth limit. Every other
//! destination requires ACTION and is reached through the environment. A failing dispatch
//! fails the whole operation that triggered it, so the confirmation that
//! crossed the threshold is discarded as well.

use sovereign_core::{
    ActionBook, ActionId, Address, Event, IdentityError, Key, KeyId, KeyRing, KeyType,
    PendingAction, Purpose, Purposes, Thresholds,
};
use sovereign_vm::{codec, Blueprint, Contract, Deployment, Env, Result};
use tracing::{debug, info};

use crate::abi::KeyManagerCall;

const MANAGER_ONLY: &str = "Only owner or management keys can call this function";

#[derive(Debug, Clone)]
pub struct KeyManager {
    /// Account that deployed the identity, holder of the bootstrap key
    owner: Address,
    keys: KeyRing,
    thresholds: Thresholds,
    actions: ActionBook,
}

impl KeyManager {
    pub const CODE: &'static str = "key-manager";

    /// Key Manager whose bootstrap key belongs to `owner`
    pub fn new(owner: Address, key_type: KeyType) -> Self {
        Self {
            owner,
            keys: KeyRing::new(KeyId::from_address(&owner), key_type),
            thresholds: Thresholds::new(),
            actions: ActionBook::new(),
        }
    }

    pub fn blueprint(key_type: KeyType) -> Blueprint {
        Blueprint::with_args(Self::CODE, &key_type)
    }

    /// Constructor; the deployer becomes the owner. Arguments carry the
    /// bootstrap key type and default to ECDSA.
    pub fn constructor(deployment: &Deployment, args: &[u8]) -> Result<Box<dyn Contract>> {
        let key_type = if args.is_empty() {
            KeyType::ECDSA
        } else {
            codec::decode(args)?
        };
        Ok(Box::new(Self::new(deployment.creator, key_type)))
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn get_key(&self, key: &KeyId) -> Key {
        self.keys.get_key(key)
    }

    pub fn key_has_purpose(&self, key: &KeyId, purpose: u64) -> sovereign_core::Result<bool> {
        self.keys.key_has_purpose(key, purpose)
    }

    pub fn get_key_count(&self) -> usize {
        self.keys.key_count()
    }

    pub fn key_id_at(&self, index: usize) -> Option<KeyId> {
        self.keys.key_id_at(index)
    }

    pub fn get_keys_by_purpose(&self, purpose: Purpose) -> Vec<KeyId> {
        self.keys.keys_by_purpose(purpose)
    }

    pub fn get_keys_required(&self, purpose: Purpose) -> u64 {
        self.thresholds.get(purpose)
    }

    pub fn get_confirmations(&self, id: ActionId) -> Vec<KeyId> {
        self.actions.confirmations(id)
    }

    pub fn get_action(&self, id: ActionId) -> Option<&PendingAction> {
        self.actions.get(id)
    }

    pub fn get_action_count(&self) -> u64 {
        self.actions.count()
    }

    fn handle(&mut self, env: &mut Env<'_>, caller: Address, call: KeyManagerCall) -> Result<Vec<u8>> {
        match call {
            KeyManagerCall::AddKey {
                key,
                purposes,
                key_type,
            } => {
                self.add_key(env, caller, key, purposes, key_type)?;
                Ok(codec::encode(&true))
            }
            KeyManagerCall::RemoveKey { key } => {
                self.remove_key(env, caller, key)?;
                Ok(codec::encode(&true))
            }
            KeyManagerCall::ChangeKeysRequired { purpose, number } => {
                self.change_keys_required(env, caller, purpose, number)?;
                Ok(codec::encode(&true))
            }
            KeyManagerCall::Execute { to, value, data } => {
                let id = self.execute(env, caller, to, value, data)?;
                Ok(codec::encode(&id))
            }
            KeyManagerCall::Approve { id, approved } => {
                let dispatched = self.approve(env, caller, id, approved)?;
                Ok(codec::encode(&dispatched))
            }
        }
    }

    fn require_manager(&self, this: Address, caller: Address) -> Result<()> {
        let recovery = caller == self.owner && !self.keys.any_with_purpose(Purpose::MANAGEMENT);
        if caller == this
            || recovery
            || self
                .keys
                .has_purpose(&KeyId::from_address(&caller), Purpose::MANAGEMENT)
        {
            return Ok(());
        }
        Err(IdentityError::unauthorized(caller, MANAGER_ONLY).into())
    }

    fn require_purpose(&self, key: &KeyId, purpose: Purpose) -> Result<()> {
        if self.keys.has_purpose(key, purpose) {
            return Ok(());
        }
        Err(IdentityError::UnauthorizedPurpose(format!("{} lacks {}", key.short(), purpose)).into())
    }

    fn add_key(
        &mut self,
        env: &mut Env<'_>,
        caller: Address,
        key: KeyId,
        purposes: Purposes,
        key_type: KeyType,
    ) -> Result<()> {
        self.require_manager(env.this(), caller)?;
        self.keys.add_key(key, purposes, key_type)?;

        info!("Key {} added with {}", key.short(), purposes);
        env.emit(Event::KeyAdded {
            key,
            purposes,
            key_type,
        });
        Ok(())
    }

    fn remove_key(&mut self, env: &mut Env<'_>, caller: Address, key: KeyId) -> Result<()> {
        self.require_manager(env.this(), caller)?;
        let previous = self.keys.remove_key(key)?;

        info!("Key {} removed", key.short());
        env.emit(Event::KeyRemoved {
            key,
            purposes: previous.purposes,
            key_type: previous.key_type,
        });
        Ok(())
    }

    fn change_keys_required(
        &mut self,
        env: &mut Env<'_>,
        caller: Address,
        purpose: u64,
        number: u64,
    ) -> Result<()> {
        self.require_manager(env.this(), caller)?;
        let purpose = Purpose::new(purpose)?;
        self.thresholds.set(purpose, number);

        info!("Threshold for {} set to {}", purpose, number);
        env.emit(Event::KeysRequiredChanged { purpose, number });
        Ok(())
    }

    fn execute(
        &mut self,
        env: &mut Env<'_>,
        caller: Address,
        to: Address,
        value: u128,
        data: Vec<u8>,
    ) -> Result<ActionId> {
        if to.is_zero() {
            return Err(IdentityError::InvalidDestination.into());
        }

        let purpose = if to == env.this() {
            Purpose::MANAGEMENT
        } else {
            Purpose::ACTION
        };
        let key = KeyId::from_address(&caller);
        self.require_purpose(&key, purpose)?;

        let id = self.actions.propose(to, value, data.clone(), purpose);
        self.actions.confirm(id, key)?;

        info!("Action {} requested by {} for {}", id, key.short(), to.short());
        env.emit(Event::ExecutionRequested {
            execution_id: id,
            value,
            to,
            data,
        });
        env.emit(Event::Approved {
            execution_id: id,
            approved: true,
        });

        self.try_dispatch(env, id)?;
        Ok(id)
    }

    fn approve(
        &mut self,
        env: &mut Env<'_>,
        caller: Address,
        id: ActionId,
        approved: bool,
    ) -> Result<bool> {
        let purpose = self.actions.pending(id)?.purpose;
        let key = KeyId::from_address(&caller);
        self.require_purpose(&key, purpose)?;

        if approved {
            self.actions.confirm(id, key)?;
        } else {
            self.actions.revoke(id, &key)?;
        }

        debug!("Action {} approval by {}: {}", id, key.short(), approved);
        env.emit(Event::Approved {
            execution_id: id,
            approved,
        });

        if approved {
            self.try_dispatch(env, id)
        } else {
            Ok(false)
        }
    }

    /// Dispatch an action whose threshold is met; returns whether it ran
    fn try_dispatch(&mut self, env: &mut Env<'_>, id: ActionId) -> Result<bool> {
        let action = self.actions.pending(id)?.clone();
        let required = self.thresholds.get(action.purpose);
        if !self
            .thresholds
            .is_met(action.purpose, action.confirmation_count())
        {
            debug!(
                "Action {} has {}/{} confirmations",
                id,
                action.confirmation_count(),
                required
            );
            return Ok(false);
        }

        let this = env.this();
        let outcome = if action.destination == this {
            codec::decode::<KeyManagerCall>(&action.data)
                .and_then(|call| env.nested(|env| self.handle(env, this, call)))
        } else {
            env.call(action.destination, action.value, &action.data)
        };
        if let Err(e) = outcome {
            return Err(IdentityError::ExternalCallFailed(e.to_string()).into());
        }

        self.actions.mark_executed(id)?;
        info!("Action {} executed against {}", id, action.destination.short());
        env.emit(Event::Executed {
            execution_id: id,
            value: action.value,
            to: action.destination,
            data: action.data,
        });
        Ok(true)
    }
}

impl Contract for KeyManager {
    fn call(&mut self, env: &mut Env<'_>, data: &[u8]) -> Result<Vec<u8>> {
        let call = codec::decode(data)?;
        let caller = env.caller();
        self.handle(env, caller, call)
    }
}
