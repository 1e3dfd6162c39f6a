//! Proxy Account contract
//!
//! A generic executor governed by a single owner, normally the identity's
//! Key Manager. The owner can store metadata, hand over ownership and make
//! the proxy call other accounts or deploy new contracts.

use sovereign_core::{Address, DataKey, Event, IdentityError, MetadataStore};
use sovereign_vm::{codec, Blueprint, Contract, Deployment, Env, Result};
use tracing::info;

use crate::abi::{ProxyCall, OPERATION_CALL, OPERATION_CREATE};

#[derive(Debug, Clone)]
pub struct ProxyAccount {
    store: MetadataStore,
}

impl ProxyAccount {
    pub const CODE: &'static str = "proxy-account";

    pub fn new(owner: Address) -> Self {
        Self {
            store: MetadataStore::new(owner),
        }
    }

    pub fn blueprint(owner: Address) -> Blueprint {
        Blueprint::with_args(Self::CODE, &owner)
    }

    /// Constructor taking the encoded owner; the deployer owns the proxy
    /// when no owner is given
    pub fn constructor(deployment: &Deployment, args: &[u8]) -> Result<Box<dyn Contract>> {
        let owner = if args.is_empty() {
            deployment.creator
        } else {
            codec::decode(args)?
        };
        Ok(Box::new(Self::new(owner)))
    }

    pub fn owner(&self) -> Address {
        self.store.owner()
    }

    pub fn get_data(&self, key: &DataKey) -> Vec<u8> {
        self.store.get(key)
    }

    fn require_owner(&self, caller: Address) -> Result<()> {
        if caller == self.store.owner() {
            return Ok(());
        }
        Err(IdentityError::unauthorized(caller, "caller is not the owner").into())
    }

    fn execute(
        &mut self,
        env: &mut Env<'_>,
        operation: u8,
        to: Address,
        value: u128,
        data: Vec<u8>,
    ) -> Result<Vec<u8>> {
        match operation {
            OPERATION_CALL => {
                let output = env
                    .call(to, value, &data)
                    .map_err(|e| IdentityError::CallFailed(e.to_string()))?;
                env.emit(Event::ExecutedCall { value, to, data });
                Ok(output)
            }
            OPERATION_CREATE => {
                if data.is_empty() {
                    return Err(IdentityError::DeploymentFailed("empty bytecode".to_string()).into());
                }
                let address = env
                    .create(value, &data)
                    .map_err(|e| IdentityError::DeploymentFailed(e.to_string()))?;

                info!("Proxy {} created {}", env.this().short(), address);
                env.emit(Event::ContractCreated {
                    contract_address: address,
                });
                Ok(codec::encode(&address))
            }
            other => Err(IdentityError::UnknownExecutionKind(other).into()),
        }
    }
}

impl Contract for ProxyAccount {
    fn call(&mut self, env: &mut Env<'_>, data: &[u8]) -> Result<Vec<u8>> {
        let call = codec::decode(data)?;
        self.require_owner(env.caller())?;

        match call {
            ProxyCall::ChangeOwner { owner } => {
                self.store.set_owner(owner);
                info!("Proxy {} owner changed to {}", env.this().short(), owner);
                env.emit(Event::OwnerChanged { owner });
                Ok(Vec::new())
            }
            ProxyCall::SetData { key, value } => {
                self.store.set(key, value.clone())?;
                env.emit(Event::DataChanged { key, value });
                Ok(Vec::new())
            }
            ProxyCall::Execute {
                operation,
                to,
                value,
                data,
            } => self.execute(env, operation, to, value, data),
        }
    }
}
