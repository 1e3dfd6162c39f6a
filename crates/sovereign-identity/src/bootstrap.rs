//! Identity deployment
//!
//! Deploys the three components of an identity in dependency order: the Key
//! Manager (owned by the deploying account), a Proxy Account owned by the Key
//! Manager and a Claim Holder owned by the Proxy Account. Extra keys and
//! thresholds from [`IdentityConfig`] are then applied through ordinary Key
//! Manager calls.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sovereign_core::{Address, IdentityError, KeyId, KeyType, Purpose, Purposes};
use sovereign_vm::{Result, World};
use tracing::info;

use crate::abi::KeyManagerCall;
use crate::claim_holder::ClaimHolder;
use crate::counter::Counter;
use crate::key_manager::KeyManager;
use crate::proxy_account::ProxyAccount;

/// Key registered at bootstrap
///
/// The key holder is named by address, by hex SEC1 public key, or by both
/// when they must agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    pub purposes: Purposes,
    #[serde(default = "default_key_type")]
    pub key_type: KeyType,
}

impl KeyConfig {
    /// Address of the key holder
    pub fn holder(&self) -> sovereign_core::Result<Address> {
        match (&self.address, &self.public_key) {
            (Some(address), None) => Ok(*address),
            (None, Some(public_key)) => Address::from_public_key_hex(public_key),
            (Some(address), Some(public_key)) => {
                let derived = Address::from_public_key_hex(public_key)?;
                if derived != *address {
                    return Err(IdentityError::InvalidPublicKey(format!(
                        "key of {} does not match address {}",
                        derived, address
                    )));
                }
                Ok(derived)
            }
            (None, None) => Err(IdentityError::InvalidPublicKey(
                "key config names neither an address nor a public key".to_string(),
            )),
        }
    }
}

/// Threshold applied at bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub purpose: Purpose,
    pub number: u64,
}

/// Identity bootstrap configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Key type of the owner's bootstrap key
    pub key_type: KeyType,

    /// Additional keys
    pub keys: Vec<KeyConfig>,

    /// Confirmation thresholds per purpose
    pub keys_required: Vec<ThresholdConfig>,
}

fn default_key_type() -> KeyType {
    KeyType::ECDSA
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            key_type: default_key_type(),
            keys: Vec::new(),
            keys_required: Vec::new(),
        }
    }
}

impl IdentityConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn with_key(mut self, address: Address, purposes: Purposes) -> Self {
        self.keys.push(KeyConfig {
            address: Some(address),
            public_key: None,
            purposes,
            key_type: default_key_type(),
        });
        self
    }

    /// Add a key held by the owner of a hex SEC1 public key
    pub fn with_public_key(mut self, public_key: impl Into<String>, purposes: Purposes) -> Self {
        self.keys.push(KeyConfig {
            address: None,
            public_key: Some(public_key.into()),
            purposes,
            key_type: default_key_type(),
        });
        self
    }

    pub fn with_threshold(mut self, purpose: Purpose, number: u64) -> Self {
        self.keys_required.push(ThresholdConfig { purpose, number });
        self
    }
}

/// Addresses of a deployed identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub key_manager: Address,
    pub proxy: Address,
    pub claim_holder: Address,
}

/// Register the code of every identity component
pub fn standard_codes(world: &mut World) {
    world.register(KeyManager::CODE, KeyManager::constructor);
    world.register(ProxyAccount::CODE, ProxyAccount::constructor);
    world.register(ClaimHolder::CODE, ClaimHolder::constructor);
    world.register(Counter::CODE, Counter::constructor);
}

/// Deploy an identity owned by `owner`
pub fn deploy_identity(world: &mut World, owner: Address, config: &IdentityConfig) -> Result<Identity> {
    let holders = config
        .keys
        .iter()
        .map(KeyConfig::holder)
        .collect::<sovereign_core::Result<Vec<_>>>()?;

    let (key_manager, _) = world.deploy(owner, 0, &KeyManager::blueprint(config.key_type))?;
    let (proxy, _) = world.deploy(owner, 0, &ProxyAccount::blueprint(key_manager))?;
    let (claim_holder, _) = world.deploy(owner, 0, &ClaimHolder::blueprint(proxy))?;

    for (key, holder) in config.keys.iter().zip(&holders) {
        let call = KeyManagerCall::AddKey {
            key: KeyId::from_address(holder),
            purposes: key.purposes,
            key_type: key.key_type,
        };
        world.transact(owner, key_manager, 0, &call.encode())?;
    }

    for threshold in &config.keys_required {
        let call = KeyManagerCall::ChangeKeysRequired {
            purpose: threshold.purpose.bit(),
            number: threshold.number,
        };
        world.transact(owner, key_manager, 0, &call.encode())?;
    }

    info!(
        "Identity of {} deployed: key manager {}, proxy {}, claim holder {}",
        owner.short(),
        key_manager,
        proxy,
        claim_holder
    );

    Ok(Identity {
        key_manager,
        proxy,
        claim_holder,
    })
}
