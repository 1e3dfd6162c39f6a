//! Deployable code
//!
//! Deployment bytecode is an encoded [`Blueprint`]: the name of a registered
//! constructor plus its encoded arguments. Empty or undecodable bytecode and
//! unknown code names fail the deployment.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sovereign_core::Address;

use crate::codec;
use crate::contract::Contract;
use crate::error::{Result, VmError};

/// Code name plus constructor arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    pub code: String,
    pub args: Vec<u8>,
}

impl Blueprint {
    pub fn new(code: impl Into<String>, args: Vec<u8>) -> Self {
        Self {
            code: code.into(),
            args,
        }
    }

    /// Blueprint whose arguments are an encoded value
    pub fn with_args<T: Serialize>(code: impl Into<String>, args: &T) -> Self {
        Self::new(code, codec::encode(args))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        codec::encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(VmError::DeploymentFailed("empty bytecode".to_string()));
        }
        codec::decode(bytes)
            .map_err(|e| VmError::DeploymentFailed(format!("invalid bytecode: {}", e)))
    }
}

/// Context handed to a constructor
#[derive(Debug, Clone, Copy)]
pub struct Deployment {
    /// Account performing the deployment
    pub creator: Address,

    /// Address the new contract will live at
    pub address: Address,

    /// Value sent along with the deployment
    pub value: u128,
}

/// Builds a contract from its encoded arguments
pub type Constructor = fn(&Deployment, &[u8]) -> Result<Box<dyn Contract>>;

/// Constructors known to the environment, by code name
#[derive(Clone, Default)]
pub struct CodeRegistry {
    constructors: HashMap<String, Constructor>,
}

impl CodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor, replacing any previous one under the name
    pub fn register(&mut self, code: impl Into<String>, constructor: Constructor) {
        self.constructors.insert(code.into(), constructor);
    }

    pub fn contains(&self, code: &str) -> bool {
        self.constructors.contains_key(code)
    }

    /// Run the constructor named by a blueprint
    pub fn instantiate(
        &self,
        blueprint: &Blueprint,
        deployment: &Deployment,
    ) -> Result<Box<dyn Contract>> {
        let constructor = self.constructors.get(&blueprint.code).ok_or_else(|| {
            VmError::DeploymentFailed(format!("unknown code '{}'", blueprint.code))
        })?;

        constructor(deployment, &blueprint.args).map_err(|e| match e {
            VmError::DeploymentFailed(reason) => VmError::DeploymentFailed(reason),
            other => VmError::DeploymentFailed(format!(
                "constructor of '{}' failed: {}",
                blueprint.code, other
            )),
        })
    }
}

impl fmt::Debug for CodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.constructors.keys().collect();
        names.sort();
        f.debug_struct("CodeRegistry").field("codes", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bytecode_is_rejected() {
        assert!(matches!(
            Blueprint::from_bytes(&[]),
            Err(VmError::DeploymentFailed(_))
        ));
        assert!(matches!(
            Blueprint::from_bytes(&[0x55, 0x66]),
            Err(VmError::DeploymentFailed(_))
        ));
    }

    #[test]
    fn test_blueprint_bytes() {
        let blueprint = Blueprint::with_args("counter", &7u64);
        assert_eq!(Blueprint::from_bytes(&blueprint.to_bytes()).unwrap(), blueprint);
    }

    #[test]
    fn test_unknown_code() {
        let registry = CodeRegistry::new();
        let deployment = Deployment {
            creator: Address::new([1; 20]),
            address: Address::new([2; 20]),
            value: 0,
        };
        let result = registry.instantiate(&Blueprint::new("missing", vec![]), &deployment);
        assert!(matches!(result, Err(VmError::DeploymentFailed(_))));
    }
}
