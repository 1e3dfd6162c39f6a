//! Environment configuration

use serde::{Deserialize, Serialize};
use sovereign_core::Address;

/// Balance credited to an account when the world is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub address: Address,
    pub balance: u128,
}

/// Execution environment configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Maximum number of nested call frames
    pub max_call_depth: usize,

    /// Accounts funded at creation
    pub genesis: Vec<GenesisAccount>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 64,
            genesis: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Load configuration from file
    pub fn load(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Add a funded account
    pub fn with_balance(mut self, address: Address, balance: u128) -> Self {
        self.genesis.push(GenesisAccount { address, balance });
        self
    }
}
