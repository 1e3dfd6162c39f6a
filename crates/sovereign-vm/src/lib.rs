//! Sovereign VM - Deterministic execution environment
//!
//! Routes calls between accounts, moves value, deploys registered code and
//! records notifications. Each call frame is atomic: a failure anywhere in a
//! frame restores the world to the state it had when the frame began.
//!
//! # Example
//!
//! ```ignore
//! use sovereign_vm::{Blueprint, World, WorldConfig};
//!
//! let mut world = World::new(WorldConfig::default());
//! world.register("counter", counter_constructor);
//! let (address, _) = world.deploy(owner, 0, &Blueprint::new("counter", vec![]))?;
//! let receipt = world.transact(owner, address, 0, &call_data)?;
//! ```

pub mod code;
pub mod codec;
pub mod config;
pub mod contract;
pub mod error;
pub mod world;

pub use code::{Blueprint, CodeRegistry, Constructor, Deployment};
pub use config::{GenesisAccount, WorldConfig};
pub use contract::{Contract, ContractBox};
pub use error::{Result, VmError};
pub use world::{Env, Log, Receipt, World};
