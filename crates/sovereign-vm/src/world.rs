//! Accounts, call frames and notification log
//!
//! Every call or deployment runs in its own frame. A frame snapshots the
//! world before it starts and restores the snapshot if it fails, so a failed
//! nested call undoes balances, nonces, contract state and notifications
//! produced anywhere below it. A contract is taken out of its account while
//! one of its frames runs; calling it again before that frame returns fails
//! with [`VmError::Reentrancy`].

use std::collections::HashMap;
use std::mem;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sovereign_core::{Address, Event};
use tracing::{debug, info, warn};

use crate::code::{Blueprint, CodeRegistry, Constructor, Deployment};
use crate::codec;
use crate::config::WorldConfig;
use crate::contract::Contract;
use crate::error::{Result, VmError};

/// Notification tagged with the contract that emitted it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Log {
    pub address: Address,
    pub event: Event,
}

/// Outcome of a successful top-level transaction
#[derive(Debug, Clone, Default, Serialize)]
pub struct Receipt {
    /// Return data of the called contract
    pub output: Vec<u8>,

    /// Notifications emitted during the transaction, in order
    pub logs: Vec<Log>,
}

impl Receipt {
    /// Notifications with the given name
    pub fn events_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.logs
            .iter()
            .map(|log| &log.event)
            .filter(move |event| event.name() == name)
    }

    pub fn count(&self, name: &str) -> usize {
        self.events_named(name).count()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.logs.iter().map(|log| &log.event)
    }

    pub fn decode_output<T: DeserializeOwned>(&self) -> Result<T> {
        codec::decode(&self.output)
    }
}

#[derive(Debug, Clone, Default)]
enum Code {
    #[default]
    None,
    Deployed(Box<dyn Contract>),
    Running,
}

#[derive(Debug, Clone, Default)]
struct Account {
    balance: u128,
    nonce: u64,
    code: Code,
}

struct Snapshot {
    accounts: HashMap<Address, Account>,
    logs: usize,
}

/// The execution environment
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    accounts: HashMap<Address, Account>,
    logs: Vec<Log>,
    codes: CodeRegistry,
    depth: usize,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    /// Create a world, crediting the genesis accounts
    pub fn new(config: WorldConfig) -> Self {
        let mut accounts: HashMap<Address, Account> = HashMap::new();
        for genesis in &config.genesis {
            let account = accounts.entry(genesis.address).or_default();
            account.balance = account.balance.saturating_add(genesis.balance);
        }

        Self {
            config,
            accounts,
            logs: Vec::new(),
            codes: CodeRegistry::new(),
            depth: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Register deployable code under a name
    pub fn register(&mut self, code: impl Into<String>, constructor: Constructor) {
        self.codes.register(code, constructor);
    }

    /// Credit an account out of thin air
    pub fn fund(&mut self, address: Address, amount: u128) {
        let account = self.accounts.entry(address).or_default();
        account.balance = account.balance.saturating_add(amount);
    }

    pub fn balance(&self, address: &Address) -> u128 {
        self.accounts.get(address).map(|a| a.balance).unwrap_or(0)
    }

    pub fn nonce(&self, address: &Address) -> u64 {
        self.accounts.get(address).map(|a| a.nonce).unwrap_or(0)
    }

    pub fn is_contract(&self, address: &Address) -> bool {
        self.accounts
            .get(address)
            .map(|a| !matches!(a.code, Code::None))
            .unwrap_or(false)
    }

    /// Borrow a deployed contract as its concrete type
    pub fn contract<T: Contract>(&self, address: &Address) -> Option<&T> {
        match &self.accounts.get(address)?.code {
            Code::Deployed(contract) => (**contract).as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Every notification recorded so far
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Send a transaction from `from` to `to`
    ///
    /// Either the whole transaction applies or none of it does.
    pub fn transact(
        &mut self,
        from: Address,
        to: Address,
        value: u128,
        data: &[u8],
    ) -> Result<Receipt> {
        let start = self.logs.len();
        let output = self.call_frame(from, to, value, data)?;
        Ok(Receipt {
            output,
            logs: self.logs[start..].to_vec(),
        })
    }

    /// Deploy a contract from `from`
    pub fn deploy(
        &mut self,
        from: Address,
        value: u128,
        blueprint: &Blueprint,
    ) -> Result<(Address, Receipt)> {
        let start = self.logs.len();
        let address = self.create_frame(from, value, &blueprint.to_bytes())?;
        let receipt = Receipt {
            output: address.as_bytes().to_vec(),
            logs: self.logs[start..].to_vec(),
        };
        Ok((address, receipt))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            accounts: self.accounts.clone(),
            logs: self.logs.len(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.accounts = snapshot.accounts;
        self.logs.truncate(snapshot.logs);
    }

    fn call_frame(
        &mut self,
        caller: Address,
        to: Address,
        value: u128,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        if self.depth >= self.config.max_call_depth {
            return Err(VmError::CallDepthExceeded(self.config.max_call_depth));
        }

        let snapshot = self.snapshot();
        self.depth += 1;
        let result = self.enter(caller, to, value, data);
        self.depth -= 1;

        if let Err(e) = &result {
            warn!("Call from {} to {} reverted: {}", caller.short(), to.short(), e);
            self.restore(snapshot);
        }
        result
    }

    fn enter(&mut self, caller: Address, to: Address, value: u128, data: &[u8]) -> Result<Vec<u8>> {
        if to.is_zero() {
            return Err(VmError::ZeroAddress);
        }
        self.transfer(caller, to, value)?;

        let code = mem::replace(&mut self.accounts.entry(to).or_default().code, Code::Running);
        match code {
            Code::None => {
                self.install(to, Code::None);
                debug!("Plain transfer of {} to {}", value, to.short());
                Ok(Vec::new())
            }
            Code::Running => Err(VmError::Reentrancy(to)),
            Code::Deployed(mut contract) => {
                debug!("Calling {} from {} ({} bytes)", to.short(), caller.short(), data.len());
                let output = {
                    let mut env = Env {
                        world: self,
                        this: to,
                        caller,
                    };
                    contract.call(&mut env, data)
                };
                self.install(to, Code::Deployed(contract));
                output
            }
        }
    }

    fn create_frame(&mut self, creator: Address, value: u128, code: &[u8]) -> Result<Address> {
        if self.depth >= self.config.max_call_depth {
            return Err(VmError::CallDepthExceeded(self.config.max_call_depth));
        }

        let snapshot = self.snapshot();
        self.depth += 1;
        let result = self.create(creator, value, code);
        self.depth -= 1;

        if let Err(e) = &result {
            warn!("Deployment by {} failed: {}", creator.short(), e);
            self.restore(snapshot);
        }
        result
    }

    fn create(&mut self, creator: Address, value: u128, code: &[u8]) -> Result<Address> {
        let blueprint = Blueprint::from_bytes(code)?;

        let account = self.accounts.entry(creator).or_default();
        let nonce = account.nonce;
        account.nonce += 1;

        let address = Address::for_contract(&creator, nonce);
        if self.is_contract(&address) || self.nonce(&address) > 0 {
            return Err(VmError::DeploymentFailed(format!(
                "address {} already in use",
                address
            )));
        }

        let deployment = Deployment {
            creator,
            address,
            value,
        };
        let contract = self.codes.instantiate(&blueprint, &deployment)?;
        self.transfer(creator, address, value)?;
        self.install(address, Code::Deployed(contract));

        info!("Deployed '{}' at {} (creator {})", blueprint.code, address, creator.short());
        Ok(address)
    }

    fn install(&mut self, address: Address, code: Code) {
        self.accounts.entry(address).or_default().code = code;
    }

    fn transfer(&mut self, from: Address, to: Address, value: u128) -> Result<()> {
        if value == 0 {
            return Ok(());
        }

        let balance = self.balance(&from);
        if balance < value {
            return Err(VmError::InsufficientBalance {
                account: from,
                balance,
                required: value,
            });
        }

        let credited = self
            .balance(&to)
            .checked_add(value)
            .ok_or(VmError::BalanceOverflow(to))?;
        self.accounts.entry(from).or_default().balance -= value;
        self.accounts.entry(to).or_default().balance = credited;
        Ok(())
    }
}

/// View of the world from inside a running contract
pub struct Env<'w> {
    world: &'w mut World,
    this: Address,
    caller: Address,
}

impl Env<'_> {
    /// Address of the running contract
    pub fn this(&self) -> Address {
        self.this
    }

    /// Immediate caller of the running frame
    pub fn caller(&self) -> Address {
        self.caller
    }

    pub fn is_contract(&self, address: &Address) -> bool {
        self.world.is_contract(address)
    }

    /// Call another account with the running contract as caller
    pub fn call(&mut self, to: Address, value: u128, data: &[u8]) -> Result<Vec<u8>> {
        self.world.call_frame(self.this, to, value, data)
    }

    /// Run `f` one frame deeper without leaving the running contract
    ///
    /// Counts against the call depth limit like [`Env::call`], but takes no
    /// snapshot: a failure is expected to fail the enclosing frame.
    pub fn nested<R>(&mut self, f: impl FnOnce(&mut Env<'_>) -> Result<R>) -> Result<R> {
        let limit = self.world.config.max_call_depth;
        if self.world.depth >= limit {
            return Err(VmError::CallDepthExceeded(limit));
        }

        self.world.depth += 1;
        let result = f(self);
        self.world.depth -= 1;
        result
    }

    /// Deploy a contract with the running contract as creator
    pub fn create(&mut self, value: u128, code: &[u8]) -> Result<Address> {
        self.world.create_frame(self.this, value, code)
    }

    /// Record a notification from the running contract
    pub fn emit(&mut self, event: Event) {
        debug!("{} emitted {}", self.this.short(), event.name());
        self.world.logs.push(Log {
            address: self.this,
            event,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use sovereign_core::IdentityError;

    #[derive(Debug, Serialize, Deserialize)]
    enum ProbeCall {
        Bump,
        Relay { to: Address, value: u128, data: Vec<u8> },
        Spawn { code: Vec<u8> },
        Nest { levels: u32 },
        Fail,
    }

    #[derive(Debug, Clone, Default)]
    struct Probe {
        bumps: u64,
    }

    impl Contract for Probe {
        fn call(&mut self, env: &mut Env<'_>, data: &[u8]) -> Result<Vec<u8>> {
            match codec::decode::<ProbeCall>(data)? {
                ProbeCall::Bump => {
                    self.bumps += 1;
                    env.emit(Event::OwnerChanged {
                        owner: env.caller(),
                    });
                    Ok(codec::encode(&self.bumps))
                }
                ProbeCall::Relay { to, value, data } => env.call(to, value, &data),
                ProbeCall::Spawn { code } => {
                    let address = env.create(0, &code)?;
                    Ok(address.as_bytes().to_vec())
                }
                ProbeCall::Nest { levels } => {
                    let mut reached = 0u32;
                    nest(env, levels, &mut reached)?;
                    Ok(codec::encode(&reached))
                }
                ProbeCall::Fail => {
                    self.bumps += 100;
                    Err(IdentityError::InvalidDestination.into())
                }
            }
        }
    }

    fn nest(env: &mut Env<'_>, levels: u32, reached: &mut u32) -> Result<()> {
        if levels == 0 {
            return Ok(());
        }
        env.nested(|env| {
            *reached += 1;
            nest(env, levels - 1, reached)
        })
    }

    fn probe(_: &Deployment, _: &[u8]) -> Result<Box<dyn Contract>> {
        Ok(Box::new(Probe::default()))
    }

    const ALICE: Address = Address([0xa1; 20]);

    fn world() -> (World, Address) {
        let mut world = World::new(WorldConfig::default().with_balance(ALICE, 1_000));
        world.register("probe", probe);
        let (address, _) = world
            .deploy(ALICE, 0, &Blueprint::new("probe", vec![]))
            .unwrap();
        (world, address)
    }

    fn bumps(world: &World, address: &Address) -> u64 {
        world.contract::<Probe>(address).unwrap().bumps
    }

    #[test]
    fn test_call_updates_state_and_logs() {
        let (mut world, probe) = world();

        let receipt = world
            .transact(ALICE, probe, 0, &codec::encode(&ProbeCall::Bump))
            .unwrap();

        assert_eq!(receipt.decode_output::<u64>().unwrap(), 1);
        assert_eq!(receipt.count("OwnerChanged"), 1);
        assert_eq!(receipt.logs[0].address, probe);
        assert_eq!(bumps(&world, &probe), 1);
    }

    #[test]
    fn test_failed_call_reverts_everything() {
        let (mut world, probe) = world();
        let logs_before = world.logs().len();

        let result = world.transact(ALICE, probe, 50, &codec::encode(&ProbeCall::Fail));
        assert!(matches!(result, Err(VmError::Revert(IdentityError::InvalidDestination))));

        assert_eq!(bumps(&world, &probe), 0);
        assert_eq!(world.balance(&ALICE), 1_000);
        assert_eq!(world.balance(&probe), 0);
        assert_eq!(world.logs().len(), logs_before);
    }

    #[test]
    fn test_nested_failure_propagates_and_reverts_outer() {
        let (mut world, first) = world();
        let (second, _) = world
            .deploy(ALICE, 0, &Blueprint::new("probe", vec![]))
            .unwrap();

        let relay = ProbeCall::Relay {
            to: second,
            value: 0,
            data: codec::encode(&ProbeCall::Fail),
        };
        assert!(world.transact(ALICE, first, 0, &codec::encode(&relay)).is_err());
        assert_eq!(bumps(&world, &second), 0);

        let relay = ProbeCall::Relay {
            to: second,
            value: 0,
            data: codec::encode(&ProbeCall::Bump),
        };
        let receipt = world.transact(ALICE, first, 0, &codec::encode(&relay)).unwrap();
        assert_eq!(bumps(&world, &second), 1);
        assert_eq!(
            receipt.events().next(),
            Some(&Event::OwnerChanged { owner: first })
        );
    }

    #[test]
    fn test_reentrant_call_is_rejected() {
        let (mut world, probe) = world();
        let relay = ProbeCall::Relay {
            to: probe,
            value: 0,
            data: codec::encode(&ProbeCall::Bump),
        };

        let result = world.transact(ALICE, probe, 0, &codec::encode(&relay));
        assert!(matches!(result, Err(VmError::Reentrancy(a)) if a == probe));
        assert!(world.is_contract(&probe));
    }

    #[test]
    fn test_zero_address_and_balance_checks() {
        let (mut world, _) = world();
        assert!(matches!(
            world.transact(ALICE, Address::ZERO, 0, &[]),
            Err(VmError::ZeroAddress)
        ));
        assert!(matches!(
            world.transact(ALICE, Address::new([7; 20]), 5_000, &[]),
            Err(VmError::InsufficientBalance { .. })
        ));

        let receipt = world.transact(ALICE, Address::new([7; 20]), 400, &[]).unwrap();
        assert!(receipt.output.is_empty());
        assert_eq!(world.balance(&Address::new([7; 20])), 400);
        assert_eq!(world.balance(&ALICE), 600);
    }

    #[test]
    fn test_undecodable_call_reverts() {
        let (mut world, probe) = world();
        assert!(matches!(
            world.transact(ALICE, probe, 0, &[0xde, 0xad]),
            Err(VmError::Decode(_))
        ));
    }

    #[test]
    fn test_contract_creation_from_contract() {
        let (mut world, probe) = world();
        let spawn = ProbeCall::Spawn {
            code: Blueprint::new("probe", vec![]).to_bytes(),
        };

        let receipt = world.transact(ALICE, probe, 0, &codec::encode(&spawn)).unwrap();
        let child = Address::for_contract(&probe, 0);
        assert_eq!(receipt.output, child.as_bytes().to_vec());
        assert!(world.is_contract(&child));
        assert_eq!(world.nonce(&probe), 1);

        let bad = ProbeCall::Spawn { code: vec![] };
        assert!(world.transact(ALICE, probe, 0, &codec::encode(&bad)).is_err());
        assert_eq!(world.nonce(&probe), 1);
    }

    #[test]
    fn test_call_depth_limit() {
        let config = WorldConfig {
            max_call_depth: 2,
            ..WorldConfig::default()
        };
        let mut world = World::new(config);
        world.register("probe", probe);
        let (a, _) = world.deploy(ALICE, 0, &Blueprint::new("probe", vec![])).unwrap();
        let (b, _) = world.deploy(ALICE, 0, &Blueprint::new("probe", vec![])).unwrap();
        let (c, _) = world.deploy(ALICE, 0, &Blueprint::new("probe", vec![])).unwrap();

        let inner = ProbeCall::Relay {
            to: c,
            value: 0,
            data: codec::encode(&ProbeCall::Bump),
        };
        let outer = ProbeCall::Relay {
            to: b,
            value: 0,
            data: codec::encode(&inner),
        };
        assert!(matches!(
            world.transact(ALICE, a, 0, &codec::encode(&outer)),
            Err(VmError::CallDepthExceeded(2))
        ));
        assert_eq!(bumps(&world, &c), 0);
    }

    #[test]
    fn test_nested_frames_count_against_depth() {
        let config = WorldConfig {
            max_call_depth: 3,
            ..WorldConfig::default()
        };
        let mut world = World::new(config);
        world.register("probe", probe);
        let (probe, _) = world.deploy(ALICE, 0, &Blueprint::new("probe", vec![])).unwrap();

        let receipt = world
            .transact(ALICE, probe, 0, &codec::encode(&ProbeCall::Nest { levels: 2 }))
            .unwrap();
        assert_eq!(receipt.decode_output::<u32>().unwrap(), 2);

        assert!(matches!(
            world.transact(ALICE, probe, 0, &codec::encode(&ProbeCall::Nest { levels: 3 })),
            Err(VmError::CallDepthExceeded(3))
        ));

        // The counter unwinds after a failure
        assert!(world
            .transact(ALICE, probe, 0, &codec::encode(&ProbeCall::Nest { levels: 2 }))
            .is_ok());
    }

    #[test]
    fn test_transfer_overflow_keeps_balances() {
        let (mut world, _) = world();
        let rich = Address::new([9; 20]);
        world.fund(rich, u128::MAX);

        assert!(matches!(
            world.transact(ALICE, rich, 1, &[]),
            Err(VmError::BalanceOverflow(a)) if a == rich
        ));
        assert_eq!(world.balance(&ALICE), 1_000);
        assert_eq!(world.balance(&rich), u128::MAX);
    }
}
