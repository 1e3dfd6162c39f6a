//! Shared setup for the end-to-end tests

#![allow(dead_code)]

use sovereign_core::{Address, KeyId};
use sovereign_identity::{standard_codes, ClaimHolder, Counter, KeyManager, ProxyAccount};
use sovereign_vm::{World, WorldConfig};
use tracing_subscriber::EnvFilter;

pub const OWNER: Address = Address([0x01; 20]);
pub const ALICE: Address = Address([0xa1; 20]);
pub const BOB: Address = Address([0xb0; 20]);
pub const RANDOM: Address = Address([0x5e; 20]);

/// Log to the test harness, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// World with every identity component registered and a funded owner
pub fn world() -> World {
    init_tracing();
    let mut world = World::new(WorldConfig::default().with_balance(OWNER, 1_000_000));
    standard_codes(&mut world);
    world
}

pub fn key_of(address: &Address) -> KeyId {
    KeyId::from_address(address)
}

pub fn deploy_counter(world: &mut World) -> anyhow::Result<Address> {
    let (address, _) = world.deploy(OWNER, 0, &Counter::blueprint(0))?;
    Ok(address)
}

pub fn key_manager<'w>(world: &'w World, address: &Address) -> &'w KeyManager {
    world
        .contract::<KeyManager>(address)
        .expect("key manager deployed")
}

pub fn proxy<'w>(world: &'w World, address: &Address) -> &'w ProxyAccount {
    world
        .contract::<ProxyAccount>(address)
        .expect("proxy account deployed")
}

pub fn claim_holder<'w>(world: &'w World, address: &Address) -> &'w ClaimHolder {
    world
        .contract::<ClaimHolder>(address)
        .expect("claim holder deployed")
}

pub fn counter_value(world: &World, address: &Address) -> u64 {
    world
        .contract::<Counter>(address)
        .expect("counter deployed")
        .integer()
}
