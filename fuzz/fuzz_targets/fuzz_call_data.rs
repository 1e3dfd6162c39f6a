#![no_main]

use libfuzzer_sys::fuzz_target;
use sovereign_core::Address;
use sovereign_identity::{deploy_identity, standard_codes, IdentityConfig};
use sovereign_vm::{World, WorldConfig};

const OWNER: Address = Address([0x01; 20]);

fuzz_target!(|data: &[u8]| {
    let mut world = World::new(WorldConfig::default().with_balance(OWNER, 1_000));
    standard_codes(&mut world);
    let identity = match deploy_identity(&mut world, OWNER, &IdentityConfig::default()) {
        Ok(identity) => identity,
        Err(_) => return,
    };

    for target in [identity.key_manager, identity.proxy, identity.claim_holder] {
        let logs_before = world.logs().len();
        let balance_before = world.balance(&OWNER);

        // Arbitrary call data must never panic; failures leave no trace
        if world.transact(OWNER, target, 0, data).is_err() {
            assert_eq!(world.logs().len(), logs_before);
            assert_eq!(world.balance(&OWNER), balance_before);
        }
    }

    // Arbitrary bytecode must never panic either
    let _ = world.deploy(
        OWNER,
        0,
        &sovereign_vm::Blueprint::new("counter", data.to_vec()),
    );
});
