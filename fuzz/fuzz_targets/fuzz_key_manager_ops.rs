#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sovereign_core::{Address, KeyId, KeyType, Purposes};
use sovereign_identity::{standard_codes, Counter, CounterCall, KeyManager, KeyManagerCall};
use sovereign_vm::{World, WorldConfig};

#[derive(Debug, Arbitrary)]
enum Op {
    AddKey { signer: u8, who: u8, purposes: u8 },
    RemoveKey { signer: u8, who: u8 },
    ChangeKeysRequired { signer: u8, purpose: u8, number: u8 },
    Execute { signer: u8, on_self: bool, value: u8 },
    Approve { signer: u8, id: u8, approved: bool },
}

fn account(index: u8) -> Address {
    Address::new([index % 4 + 1; 20])
}

fuzz_target!(|ops: Vec<Op>| {
    let owner = account(0);
    let mut world = World::new(WorldConfig::default());
    standard_codes(&mut world);
    let Ok((km, _)) = world.deploy(owner, 0, &KeyManager::blueprint(KeyType::ECDSA)) else {
        return;
    };
    let Ok((counter, _)) = world.deploy(owner, 0, &Counter::blueprint(0)) else {
        return;
    };

    let mut key_count = 1;
    for op in ops.into_iter().take(64) {
        let (signer, call) = match op {
            Op::AddKey {
                signer,
                who,
                purposes,
            } => (
                signer,
                KeyManagerCall::AddKey {
                    key: KeyId::from_address(&account(who)),
                    purposes: Purposes::from_bits_retain(u64::from(purposes & 0x0f)),
                    key_type: KeyType::ECDSA,
                },
            ),
            Op::RemoveKey { signer, who } => (
                signer,
                KeyManagerCall::RemoveKey {
                    key: KeyId::from_address(&account(who)),
                },
            ),
            Op::ChangeKeysRequired {
                signer,
                purpose,
                number,
            } => (
                signer,
                KeyManagerCall::ChangeKeysRequired {
                    purpose: u64::from(purpose),
                    number: u64::from(number % 4),
                },
            ),
            Op::Execute {
                signer,
                on_self,
                value,
            } => {
                let call = if on_self {
                    KeyManagerCall::Execute {
                        to: km,
                        value: 0,
                        data: KeyManagerCall::ChangeKeysRequired {
                            purpose: 2,
                            number: u64::from(value % 3),
                        }
                        .encode(),
                    }
                } else {
                    KeyManagerCall::Execute {
                        to: counter,
                        value: 0,
                        data: CounterCall::ChangeInteger(u64::from(value)).encode(),
                    }
                };
                (signer, call)
            }
            Op::Approve {
                signer,
                id,
                approved,
            } => (
                signer,
                KeyManagerCall::Approve {
                    id: u64::from(id % 8),
                    approved,
                },
            ),
        };

        let _ = world.transact(account(signer), km, 0, &call.encode());

        let Some(manager) = world.contract::<KeyManager>(&km) else {
            panic!("key manager disappeared");
        };

        // The key list never shrinks
        assert!(manager.get_key_count() >= key_count);
        key_count = manager.get_key_count();

        // Confirmations never repeat a key
        for id in 0..manager.get_action_count() {
            let mut confirmations = manager.get_confirmations(id);
            let total = confirmations.len();
            confirmations.sort();
            confirmations.dedup();
            assert_eq!(confirmations.len(), total);
        }
    }
});
