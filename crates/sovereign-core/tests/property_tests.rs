//! Property-based tests for sovereign-core using proptest
//!
//! These tests verify invariants that should hold for all valid inputs.

use proptest::prelude::*;
use sovereign_core::{
    actions::ActionBook,
    claims::ClaimRegistry,
    keyring::{Key, KeyRing},
    purpose::{Purpose, Purposes},
    types::{Address, ClaimId, KeyId, KeyType, Topic},
    IdentityError,
};

// ============================================
// Arbitrary Implementations
// ============================================

fn arb_key_id() -> impl Strategy<Value = KeyId> {
    any::<[u8; 32]>()
        .prop_filter("zero key id", |bytes| bytes != &[0u8; 32])
        .prop_map(KeyId::new)
}

fn arb_address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::new)
}

fn arb_topic() -> impl Strategy<Value = Topic> {
    any::<[u8; 32]>().prop_map(Topic::new)
}

fn arb_power_of_two() -> impl Strategy<Value = u64> {
    (0u32..64).prop_map(|shift| 1u64 << shift)
}

// ============================================
// Purpose Properties
// ============================================

proptest! {
    #[test]
    fn purpose_accepts_exactly_powers_of_two(value in any::<u64>()) {
        let result = Purpose::new(value);
        if value != 0 && value & (value - 1) == 0 {
            prop_assert_eq!(result.unwrap().bit(), value);
        } else {
            prop_assert_eq!(result, Err(IdentityError::InvalidPurpose(value)));
        }
    }

    #[test]
    fn key_has_purpose_rejects_non_powers_of_two(
        id in arb_key_id(),
        value in any::<u64>().prop_filter("power of two", |v| !v.is_power_of_two()),
    ) {
        let ring = KeyRing::new(id, KeyType::ECDSA);
        prop_assert_eq!(
            ring.key_has_purpose(&id, value),
            Err(IdentityError::InvalidPurpose(value))
        );
    }

    #[test]
    fn membership_matches_mask_bits(
        bootstrap in arb_key_id(),
        id in arb_key_id(),
        mask in any::<u64>(),
        purpose in arb_power_of_two(),
    ) {
        prop_assume!(bootstrap != id);
        let mut ring = KeyRing::new(bootstrap, KeyType::ECDSA);
        ring.add_key(id, Purposes::from_bits_retain(mask), KeyType::ECDSA).unwrap();

        prop_assert_eq!(ring.key_has_purpose(&id, purpose).unwrap(), mask & purpose != 0);
    }

    #[test]
    fn removed_keys_hold_nothing(
        bootstrap in arb_key_id(),
        id in arb_key_id(),
        mask in any::<u64>(),
        purpose in arb_power_of_two(),
    ) {
        prop_assume!(bootstrap != id);
        let mut ring = KeyRing::new(bootstrap, KeyType::ECDSA);
        ring.add_key(id, Purposes::from_bits_retain(mask), KeyType::RSA).unwrap();
        ring.remove_key(id).unwrap();

        prop_assert_eq!(ring.get_key(&id), Key::absent());
        prop_assert!(!ring.key_has_purpose(&id, purpose).unwrap());
        prop_assert_eq!(ring.key_count(), 2);
    }

    #[test]
    fn key_list_never_shrinks(ops in prop::collection::vec((any::<u8>(), any::<bool>()), 1..40)) {
        let mut ring = KeyRing::new(KeyId::new([0xff; 32]), KeyType::ECDSA);
        let mut previous = ring.key_count();

        for (byte, add) in ops {
            let id = KeyId::new([byte | 1; 32]);
            if add {
                ring.add_key(id, Purposes::from_bits_retain(2), KeyType::ECDSA).unwrap();
            } else {
                ring.remove_key(id).unwrap();
            }
            prop_assert!(ring.key_count() >= previous);
            previous = ring.key_count();
        }
    }
}

// ============================================
// Action Book Properties
// ============================================

proptest! {
    #[test]
    fn confirmations_stay_unique(keys in prop::collection::vec(0u8..8, 1..30)) {
        let mut book = ActionBook::new();
        let id = book.propose(Address::new([1; 20]), 0, vec![], Purpose::ACTION);

        for byte in &keys {
            book.confirm(id, KeyId::new([*byte; 32])).unwrap();
        }

        let confirmations = book.confirmations(id);
        let mut distinct = keys.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(confirmations.len(), distinct.len());
    }
}

// ============================================
// Claim Registry Properties
// ============================================

proptest! {
    #[test]
    fn claim_id_is_deterministic(
        owner in arb_address(),
        issuer in arb_address(),
        topic in arb_topic(),
        filings in 1usize..5,
    ) {
        let mut registry = ClaimRegistry::new(owner);
        for scheme in 0..filings {
            let filing = registry.add_claim(issuer, topic, scheme as u64, vec![], String::new());
            prop_assert_eq!(filing.claim().id, ClaimId::derive(&issuer, &owner, &topic));
        }

        prop_assert_eq!(registry.get_topics(), &[topic]);
        prop_assert_eq!(registry.claim_ids_by_topic(&topic).len(), 1);
    }

    #[test]
    fn strangers_cannot_touch_claims(
        owner in arb_address(),
        issuer in arb_address(),
        stranger in arb_address(),
        topic in arb_topic(),
    ) {
        prop_assume!(issuer != stranger);
        let mut registry = ClaimRegistry::new(owner);
        let id = registry.add_claim(issuer, topic, 1, vec![1], String::new()).claim().id;

        let changed = registry.change_claim(stranger, id, 2, vec![], String::new());
        let removed = registry.remove_claim(stranger, id);
        prop_assert!(matches!(changed, Err(IdentityError::Unauthorized { .. })), "expected Unauthorized");
        prop_assert!(matches!(removed, Err(IdentityError::Unauthorized { .. })), "expected Unauthorized");
        prop_assert!(registry.get_claim(&id).unwrap().is_valid);
    }
}
