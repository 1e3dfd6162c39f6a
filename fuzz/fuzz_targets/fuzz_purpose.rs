#![no_main]

use libfuzzer_sys::fuzz_target;
use sovereign_core::{Purpose, Purposes};

fuzz_target!(|input: (u64, u64)| {
    let (raw, mask) = input;

    match Purpose::new(raw) {
        Ok(purpose) => {
            assert!(raw.is_power_of_two());
            assert_eq!(purpose.bit(), raw);

            let purposes = Purposes::from_bits_retain(mask);
            assert_eq!(purposes.has(purpose), mask & raw != 0);

            let mut updated = purposes;
            updated.insert(purpose.into());
            assert!(updated.has(purpose));
            updated.remove(purpose.into());
            assert!(!updated.has(purpose));
        }
        Err(_) => assert!(!raw.is_power_of_two()),
    }

    let purposes = Purposes::from_bits_retain(mask);
    assert_eq!(purposes.bits(), mask);

    // Display output parses back to the same set
    let text = purposes.to_string();
    if !purposes.is_empty() {
        let parsed: Purposes = bitflags::parser::from_str(&text).unwrap();
        assert_eq!(parsed, purposes);
    }
});
