#![no_main]

use libfuzzer_sys::fuzz_target;
use packsmith::{GenericIdentifier, Identifier, Version};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = s.parse::<Version>();
        let _ = s.parse::<GenericIdentifier>();
        if let Ok(id) = s.parse::<Identifier>() {
            // Display must round-trip
            assert_eq!(id.to_string().parse::<Identifier>().ok(), Some(id));
        }
    }
});
