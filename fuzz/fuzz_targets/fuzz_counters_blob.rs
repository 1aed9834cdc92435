//! Fuzz target: `Counters::from_bytes`
//!
//! Feeds arbitrary stored blobs (short, long, garbage) to the counters
//! decoder and asserts that it never panics and that every field it does
//! read survives a re-encode.
//!
//! cargo fuzz run fuzz_counters_blob

#![no_main]

use libfuzzer_sys::fuzz_target;
use novaflash::counters::{CounterKind, Counters};

fuzz_target!(|data: &[u8]| {
    let counters = Counters::from_bytes(data);
    let encoded = counters.to_bytes();

    for kind in CounterKind::ALL {
        let at = kind.offset();
        if data.len() >= at + 4 {
            assert_eq!(&encoded[at..at + 4], &data[at..at + 4], "{} moved", kind.name());
        } else {
            assert_eq!(counters.get(kind), 0, "{} read past the blob", kind.name());
        }
    }

    assert_eq!(Counters::from_bytes(&encoded), counters);
});
