//! Fuzz target: operator script parser
//!
//! Arbitrary UTF-8 must parse or fail cleanly; a successful parse is
//! always sorted by timestamp.
//!
//! cargo fuzz run fuzz_script

#![no_main]

use dolstarter::app::commands::parse_script;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(steps) = parse_script(text) {
        assert!(steps.windows(2).all(|w| w[0].at_ms <= w[1].at_ms));
    }
});
