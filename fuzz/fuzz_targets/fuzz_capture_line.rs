//! Fuzz target: `parse_line`
//!
//! Arbitrary text fed to the capture parser must produce a record or an
//! error, never a panic.
//!
//! cargo fuzz run fuzz_capture_line

#![no_main]

use blued_client::adapters::capture::parse_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = parse_line(line, 1);
    }
});
