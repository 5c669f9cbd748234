#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlguardrs::heuristic_scan;

fuzz_target!(|data: &[u8]| {
    // Fuzz the byte-level heuristic with arbitrary input
    let _ = heuristic_scan(data);
});
