#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlguardrs::scan;

fuzz_target!(|data: &[u8]| {
    // Fuzz the full scan path, parser walk included
    let _ = scan(data);
});
