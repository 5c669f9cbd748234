#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlguardrs::{detect_string_encoding, detect_xml_encoding};

fuzz_target!(|data: &[u8]| {
    // Detection must be total over arbitrary bytes and the candidate list
    // must always end with the file encoding.
    let file_encoding = detect_string_encoding(data);
    let candidates = detect_xml_encoding(data, file_encoding);
    assert_eq!(candidates.last(), Some(&file_encoding));
});
