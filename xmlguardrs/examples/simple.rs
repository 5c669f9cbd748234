use xmlguardrs::{heuristic_scan, scan, Encoding};

fn main() {
    println!("Testing xmlguardrs functionality...");

    let scan_tests: [(&[u8], &str); 4] = [
        (
            br#"<?xml version="1.0"?><greeting>hello</greeting>"#,
            "Clean document",
        ),
        (b"<!DOCTYPE data><data/>", "DOCTYPE without entities"),
        (
            br#"<!DOCTYPE d [<!ENTITY x SYSTEM "file:///etc/passwd">]><d>&x;</d>"#,
            "External entity attempt",
        ),
        (
            br#"<!DOCTYPE lol [<!ENTITY lol "lol"><!ENTITY lol2 "&lol;&lol;">]><lolz>&lol2;</lolz>"#,
            "Entity expansion attempt",
        ),
    ];

    println!("\n=== Full scan path ===");
    for (input, description) in &scan_tests {
        match scan(input) {
            Ok(doc) => println!(
                "{}: passed ({} elements, {})",
                description,
                doc.element_count(),
                doc.file_encoding()
            ),
            Err(err) => println!("{}: rejected -> {}", description, err),
        }
    }

    // The heuristic understands renderings the parser never sees.
    println!("\n=== Heuristic path, smuggled encodings ===");
    let poc = r#"<?xml version="1.0"?><!DOCTYPE d [<!ENTITY x "y">]><d>&x;</d>"#;
    for encoding in [Encoding::Utf16Le, Encoding::Utf32Be, Encoding::Utf32Odd1] {
        let rendered = encoding.encode_ascii(poc);
        println!(
            "{} rendering: {}",
            encoding,
            if heuristic_scan(&rendered).is_err() {
                "rejected"
            } else {
                "passed"
            }
        );
    }
}
