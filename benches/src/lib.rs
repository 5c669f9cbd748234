//! Document generators shared by the benchmarks.

use xmlguardrs::Encoding;

/// A well-formed document with `elements` child elements, rendered under
/// `encoding`, with no entity declarations.
pub fn clean_document(encoding: Encoding, elements: usize) -> Vec<u8> {
    let mut text = String::from(r#"<?xml version="1.0"?><data>"#);
    for index in 0..elements {
        text.push_str(&format!("<item id=\"{index}\">payload text</item>"));
    }
    text.push_str("</data>");
    encoding.encode_ascii(&text)
}

/// A document carrying an external entity declaration near the end, so the
/// scan has to cover most of the input before matching.
pub fn entity_document(encoding: Encoding, elements: usize) -> Vec<u8> {
    let mut text = String::from(r#"<?xml version="1.0"?>"#);
    text.push_str(r#"<!DOCTYPE data ["#);
    text.push_str(r#"<!ELEMENT data ANY>"#);
    text.push_str(r#"<!ENTITY x SYSTEM "file:///etc/passwd">]>"#);
    text.push_str("<data>");
    for index in 0..elements {
        text.push_str(&format!("<item id=\"{index}\">&x;</item>"));
    }
    text.push_str("</data>");
    encoding.encode_ascii(&text)
}
