#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::disallowed_methods)]
#![allow(clippy::panic)]

use super::encoding::{
    declared_encoding_name, detect_bom, detect_string_encoding, detect_xml_encoding,
    detect_xml_string_encoding, find_bytes, Encoding,
};
use super::scanner::{EntityScanner, ScanVerdict};

#[test]
fn test_ascii_renderings() {
    assert_eq!(Encoding::Utf8.encode_ascii("A"), vec![0x41]);
    assert_eq!(Encoding::Gb18030.encode_ascii("A"), vec![0x41]);
    assert_eq!(Encoding::Utf16Be.encode_ascii("A"), vec![0x00, 0x41]);
    assert_eq!(Encoding::Utf16Le.encode_ascii("A"), vec![0x41, 0x00]);
    assert_eq!(Encoding::Utf32Be.encode_ascii("A"), vec![0x00, 0x00, 0x00, 0x41]);
    assert_eq!(Encoding::Utf32Le.encode_ascii("A"), vec![0x41, 0x00, 0x00, 0x00]);
    assert_eq!(Encoding::Utf32Odd1.encode_ascii("A"), vec![0x00, 0x41, 0x00, 0x00]);
    assert_eq!(Encoding::Utf32Odd2.encode_ascii("A"), vec![0x00, 0x00, 0x41, 0x00]);
}

#[test]
fn test_rendering_width() {
    for encoding in [
        Encoding::Utf8,
        Encoding::Utf16Be,
        Encoding::Utf16Le,
        Encoding::Utf32Be,
        Encoding::Utf32Le,
        Encoding::Utf32Odd1,
        Encoding::Utf32Odd2,
        Encoding::Gb18030,
    ] {
        let rendered = encoding.encode_ascii("<?xml");
        assert_eq!(rendered.len(), 5 * encoding.width(), "{}", encoding);
    }
}

#[test]
fn test_bom_bytes() {
    assert_eq!(Encoding::Utf8.bom(), Some(&[0xEF, 0xBB, 0xBF][..]));
    assert_eq!(Encoding::Utf16Be.bom(), Some(&[0xFE, 0xFF][..]));
    assert_eq!(Encoding::Utf16Le.bom(), Some(&[0xFF, 0xFE][..]));
    assert_eq!(Encoding::Utf32Be.bom(), Some(&[0x00, 0x00, 0xFE, 0xFF][..]));
    assert_eq!(Encoding::Utf32Le.bom(), Some(&[0xFF, 0xFE, 0x00, 0x00][..]));
    assert_eq!(Encoding::Gb18030.bom(), Some(&[0x84, 0x31, 0x95, 0x33][..]));
    assert_eq!(Encoding::Utf32Odd1.bom(), None);
    assert_eq!(Encoding::Utf32Odd2.bom(), None);
}

#[test]
fn test_bom_detection_matches_table() {
    for encoding in [
        Encoding::Utf8,
        Encoding::Utf16Be,
        Encoding::Utf16Le,
        Encoding::Utf32Be,
        Encoding::Utf32Le,
        Encoding::Gb18030,
    ] {
        let bom = encoding.bom().expect("encoding has a BOM");
        let mut input = bom.to_vec();
        input.extend_from_slice(&encoding.encode_ascii("<?xml"));
        assert_eq!(detect_bom(&input), Some(encoding), "{}", encoding);
    }
}

#[test]
fn test_bom_priority_utf32le_over_utf16le() {
    // The UTF-32LE BOM starts with the UTF-16LE BOM bytes; table order must
    // keep the longer prefix from being shadowed.
    let mut input = vec![0xFF, 0xFE, 0x00, 0x00];
    input.extend_from_slice(&Encoding::Utf32Le.encode_ascii("<?xml version=\"1.0\"?>"));
    assert_eq!(detect_bom(&input), Some(Encoding::Utf32Le));
    assert_eq!(detect_string_encoding(&input), Encoding::Utf32Le);
}

#[test]
fn test_bom_detection_short_input() {
    assert_eq!(detect_bom(b""), None);
    assert_eq!(detect_bom(&[0xFF]), None);
    assert_eq!(detect_bom(&[0xFE, 0xFF]), Some(Encoding::Utf16Be));
}

#[test]
fn test_prefix_sniff_defaults_to_utf8() {
    assert_eq!(detect_xml_string_encoding(b"hello world"), Encoding::Utf8);
    assert_eq!(detect_xml_string_encoding(b""), Encoding::Utf8);
    assert_eq!(detect_string_encoding(b"<root/>"), Encoding::Utf8);
}

#[test]
fn test_prefix_sniff_per_encoding() {
    let cases = [
        (Encoding::Utf32Be, Encoding::Utf32Be),
        (Encoding::Utf32Le, Encoding::Utf32Le),
        (Encoding::Utf32Odd1, Encoding::Utf32Odd1),
        (Encoding::Utf32Odd2, Encoding::Utf32Odd2),
        (Encoding::Utf16Be, Encoding::Utf16Be),
        (Encoding::Utf16Le, Encoding::Utf16Le),
        (Encoding::Utf8, Encoding::Utf8),
        // GB-18030 shares the UTF-8 renderer, so it canonicalizes to UTF-8.
        (Encoding::Gb18030, Encoding::Utf8),
    ];
    for (rendered_as, expected) in cases {
        let input = rendered_as.encode_ascii("<?xml version=\"1.0\"?>");
        assert_eq!(detect_xml_string_encoding(&input), expected, "{}", rendered_as);
    }
}

#[test]
fn test_from_label() {
    assert_eq!(Encoding::from_label(b"UTF-8"), Some(Encoding::Utf8));
    assert_eq!(Encoding::from_label(b"utf-8"), Some(Encoding::Utf8));
    assert_eq!(Encoding::from_label(b"utf-16le"), Some(Encoding::Utf16Le));
    assert_eq!(Encoding::from_label(b"UTF-32BE"), Some(Encoding::Utf32Be));
    assert_eq!(Encoding::from_label(b"gb-18030"), Some(Encoding::Gb18030));
    assert_eq!(Encoding::from_label(b"UTF-32ODD1"), Some(Encoding::Utf32Odd1));
    assert_eq!(Encoding::from_label(b"KOI8-R"), None);
    assert_eq!(Encoding::from_label(b""), None);
}

#[test]
fn test_find_bytes() {
    assert_eq!(find_bytes(b"abcdef", b"cd", 0), Some(2));
    assert_eq!(find_bytes(b"abcdef", b"cd", 2), Some(2));
    assert_eq!(find_bytes(b"abcdef", b"cd", 3), None);
    assert_eq!(find_bytes(b"abcdef", b"ef", 0), Some(4));
    assert_eq!(find_bytes(b"abcdef", b"fg", 0), None);
    assert_eq!(find_bytes(b"abcdef", b"", 0), None);
    assert_eq!(find_bytes(b"abc", b"abcd", 0), None);
    assert_eq!(find_bytes(b"abc", b"a", 10), None);
    assert_eq!(find_bytes(b"aaa", b"aa", 0), Some(0));
}

#[test]
fn test_declared_encoding_extraction() {
    let input = br#"<?xml version="1.0" encoding="UTF-16LE"?><root/>"#;
    let name = declared_encoding_name(input, Encoding::Utf8).expect("name present");
    assert_eq!(name, b"UTF-16LE");
}

#[test]
fn test_declared_encoding_absent() {
    assert_eq!(
        declared_encoding_name(br#"<?xml version="1.0"?><root/>"#, Encoding::Utf8),
        None
    );
    // No prolog close at all.
    assert_eq!(declared_encoding_name(b"no xml here", Encoding::Utf8), None);
}

#[test]
fn test_declared_encoding_after_prolog_is_ignored() {
    // The attribute appears only past the first `>`, so it belongs to the
    // body and must not be treated as a prolog declaration.
    let input = br#"<?xml version="1.0"?><root encoding="UTF-16LE"/>"#;
    assert_eq!(declared_encoding_name(input, Encoding::Utf8), None);
}

#[test]
fn test_declared_encoding_unterminated_value() {
    let input = br#"<?xml version="1.0" encoding="UTF-8"#;
    // Prolog never closes, so extraction bails at the missing `>`.
    assert_eq!(declared_encoding_name(input, Encoding::Utf8), None);
}

#[test]
fn test_declared_encoding_strips_padding_nuls() {
    let input = Encoding::Utf16Le.encode_ascii(r#"<?xml version="1.0" encoding="UTF-8"?><a/>"#);
    let name = declared_encoding_name(&input, Encoding::Utf16Le).expect("name present");
    assert_eq!(name, b"UTF-8");
}

#[test]
fn test_candidates_declared_first() {
    let input = Encoding::Utf16Le.encode_ascii(r#"<?xml version="1.0" encoding="UTF-8"?><a/>"#);
    let candidates = detect_xml_encoding(&input, Encoding::Utf16Le);
    assert_eq!(candidates.as_slice(), &[Encoding::Utf8, Encoding::Utf16Le][..]);
}

#[test]
fn test_candidates_without_declaration() {
    let candidates = detect_xml_encoding(b"<root/>", Encoding::Utf8);
    assert_eq!(candidates.as_slice(), &[Encoding::Utf8][..]);
}

#[test]
fn test_candidates_unknown_label_falls_back_to_utf8() {
    let input = br#"<?xml version="1.0" encoding="KOI8-R"?><root/>"#;
    let candidates = detect_xml_encoding(input, Encoding::Utf8);
    assert_eq!(candidates.as_slice(), &[Encoding::Utf8, Encoding::Utf8][..]);
}

#[test]
fn test_scanner_safe_input() {
    let scanner = EntityScanner::new();
    assert_eq!(scanner.detect(b""), ScanVerdict::Safe);
    assert_eq!(scanner.detect(b"Hello world"), ScanVerdict::Safe);
    assert_eq!(
        scanner.detect(br#"<?xml version="1.0"?><doc>text</doc>"#),
        ScanVerdict::Safe
    );
}

#[test]
fn test_scanner_flags_ascii_entity() {
    let scanner = EntityScanner::new();
    let input = br#"<!DOCTYPE d [<!ENTITY x SYSTEM "file:///etc/passwd">]><d>&x;</d>"#;
    assert_eq!(
        scanner.detect(input),
        ScanVerdict::EntityDeclaration {
            encoding: Encoding::Utf8
        }
    );
}

#[test]
fn test_scanner_reports_declared_candidate_first() {
    // Outer bytes are UTF-16LE but the prolog declares UTF-8 and the entity
    // is rendered per the declared encoding; the verdict must carry the
    // declared candidate that actually matched.
    let mut input =
        Encoding::Utf16Le.encode_ascii(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    input.extend_from_slice(br#"<!DOCTYPE d [<!ENTITY x "y">]><d>&x;</d>"#);
    assert_eq!(
        EntityScanner::new().detect(&input),
        ScanVerdict::EntityDeclaration {
            encoding: Encoding::Utf8
        }
    );
}

#[test]
fn test_scanner_entity_is_case_sensitive() {
    // `<!entity` is not a valid XML entity declaration; the marker search
    // must stay byte-exact.
    let scanner = EntityScanner::new();
    assert_eq!(
        scanner.detect(br#"<doc>mentions <!entity in text</doc>"#),
        ScanVerdict::Safe
    );
}

#[test]
fn test_verdict_display() {
    assert_eq!(ScanVerdict::Safe.to_string(), "Safe");
    let verdict = ScanVerdict::EntityDeclaration {
        encoding: Encoding::Utf16Le,
    };
    assert_eq!(
        verdict.to_string(),
        "ENTITY declaration detected (UTF-16LE rendering)"
    );
    assert!(verdict.is_violation());
    assert!(!ScanVerdict::Safe.is_violation());
}
