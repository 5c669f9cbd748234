use core::fmt;

/// Candidate encodings produced by [`detect_xml_encoding`]: the declared
/// prolog encoding (when present) followed by the file encoding.
#[cfg(feature = "smallvec")]
pub type EncodingCandidates = smallvec::SmallVec<[Encoding; 2]>;

/// Candidate encodings produced by [`detect_xml_encoding`]: the declared
/// prolog encoding (when present) followed by the file encoding.
#[cfg(not(feature = "smallvec"))]
pub type EncodingCandidates = Vec<Encoding>;

/// Byte-level character encoding hypothesis for an XML input.
///
/// This is a closed set: every variant has a total ASCII renderer and an
/// optional BOM, so "unknown encoding" can never surface at runtime. The
/// two `Utf32Odd` variants model non-native 32-bit byte orders that some
/// parsers historically accepted; they have no BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Utf32Be,
    Utf32Le,
    Utf32Odd1,
    Utf32Odd2,
    Utf16Be,
    Utf16Le,
    Utf8,
    Gb18030,
}

/// Order in which encodings are tried when sniffing the `<?xml` prefix.
/// Wider renderings come first; GB-18030 shares the UTF-8 renderer and is
/// therefore shadowed by it, which is the intended canonicalization.
const DETECTION_ORDER: [Encoding; 8] = [
    Encoding::Utf32Be,
    Encoding::Utf32Le,
    Encoding::Utf32Odd1,
    Encoding::Utf32Odd2,
    Encoding::Utf16Be,
    Encoding::Utf16Le,
    Encoding::Utf8,
    Encoding::Gb18030,
];

/// BOM prefixes, checked in order. 4-byte entries must precede the 2-byte
/// entries they collide with: the UTF-32LE BOM starts with the UTF-16LE BOM.
const BOM_TABLE: [(Encoding, &[u8]); 6] = [
    (Encoding::Utf32Be, &[0x00, 0x00, 0xFE, 0xFF]),
    (Encoding::Utf32Le, &[0xFF, 0xFE, 0x00, 0x00]),
    (Encoding::Gb18030, &[0x84, 0x31, 0x95, 0x33]),
    (Encoding::Utf16Be, &[0xFE, 0xFF]),
    (Encoding::Utf16Le, &[0xFF, 0xFE]),
    (Encoding::Utf8, &[0xEF, 0xBB, 0xBF]),
];

const XML_DECL_START: &str = "<?xml";
const ENCODING_ATTR: &str = "encoding=\"";

impl Encoding {
    /// Canonical name of this encoding.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf32Be => "UTF-32BE",
            Encoding::Utf32Le => "UTF-32LE",
            Encoding::Utf32Odd1 => "UTF-32odd1",
            Encoding::Utf32Odd2 => "UTF-32odd2",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf8 => "UTF-8",
            Encoding::Gb18030 => "GB-18030",
        }
    }

    /// The BOM prefix identifying this encoding, if it has one.
    pub fn bom(self) -> Option<&'static [u8]> {
        BOM_TABLE
            .iter()
            .find(|(encoding, _)| *encoding == self)
            .map(|(_, bom)| *bom)
    }

    /// Bytes one ASCII character occupies under this encoding.
    pub fn width(self) -> usize {
        match self {
            Encoding::Utf8 | Encoding::Gb18030 => 1,
            Encoding::Utf16Be | Encoding::Utf16Le => 2,
            Encoding::Utf32Be
            | Encoding::Utf32Le
            | Encoding::Utf32Odd1
            | Encoding::Utf32Odd2 => 4,
        }
    }

    /// Renders `text` as the byte sequence it would take under this
    /// encoding, padding each byte with NULs per the encoding's width and
    /// byte order.
    ///
    /// Intended for the pure-ASCII marker strings used by the scanner
    /// (`<?xml`, `<!ENTITY`, `encoding="`, `"`, `>`); non-ASCII bytes are
    /// padded byte-wise the same way.
    pub fn encode_ascii(self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len().saturating_mul(self.width()));
        for &byte in text.as_bytes() {
            match self {
                Encoding::Utf8 | Encoding::Gb18030 => out.push(byte),
                Encoding::Utf16Be => out.extend_from_slice(&[0x00, byte]),
                Encoding::Utf16Le => out.extend_from_slice(&[byte, 0x00]),
                Encoding::Utf32Be => out.extend_from_slice(&[0x00, 0x00, 0x00, byte]),
                Encoding::Utf32Le => out.extend_from_slice(&[byte, 0x00, 0x00, 0x00]),
                Encoding::Utf32Odd1 => out.extend_from_slice(&[0x00, byte, 0x00, 0x00]),
                Encoding::Utf32Odd2 => out.extend_from_slice(&[0x00, 0x00, byte, 0x00]),
            }
        }
        out
    }

    /// Resolves an encoding name, as found in an XML prolog, to a member of
    /// the closed set. Matching is ASCII case-insensitive. Unknown names
    /// return `None`; callers fall back to [`Encoding::Utf8`] rather than
    /// failing, since the name is attacker-controlled input.
    pub fn from_label(label: &[u8]) -> Option<Encoding> {
        DETECTION_ORDER
            .into_iter()
            .find(|encoding| label.eq_ignore_ascii_case(encoding.name().as_bytes()))
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returns the position of `needle` in `haystack` at or after `from`.
///
/// Plain byte-window comparison: correctness here depends on *not*
/// interpreting bytes as characters.
pub(crate) fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|position| position.saturating_add(from))
}

/// Identifies the input's encoding from its BOM, if one is present.
///
/// The table is consulted in its fixed order; the first exact prefix match
/// wins. No side effects, never fails.
pub fn detect_bom(bytes: &[u8]) -> Option<Encoding> {
    BOM_TABLE
        .iter()
        .find(|(_, bom)| bytes.starts_with(bom))
        .map(|(encoding, _)| *encoding)
}

/// BOM-less fallback: tries each encoding's rendering of `<?xml` as a
/// prefix of the input. First match wins; defaults to UTF-8.
pub fn detect_xml_string_encoding(bytes: &[u8]) -> Encoding {
    DETECTION_ORDER
        .into_iter()
        .find(|encoding| bytes.starts_with(&encoding.encode_ascii(XML_DECL_START)))
        .unwrap_or(Encoding::Utf8)
}

/// Detects the file-level encoding of the input: BOM when present,
/// otherwise the `<?xml` prefix sniff.
pub fn detect_string_encoding(bytes: &[u8]) -> Encoding {
    detect_bom(bytes).unwrap_or_else(|| detect_xml_string_encoding(bytes))
}

/// Extracts the encoding name declared in the XML prolog, rendered under
/// `file_encoding`, with padding NULs stripped. Returns `None` when the
/// prolog has no `encoding` attribute before its closing `>`.
pub(crate) fn declared_encoding_name(bytes: &[u8], file_encoding: Encoding) -> Option<Vec<u8>> {
    let attr_marker = file_encoding.encode_ascii(ENCODING_ATTR);
    let quote = file_encoding.encode_ascii("\"");
    let close = file_encoding.encode_ascii(">");

    let close_pos = find_bytes(bytes, &close, 0)?;
    let attr_pos = find_bytes(bytes, &attr_marker, 0)?;
    if attr_pos > close_pos {
        // An encoding attribute past the first `>` belongs to the body,
        // not the prolog.
        return None;
    }

    let value_start = attr_pos.saturating_add(attr_marker.len());
    let quote_pos = find_bytes(bytes, &quote, value_start)?;

    // Multi-byte renderings pad every ASCII byte with NULs; strip them so
    // the raw value survives reinterpretation as an encoding name.
    let name: Vec<u8> = bytes
        .get(value_start..quote_pos)?
        .iter()
        .copied()
        .filter(|&byte| byte != 0x00)
        .collect();
    Some(name)
}

/// Produces the candidate encodings to scan under: the encoding declared in
/// the prolog (when present, resolved leniently with a UTF-8 fallback)
/// followed by `file_encoding`. The declared candidate comes first because a
/// declared/file mismatch is itself a known smuggling vector.
pub fn detect_xml_encoding(bytes: &[u8], file_encoding: Encoding) -> EncodingCandidates {
    let mut candidates = EncodingCandidates::new();
    if let Some(name) = declared_encoding_name(bytes, file_encoding) {
        candidates.push(Encoding::from_label(&name).unwrap_or(Encoding::Utf8));
    }
    candidates.push(file_encoding);
    candidates
}
