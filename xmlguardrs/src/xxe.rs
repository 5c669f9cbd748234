pub use self::document::ScannedDocument;
pub use self::encoding::{
    detect_bom, detect_string_encoding, detect_xml_encoding, detect_xml_string_encoding, Encoding,
    EncodingCandidates,
};
pub use self::scanner::{EntityScanner, ScanFlags, ScanVerdict};

pub(crate) use self::document::scan_document;

mod document;
mod encoding;
mod scanner;

#[cfg(test)]
mod tests;
