use std::borrow::Cow;

use log::{debug, trace};
use quick_xml::events::Event;
use quick_xml::Reader;

use super::encoding::{self, Encoding};
use super::scanner::{EntityScanner, ScanFlags, ENTITY_MARKER};
use crate::{Error, Result};

/// An input that passed the scan: no entity declarations were found by any
/// enabled path.
///
/// The document keeps the scanned bytes (borrowed from the caller's buffer,
/// or owned when read from a file) together with what the scan learned about
/// them. [`ScannedDocument::reader`] hands the bytes to a fresh parser for
/// actual consumption; quick-xml performs no entity resolution and no
/// network access, so re-reading a scanned document stays inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedDocument<'a> {
    bytes: Cow<'a, [u8]>,
    file_encoding: Encoding,
    declared_encoding: Option<Encoding>,
    has_doctype: bool,
    elements: usize,
}

impl<'a> ScannedDocument<'a> {
    /// The scanned input, byte for byte as it was handed in.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encoding detected from the BOM or the `<?xml` prefix.
    pub fn file_encoding(&self) -> Encoding {
        self.file_encoding
    }

    /// Encoding declared in the prolog, when present and recognized.
    pub fn declared_encoding(&self) -> Option<Encoding> {
        self.declared_encoding
    }

    /// Whether the document carries a DOCTYPE. A DOCTYPE without entity
    /// declarations is allowed through the scan.
    pub fn has_doctype(&self) -> bool {
        self.has_doctype
    }

    /// Number of elements seen by the validation walk. Zero when the scan
    /// ran in heuristic-only mode and the parser was never invoked.
    pub fn element_count(&self) -> usize {
        self.elements
    }

    /// A fresh event reader over the scanned bytes.
    pub fn reader(&self) -> Reader<&[u8]> {
        Reader::from_reader(self.bytes())
    }

    /// Detaches the document from the caller's buffer.
    pub fn into_owned(self) -> ScannedDocument<'static> {
        ScannedDocument {
            bytes: Cow::Owned(self.bytes.into_owned()),
            file_encoding: self.file_encoding,
            declared_encoding: self.declared_encoding,
            has_doctype: self.has_doctype,
            elements: self.elements,
        }
    }
}

/// Runs the configured scan paths over `bytes` and builds the document
/// handle. Fails closed: any entity declaration aborts the scan.
pub(crate) fn scan_document(bytes: Cow<'_, [u8]>, flags: ScanFlags) -> Result<ScannedDocument<'_>> {
    // HEURISTIC_ONLY keeps the pre-scan even when NO_HEURISTIC is also set,
    // otherwise nothing would run at all.
    let run_heuristic =
        flags.contains(ScanFlags::HEURISTIC_ONLY) || !flags.contains(ScanFlags::NO_HEURISTIC);
    if run_heuristic {
        let verdict = EntityScanner::new().detect(&bytes);
        if verdict.is_violation() {
            return Err(Error::EntityDeclarationDetected);
        }
    }

    let file_encoding = encoding::detect_string_encoding(&bytes);
    let declared_encoding = encoding::declared_encoding_name(&bytes, file_encoding)
        .and_then(|name| Encoding::from_label(&name));

    let mut has_doctype = false;
    let mut elements: usize = 0;

    if !flags.contains(ScanFlags::HEURISTIC_ONLY) {
        // The validation parser tokenizes bytes, so the input must be
        // ASCII-compatible when it reaches it: UTF-16 is transcoded first,
        // the 32-bit renderings are refused outright rather than
        // mis-tokenized into events that would hide a DOCTYPE.
        match file_encoding {
            Encoding::Utf8 | Encoding::Gb18030 => {
                (has_doctype, elements) = validation_walk(&bytes)?;
            }
            Encoding::Utf16Le | Encoding::Utf16Be => {
                let codec = match file_encoding {
                    Encoding::Utf16Be => encoding_rs::UTF_16BE,
                    _ => encoding_rs::UTF_16LE,
                };
                let (decoded, _, _) = codec.decode(&bytes);
                (has_doctype, elements) = validation_walk(decoded.as_bytes())?;
            }
            Encoding::Utf32Be | Encoding::Utf32Le | Encoding::Utf32Odd1 | Encoding::Utf32Odd2 => {
                debug!("refusing parser walk over {} input", file_encoding);
                return Err(Error::UnsupportedEncoding {
                    encoding: file_encoding,
                });
            }
        }
        trace!("validation walk saw {} elements", elements);
    }

    Ok(ScannedDocument {
        bytes,
        file_encoding,
        declared_encoding,
        has_doctype,
        elements,
    })
}

/// Streams every event to EOF over ASCII-compatible bytes. A DOCTYPE whose
/// content declares entities is the authoritative failure; parser rejections
/// surface as [`Error::Malformed`].
fn validation_walk(bytes: &[u8]) -> Result<(bool, usize)> {
    let mut reader = Reader::from_reader(bytes);
    let mut has_doctype = false;
    let mut elements: usize = 0;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::DocType(doctype) => {
                has_doctype = true;
                // The walk only ever sees ASCII-compatible bytes, so the
                // marker search stays binary, like everything else here.
                if encoding::find_bytes(&doctype, ENTITY_MARKER.as_bytes(), 0).is_some() {
                    debug!("DOCTYPE with entity declarations rejected");
                    return Err(Error::EntityDeclarationDetected);
                }
            }
            Event::Start(_) | Event::Empty(_) => {
                elements = elements.saturating_add(1);
            }
            _ => {}
        }
    }

    Ok((has_doctype, elements))
}
