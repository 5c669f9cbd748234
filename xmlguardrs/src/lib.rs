#![doc = include_str!("../README.md")]
//!
//! ## API Guide
//!
//! ### For End Users
//!
//! Most applications should use the high-level scan functions:
//!
//! - [`scan`] - Full scan: byte-level pre-scan plus a parser validation walk
//! - [`scan_file`] - Same, reading the document from a path
//! - [`heuristic_scan`] - Byte-level heuristic only, for callers that cannot
//!   trust parser-level entity controls
//! - [`version`] - Library version information
//!
//! These functions handle candidate-encoding selection automatically and
//! fail closed with a stable, pattern-matchable error on any entity
//! declaration.
//!
//! ### For Advanced Users and Debugging
//!
//! Lower-level pieces are exported for debugging and research:
//!
//! - [`EntityScanner`] - The heuristic scanner with its raw [`ScanVerdict`]
//! - [`Encoding`] - The closed encoding set, its BOM table and ASCII
//!   renderers, and the detection functions
//! - [`ScanFlags`] - Mode toggles for the full scan path
//!
//! Most applications should **not** need these unless they are analyzing why
//! an input was flagged.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod xxe;


// Re-export types for advanced usage
pub use xxe::{
    detect_bom, detect_string_encoding, detect_xml_encoding, detect_xml_string_encoding, Encoding,
    EncodingCandidates, EntityScanner, ScanFlags, ScanVerdict, ScannedDocument,
};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the scan entry points.
///
/// [`Error::EntityDeclarationDetected`] is the security failure and is
/// always fatal to the current scan; everything else is operational. The
/// message text of the security failure is stable so callers can
/// pattern-match on it.
#[derive(Debug, Error)]
pub enum Error {
    /// An `<!ENTITY` declaration was found, by either the byte-level
    /// heuristic or the parser's DOCTYPE walk.
    #[error("Detected use of ENTITY in XML, disabled to prevent XXE/XEE attacks")]
    EntityDeclarationDetected,

    /// The path handed to [`scan_file`] does not exist. Raised before any
    /// byte of the file is read.
    #[error("The file {} specified doesn't exist", .path.display())]
    FileNotFound { path: PathBuf },

    /// The path existed but reading it failed.
    #[error("Failed to read {}: {source}", .path.display())]
    FailedToReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The parser rejected the document for reasons unrelated to security.
    #[error("Failed to parse XML document: {source}")]
    Malformed {
        #[from]
        source: quick_xml::Error,
    },

    /// The detected file encoding cannot be tokenized by the validation
    /// parser. The 32-bit renderings are only reachable through
    /// [`ScanFlags::HEURISTIC_ONLY`]; refusing them here keeps a
    /// mis-tokenized DOCTYPE from slipping past the walk.
    #[error("The validation parser does not support {encoding}; scan with ScanFlags::HEURISTIC_ONLY")]
    UnsupportedEncoding { encoding: Encoding },
}

impl Error {
    /// Returns `true` only for the entity-declaration security failure,
    /// never for operational errors.
    pub fn is_security_violation(&self) -> bool {
        matches!(self, Error::EntityDeclarationDetected)
    }
}

/// Scans an XML byte buffer for entity declarations using the default mode:
/// the byte-level heuristic pre-scan followed by a full parser validation
/// walk with entity resolution and network access disabled.
///
/// # Arguments
///
/// * `input` - The byte buffer purporting to be XML. No encoding is assumed.
///
/// # Returns
///
/// A [`ScannedDocument`] on success, [`Error::EntityDeclarationDetected`]
/// when an `<!ENTITY` declaration is found, or [`Error::Malformed`] when the
/// document does not parse.
///
/// # Examples
///
/// ```
/// let doc = xmlguardrs::scan(br#"<?xml version="1.0"?><greeting>hello</greeting>"#)?;
/// assert_eq!(doc.element_count(), 1);
///
/// let poc = br#"<!DOCTYPE d [<!ENTITY x SYSTEM "file:///etc/passwd">]><d>&x;</d>"#;
/// assert!(xmlguardrs::scan(poc).is_err());
/// # Ok::<(), xmlguardrs::Error>(())
/// ```
pub fn scan(input: &[u8]) -> Result<ScannedDocument<'_>> {
    scan_with_flags(input, ScanFlags::NONE)
}

/// Scans an XML byte buffer with explicit mode toggles.
///
/// [`ScanFlags::HEURISTIC_ONLY`] selects the byte-level heuristic alone, for
/// execution environments where the parser's entity controls are unreliable;
/// [`ScanFlags::NO_HEURISTIC`] relies on the parser walk alone. Both paths
/// report entity declarations with the same error.
///
/// # Examples
///
/// ```
/// use xmlguardrs::ScanFlags;
///
/// let doc = xmlguardrs::scan_with_flags(b"<safe/>", ScanFlags::HEURISTIC_ONLY)?;
/// // The parser never ran, so no elements were counted.
/// assert_eq!(doc.element_count(), 0);
/// # Ok::<(), xmlguardrs::Error>(())
/// ```
pub fn scan_with_flags(input: &[u8], flags: ScanFlags) -> Result<ScannedDocument<'_>> {
    xxe::scan_document(Cow::Borrowed(input), flags)
}

/// Scans an XML document read from `path` using the default mode.
///
/// Fails with [`Error::FileNotFound`] before any byte-level work when the
/// path does not exist.
///
/// # Examples
///
/// ```
/// assert!(matches!(
///     xmlguardrs::scan_file("no/such/file.xml"),
///     Err(xmlguardrs::Error::FileNotFound { .. })
/// ));
/// ```
pub fn scan_file(path: impl AsRef<Path>) -> Result<ScannedDocument<'static>> {
    scan_file_with_flags(path, ScanFlags::NONE)
}

/// Scans an XML document read from `path` with explicit mode toggles.
pub fn scan_file_with_flags(
    path: impl AsRef<Path>,
    flags: ScanFlags,
) -> Result<ScannedDocument<'static>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(|source| Error::FailedToReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(xxe::scan_document(Cow::Owned(bytes), flags)?.into_owned())
}

/// Runs only the byte-level heuristic over `input`: render `<!ENTITY` under
/// every candidate encoding and search for it anywhere in the buffer.
///
/// This is the defense-in-depth fallback for callers that cannot rely on a
/// parser with entity resolution disabled. A clean result means "safe by
/// this heuristic"; callers may still apply a hardened parser afterwards.
///
/// # Examples
///
/// ```
/// assert!(xmlguardrs::heuristic_scan(b"<doc>plain content</doc>").is_ok());
///
/// let poc = br#"<!DOCTYPE d [<!ENTITY x SYSTEM "file:///etc/passwd">]><d>&x;</d>"#;
/// let err = xmlguardrs::heuristic_scan(poc).expect_err("entity must be flagged");
/// assert!(err.is_security_violation());
/// ```
pub fn heuristic_scan(input: &[u8]) -> Result<()> {
    match EntityScanner::new().detect(input) {
        ScanVerdict::Safe => Ok(()),
        ScanVerdict::EntityDeclaration { .. } => Err(Error::EntityDeclarationDetected),
    }
}

/// Returns the version of the library.
///
/// # Examples
///
/// ```
/// println!("xmlguardrs version: {}", xmlguardrs::version());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
