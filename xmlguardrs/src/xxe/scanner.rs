use core::fmt;

use log::{debug, trace};

use super::encoding::{self, Encoding};

/// The entity-declaration marker, rendered per candidate encoding before
/// searching. The comparison set must hold the byte-exact rendering for
/// every candidate: missing the true encoding is a security bug, not just
/// a correctness bug.
pub(crate) const ENTITY_MARKER: &str = "<!ENTITY";

bitflags::bitflags! {
    /// Scan-mode toggles for the full scan path.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ScanFlags: u32 {
        const NONE = 0;
        /// Use only the byte-level heuristic and never invoke the XML
        /// parser. Intended for threaded / process-pool execution
        /// environments where parser-level entity controls cannot be
        /// trusted per-call.
        const HEURISTIC_ONLY = 1 << 0;
        /// Skip the byte-level pre-scan and rely on the parser walk alone.
        const NO_HEURISTIC = 1 << 1;
    }
}

/// Outcome of a heuristic entity scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanVerdict {
    Safe,
    /// An `<!ENTITY` rendering was found somewhere in the input, under the
    /// reported candidate encoding.
    EntityDeclaration { encoding: Encoding },
}

impl ScanVerdict {
    pub fn is_violation(&self) -> bool {
        matches!(self, ScanVerdict::EntityDeclaration { .. })
    }
}

impl fmt::Display for ScanVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanVerdict::Safe => write!(f, "Safe"),
            ScanVerdict::EntityDeclaration { encoding } => {
                write!(f, "ENTITY declaration detected ({} rendering)", encoding)
            }
        }
    }
}

/// Byte-level scanner deciding whether an input contains an `<!ENTITY`
/// declaration, without parsing it as XML.
///
/// The scan is a pure, terminating computation over the input buffer: detect
/// the file encoding, collect the declared-encoding candidate from the
/// prolog, render the entity marker under each candidate, and search for the
/// renderings anywhere in the input. Callers that can rely on a parser with
/// entity resolution disabled should prefer the full scan path and keep this
/// as defense in depth.
pub struct EntityScanner {
    // Currently stateless, but kept for future expansion
}

impl EntityScanner {
    pub fn new() -> Self {
        Self {}
    }

    /// Scans `input` for entity-declaration markers under every candidate
    /// encoding. The declared candidate is tested before the file encoding.
    pub fn detect(&self, input: &[u8]) -> ScanVerdict {
        let file_encoding = encoding::detect_string_encoding(input);
        trace!("detected file encoding {}", file_encoding);

        let candidates = encoding::detect_xml_encoding(input, file_encoding);
        for candidate in candidates {
            let marker = candidate.encode_ascii(ENTITY_MARKER);
            if encoding::find_bytes(input, &marker, 0).is_some() {
                debug!("entity declaration marker found under {}", candidate);
                return ScanVerdict::EntityDeclaration {
                    encoding: candidate,
                };
            }
        }

        ScanVerdict::Safe
    }
}

impl Default for EntityScanner {
    fn default() -> Self {
        Self::new()
    }
}
