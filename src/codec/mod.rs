//! Codec: ontology documents in and out.
//!
//! Three document formats are supported:
//!
//! - **N-Triples** and **Turtle** ([`rdf`]): the OWL 2 mapping to RDF graphs,
//!   restricted to the axiom kinds this crate builds, written and parsed with
//!   `oxigraph`'s RDF I/O.
//! - **JSON** ([`json`]): a direct serde rendering of the ontology IRI and its
//!   axiom list.
//!
//! Whatever the format, `decode(encode(o))` yields an ontology with the same
//! IRI and a structurally equal axiom set.

pub mod json;
pub mod rdf;

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::ontology::Ontology;

/// Result type for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Prefix name → namespace IRI, used when writing Turtle.
pub type Prefixes = BTreeMap<String, String>;

/// Supported document formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    NTriples,
    #[default]
    Turtle,
    Json,
}

impl DocumentFormat {
    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::NTriples => "nt",
            DocumentFormat::Turtle => "ttl",
            DocumentFormat::Json => "json",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "nt" => Some(DocumentFormat::NTriples),
            "ttl" => Some(DocumentFormat::Turtle),
            "json" => Some(DocumentFormat::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::NTriples => write!(f, "N-Triples"),
            DocumentFormat::Turtle => write!(f, "Turtle"),
            DocumentFormat::Json => write!(f, "JSON"),
        }
    }
}

/// Write `ontology` to `writer` in `format`.
///
/// `prefixes` only affect Turtle output.
pub fn encode<W: Write>(
    ontology: &Ontology,
    format: DocumentFormat,
    prefixes: &Prefixes,
    writer: W,
) -> CodecResult<()> {
    match format {
        DocumentFormat::NTriples => rdf::encode(ontology, rdf::RdfSyntax::NTriples, prefixes, writer),
        DocumentFormat::Turtle => rdf::encode(ontology, rdf::RdfSyntax::Turtle, prefixes, writer),
        DocumentFormat::Json => json::encode(ontology, writer),
    }
}

/// Read an (unregistered) ontology from `reader`.
pub fn decode<R: Read>(reader: R, format: DocumentFormat) -> CodecResult<Ontology> {
    match format {
        DocumentFormat::NTriples => rdf::decode(reader, rdf::RdfSyntax::NTriples),
        DocumentFormat::Turtle => rdf::decode(reader, rdf::RdfSyntax::Turtle),
        DocumentFormat::Json => json::decode(reader),
    }
}

/// Encode into an in-memory buffer.
pub fn to_bytes(ontology: &Ontology, format: DocumentFormat, prefixes: &Prefixes) -> CodecResult<Vec<u8>> {
    let mut buffer = Vec::new();
    encode(ontology, format, prefixes, &mut buffer)?;
    Ok(buffer)
}

/// Decode from an in-memory buffer.
pub fn from_bytes(bytes: &[u8], format: DocumentFormat) -> CodecResult<Ontology> {
    decode(bytes, format)
}
