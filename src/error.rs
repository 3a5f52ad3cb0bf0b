//! Rich diagnostic error types for ontoloom.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers know exactly what went wrong
//! and how to fix it. [`OntoError`] rolls them all up.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, sources) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum OntoError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reasoner(#[from] ReasonerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Resource errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ResourceError {
    #[error("invalid identifier \"{iri}\": {message}")]
    #[diagnostic(
        code(onto::resource::invalid_identifier),
        help(
            "Resource and ontology identifiers must be absolute IRIs, \
             e.g. `http://example.com/ontologies/person.owl#Person`. \
             Check for a missing scheme, spaces, or unescaped characters."
        )
    )]
    InvalidIdentifier { iri: String, message: String },

    #[error("resource <{iri}> is a {actual}, not a {expected}")]
    #[diagnostic(
        code(onto::resource::kind_mismatch),
        help(
            "A resource can only be converted into the handle matching its kind. \
             Create the resource with the intended kind instead."
        )
    )]
    KindMismatch {
        iri: String,
        expected: String,
        actual: String,
    },
}

// ---------------------------------------------------------------------------
// Ontology errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum OntologyError {
    #[error("ontology <{iri}> already exists")]
    #[diagnostic(
        code(onto::ontology::duplicate),
        help(
            "An ontology with this IRI is already registered with this manager. \
             Use a different IRI, or use a separate `OntologyManager`."
        )
    )]
    DuplicateOntology { iri: String },
}

// ---------------------------------------------------------------------------
// Change errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ApplyError {
    #[error("change #{index} rejected for <{ontology}>: {reason} ({axiom})")]
    #[diagnostic(
        code(onto::change::rejected),
        help(
            "The validation policy rejected a change. The whole batch was rolled back \
             ({rolled_back} change(s) undone); the ontology is unchanged. \
             Fix the offending axiom or relax `validation` in the manager config."
        )
    )]
    Rejected {
        ontology: String,
        index: usize,
        axiom: String,
        reason: String,
        rolled_back: usize,
    },
}

// ---------------------------------------------------------------------------
// Codec errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CodecError {
    #[error("failed to parse {format} document: {message}")]
    #[diagnostic(
        code(onto::codec::parse),
        help("The document is malformed. Check that it was written in the declared format.")
    )]
    Parse { format: String, message: String },

    #[error("{format} document has no ontology header")]
    #[diagnostic(
        code(onto::codec::missing_header),
        help("Exactly one `<iri> rdf:type owl:Ontology` statement is required.")
    )]
    MissingHeader { format: String },

    #[error("{format} document declares more than one ontology: <{first}> and <{second}>")]
    #[diagnostic(
        code(onto::codec::duplicate_header),
        help("Split the document so that each file holds a single ontology.")
    )]
    DuplicateHeader {
        format: String,
        first: String,
        second: String,
    },

    #[error("existential restriction {node} is incomplete")]
    #[diagnostic(
        code(onto::codec::incomplete_restriction),
        help(
            "An `owl:Restriction` used as a superclass needs both `owl:onProperty` \
             and `owl:someValuesFrom`."
        )
    )]
    IncompleteRestriction { node: String },

    #[error("unsupported literal datatype <{datatype}> for value \"{value}\"")]
    #[diagnostic(
        code(onto::codec::unsupported_literal),
        help("Only xsd:string, xsd:boolean and xsd:integer literals are supported.")
    )]
    UnsupportedLiteral { value: String, datatype: String },

    #[error("invalid prefix \"{prefix}\": {message}")]
    #[diagnostic(
        code(onto::codec::invalid_prefix),
        help("Prefix namespaces must be absolute IRIs, usually ending in `#` or `/`.")
    )]
    InvalidPrefix { prefix: String, message: String },

    #[error("failed to write ontology document: {source}")]
    #[diagnostic(
        code(onto::codec::storage),
        help(
            "The target sink could not be written. Check that the destination exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Storage {
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Reasoner errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ReasonerError {
    #[error("ontology <{ontology}> is inconsistent ({violations} violation(s))")]
    #[diagnostic(
        code(onto::reason::inconsistent),
        help(
            "Instance queries are undefined on an inconsistent ontology. \
             Call `check()` to list the violations, then remove the conflicting assertions."
        )
    )]
    Inconsistent { ontology: String, violations: usize },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read manager config: {path}")]
    #[diagnostic(
        code(onto::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manager config: {path}")]
    #[diagnostic(
        code(onto::config::parse),
        help("Check the TOML syntax in the config file. {message}")
    )]
    Parse { path: String, message: String },

    #[error("failed to write manager config: {path}")]
    #[diagnostic(
        code(onto::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("prefix \"{prefix}\" maps to an invalid namespace \"{namespace}\"")]
    #[diagnostic(
        code(onto::config::invalid_prefix),
        help("Prefix namespaces must be absolute IRIs, usually ending in `#` or `/`.")
    )]
    InvalidPrefix { prefix: String, namespace: String },
}

/// Convenience alias for functions returning ontoloom results.
pub type OntoResult<T> = std::result::Result<T, OntoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_error_converts_to_onto_error() {
        let err = ResourceError::InvalidIdentifier {
            iri: "not an iri".into(),
            message: "no scheme".into(),
        };
        let onto: OntoError = err.into();
        assert!(matches!(
            onto,
            OntoError::Resource(ResourceError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn duplicate_ontology_message_names_iri() {
        let err = OntologyError::DuplicateOntology {
            iri: "http://example.com/a.owl".into(),
        };
        assert_eq!(
            err.to_string(),
            "ontology <http://example.com/a.owl> already exists"
        );
    }

    #[test]
    fn storage_error_keeps_io_source() {
        let err = CodecError::Storage {
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("read-only"));
    }

    #[test]
    fn diagnostic_codes_are_namespaced() {
        let err: OntoError = ReasonerError::Inconsistent {
            ontology: "http://example.com/g.owl".into(),
            violations: 2,
        }
        .into();
        let code = err.code().unwrap().to_string();
        assert_eq!(code, "onto::reason::inconsistent");
    }
}
