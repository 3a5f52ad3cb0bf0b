//! JSON documents: the ontology IRI plus its axiom list.
//!
//! ```json
//! {
//!   "iri": "http://autumncode.com/ontologies/person.owl",
//!   "axioms": [
//!     { "kind": "SubClassOf", "sub": "...#Fireman", "sup": "...#Person" }
//!   ]
//! }
//! ```

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::axiom::Axiom;
use crate::error::CodecError;
use crate::ontology::Ontology;
use crate::resource::Iri;

use super::CodecResult;

/// Serialized form of an ontology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyDocument {
    /// Ontology IRI.
    pub iri: Iri,
    /// Axioms in insertion order.
    #[serde(default)]
    pub axioms: Vec<Axiom>,
}

impl From<&Ontology> for OntologyDocument {
    fn from(ontology: &Ontology) -> Self {
        Self {
            iri: ontology.iri().clone(),
            axioms: ontology.axioms().to_vec(),
        }
    }
}

impl From<OntologyDocument> for Ontology {
    /// Repeated axioms in the document collapse into one.
    fn from(document: OntologyDocument) -> Self {
        let mut ontology = Ontology::new(document.iri);
        for axiom in document.axioms {
            ontology.insert(axiom);
        }
        ontology
    }
}

/// Write `ontology` as a pretty-printed JSON document.
pub fn encode<W: Write>(ontology: &Ontology, writer: W) -> CodecResult<()> {
    serde_json::to_writer_pretty(writer, &OntologyDocument::from(ontology)).map_err(|e| {
        CodecError::Storage {
            source: e.into(),
        }
    })
}

/// Read an ontology from a JSON document.
pub fn decode<R: Read>(reader: R) -> CodecResult<Ontology> {
    let document: OntologyDocument =
        serde_json::from_reader(reader).map_err(|e| CodecError::Parse {
            format: "JSON".into(),
            message: e.to_string(),
        })?;
    Ok(document.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Class, DataProperty, Individual};

    const NS: &str = "http://autumncode.com/ontologies/person.owl#";

    fn class(name: &str) -> Class {
        Class::new(&format!("{NS}{name}")).unwrap()
    }

    #[test]
    fn document_layout() {
        let mut o = Ontology::new(Iri::parse("http://autumncode.com/ontologies/person.owl").unwrap());
        o.insert(Axiom::subclass_of(&class("Fireman"), &class("Person")));

        let mut buf = Vec::new();
        encode(&o, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["iri"], "http://autumncode.com/ontologies/person.owl");
        assert_eq!(value["axioms"][0]["kind"], "SubClassOf");
        assert_eq!(value["axioms"][0]["sub"], format!("{NS}Fireman"));
    }

    #[test]
    fn literal_values_keep_their_datatype() {
        let mut o = Ontology::new(Iri::parse("http://example.com/t.owl").unwrap());
        let t800 = Individual::new("http://example.com/t.owl#t800").unwrap();
        let serial = DataProperty::new("http://example.com/t.owl#serial").unwrap();
        o.insert(Axiom::data_property_assertion(&serial, &t800, 101));

        let mut buf = Vec::new();
        encode(&o, &mut buf).unwrap();
        let back = decode(buf.as_slice()).unwrap();
        assert_eq!(back, o);
    }

    #[test]
    fn repeated_axioms_collapse() {
        let doc = format!(
            r#"{{"iri": "http://example.com/d.owl", "axioms": [
                {{"kind": "SubClassOf", "sub": "{NS}A", "sup": "{NS}B"}},
                {{"kind": "SubClassOf", "sub": "{NS}A", "sup": "{NS}B"}}
            ]}}"#
        );
        let o = decode(doc.as_bytes()).unwrap();
        assert_eq!(o.axiom_count(), 1);
    }

    #[test]
    fn invalid_iri_is_a_parse_error() {
        let err = decode(r#"{"iri": "not an iri", "axioms": []}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, CodecError::Parse { .. }));
    }

    #[test]
    fn missing_axioms_means_empty() {
        let o = decode(r#"{"iri": "http://example.com/e.owl"}"#.as_bytes()).unwrap();
        assert!(o.is_empty());
    }
}
