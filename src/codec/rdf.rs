//! OWL-to-RDF mapping over oxigraph's N-Triples and Turtle I/O.
//!
//! Written graph layout:
//!
//! ```text
//! <ont>  rdf:type owl:Ontology .
//! <C>    rdf:type owl:Class .            # one declaration per signature resource
//! <A>    rdfs:subClassOf <B> .           # SubClassOf
//! <A>    owl:disjointWith <B> .          # DisjointClasses, recorded direction
//! <i>    rdf:type <C> .                  # ClassAssertion, any C incl. owl:Thing
//! <s>    <p> <o> .                       # ObjectPropertyAssertion
//! <s>    <d> "v"^^xsd:T .                # DataPropertyAssertion
//! <H>    rdfs:subClassOf _:r .           # ExistentialSubClassOf
//! _:r    rdf:type owl:Restriction ; owl:onProperty <p> ; owl:someValuesFrom <F> .
//! ```
//!
//! Decoding reads declarations first so property kinds are known, then maps
//! statements back to axioms. Statements with no axiom counterpart (labels,
//! comments, other OWL constructs) are skipped with a warning.

use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};

use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::vocab::{rdf, rdfs, xsd};
use oxigraph::model::{BlankNode, Literal as RdfLiteral, NamedNode, NamedNodeRef, Term, Triple};

use crate::axiom::{Axiom, Datatype, Literal};
use crate::error::CodecError;
use crate::ontology::Ontology;
use crate::resource::{Class, DataProperty, Individual, Iri, ObjectProperty, ResourceKind};

use super::{CodecResult, Prefixes};

const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

mod owl {
    use oxigraph::model::NamedNodeRef;

    pub const ONTOLOGY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");
    pub const CLASS: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    pub const NAMED_INDIVIDUAL: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#NamedIndividual");
    pub const OBJECT_PROPERTY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
    pub const DATATYPE_PROPERTY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
    pub const RESTRICTION: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Restriction");
    pub const ON_PROPERTY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#onProperty");
    pub const SOME_VALUES_FROM: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#someValuesFrom");
    pub const DISJOINT_WITH: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#disjointWith");
}

/// RDF concrete syntaxes handled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfSyntax {
    NTriples,
    Turtle,
}

impl RdfSyntax {
    fn format(self) -> RdfFormat {
        match self {
            RdfSyntax::NTriples => RdfFormat::NTriples,
            RdfSyntax::Turtle => RdfFormat::Turtle,
        }
    }

    fn name(self) -> &'static str {
        match self {
            RdfSyntax::NTriples => "N-Triples",
            RdfSyntax::Turtle => "Turtle",
        }
    }
}

fn declaration_type(kind: ResourceKind) -> NamedNodeRef<'static> {
    match kind {
        ResourceKind::Class => owl::CLASS,
        ResourceKind::Individual => owl::NAMED_INDIVIDUAL,
        ResourceKind::ObjectProperty => owl::OBJECT_PROPERTY,
        ResourceKind::DataProperty => owl::DATATYPE_PROPERTY,
    }
}

fn storage(source: std::io::Error) -> CodecError {
    CodecError::Storage { source }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Map an ontology to RDF triples, header and declarations first.
pub fn to_triples(ontology: &Ontology) -> Vec<Triple> {
    let mut triples = Vec::with_capacity(ontology.axiom_count() * 2 + 1);
    triples.push(Triple::new(
        ontology.iri().to_named_node(),
        rdf::TYPE.into_owned(),
        owl::ONTOLOGY.into_owned(),
    ));

    for resource in ontology.signature() {
        triples.push(Triple::new(
            resource.iri.to_named_node(),
            rdf::TYPE.into_owned(),
            declaration_type(resource.kind).into_owned(),
        ));
    }

    let mut restrictions = 0usize;
    for axiom in ontology.axioms() {
        match axiom {
            Axiom::SubClassOf { sub, sup } => triples.push(Triple::new(
                sub.iri().to_named_node(),
                rdfs::SUB_CLASS_OF.into_owned(),
                sup.iri().to_named_node(),
            )),
            Axiom::DisjointClasses { first, second } => triples.push(Triple::new(
                first.iri().to_named_node(),
                owl::DISJOINT_WITH.into_owned(),
                second.iri().to_named_node(),
            )),
            Axiom::ClassAssertion { class, individual } => triples.push(Triple::new(
                individual.iri().to_named_node(),
                rdf::TYPE.into_owned(),
                class.iri().to_named_node(),
            )),
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => triples.push(Triple::new(
                subject.iri().to_named_node(),
                property.iri().to_named_node(),
                object.iri().to_named_node(),
            )),
            Axiom::DataPropertyAssertion {
                property,
                subject,
                value,
            } => triples.push(Triple::new(
                subject.iri().to_named_node(),
                property.iri().to_named_node(),
                RdfLiteral::new_typed_literal(
                    value.lexical_form(),
                    NamedNode::new_unchecked(value.datatype().iri()),
                ),
            )),
            Axiom::ExistentialSubClassOf {
                holder,
                property,
                filler,
            } => {
                let node = BlankNode::new_unchecked(format!("r{restrictions}"));
                restrictions += 1;
                triples.push(Triple::new(
                    holder.iri().to_named_node(),
                    rdfs::SUB_CLASS_OF.into_owned(),
                    node.clone(),
                ));
                triples.push(Triple::new(
                    node.clone(),
                    rdf::TYPE.into_owned(),
                    owl::RESTRICTION.into_owned(),
                ));
                triples.push(Triple::new(
                    node.clone(),
                    owl::ON_PROPERTY.into_owned(),
                    property.iri().to_named_node(),
                ));
                triples.push(Triple::new(
                    node,
                    owl::SOME_VALUES_FROM.into_owned(),
                    filler.iri().to_named_node(),
                ));
            }
        }
    }
    triples
}

/// Serialize `ontology` in `syntax`; Turtle output carries `prefixes`.
pub fn encode<W: Write>(
    ontology: &Ontology,
    syntax: RdfSyntax,
    prefixes: &Prefixes,
    writer: W,
) -> CodecResult<()> {
    let mut serializer = RdfSerializer::from_format(syntax.format());
    if syntax == RdfSyntax::Turtle {
        let standard = [("owl", OWL_NS), ("rdf", RDF_NS), ("rdfs", RDFS_NS), ("xsd", XSD_NS)];
        let custom = prefixes.iter().map(|(p, ns)| (p.as_str(), ns.as_str()));
        for (prefix, namespace) in standard.into_iter().chain(custom) {
            serializer = serializer.with_prefix(prefix, namespace).map_err(|e| {
                CodecError::InvalidPrefix {
                    prefix: prefix.to_string(),
                    message: e.to_string(),
                }
            })?;
        }
    }

    let mut out = serializer.for_writer(writer);
    for triple in to_triples(ontology) {
        out.serialize_triple(&triple).map_err(storage)?;
    }
    out.finish().map_err(storage)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// A parsed RDF node, flattened for matching.
#[derive(Debug, Clone)]
enum Node {
    Iri(String),
    Blank(String),
    Literal(RdfLiteral),
}

impl Node {
    #[allow(unreachable_patterns)]
    fn from_term(term: Term) -> Option<Self> {
        match term {
            Term::NamedNode(n) => Some(Node::Iri(n.as_str().to_string())),
            Term::BlankNode(b) => Some(Node::Blank(b.as_str().to_string())),
            Term::Literal(l) => Some(Node::Literal(l)),
            _ => None,
        }
    }
}

/// A triple with subject and object flattened to [`Node`]s.
struct Statement {
    subject: Node,
    predicate: String,
    object: Node,
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |n: &Node| match n {
            Node::Iri(i) => format!("<{i}>"),
            Node::Blank(b) => format!("_:{b}"),
            Node::Literal(l) => l.to_string(),
        };
        write!(f, "{} <{}> {}", show(&self.subject), self.predicate, show(&self.object))
    }
}

#[derive(Default)]
struct Restriction {
    property: Option<String>,
    filler: Option<String>,
}

fn is_builtin(iri: &str) -> bool {
    [OWL_NS, RDF_NS, RDFS_NS, XSD_NS]
        .iter()
        .any(|ns| iri.starts_with(ns))
}

fn iri(value: &str, syntax: RdfSyntax) -> CodecResult<Iri> {
    Iri::parse(value).map_err(|e| CodecError::Parse {
        format: syntax.name().to_string(),
        message: e.to_string(),
    })
}

fn literal(lit: &RdfLiteral, syntax: RdfSyntax) -> CodecResult<Literal> {
    let datatype = lit.datatype();
    let value = lit.value();
    let bad_lexical = |dt: Datatype| CodecError::Parse {
        format: syntax.name().to_string(),
        message: format!("\"{value}\" is not a valid {dt} lexical form"),
    };

    if datatype == xsd::STRING || lit.language().is_some() {
        Ok(Literal::String(value.to_string()))
    } else if datatype == xsd::BOOLEAN {
        match value {
            "true" | "1" => Ok(Literal::Boolean(true)),
            "false" | "0" => Ok(Literal::Boolean(false)),
            _ => Err(bad_lexical(Datatype::Boolean)),
        }
    } else if datatype == xsd::INTEGER {
        value
            .parse::<i64>()
            .map(Literal::Integer)
            .map_err(|_| bad_lexical(Datatype::Integer))
    } else {
        Err(CodecError::UnsupportedLiteral {
            value: value.to_string(),
            datatype: datatype.as_str().to_string(),
        })
    }
}

fn parse_statements<R: Read>(reader: R, syntax: RdfSyntax) -> CodecResult<Vec<Statement>> {
    let mut statements = Vec::new();
    for quad in RdfParser::from_format(syntax.format()).for_reader(reader) {
        let quad = quad.map_err(|e| CodecError::Parse {
            format: syntax.name().to_string(),
            message: e.to_string(),
        })?;
        let (Some(subject), Some(object)) = (
            Node::from_term(Term::from(quad.subject)),
            Node::from_term(quad.object),
        ) else {
            continue;
        };
        statements.push(Statement {
            subject,
            predicate: quad.predicate.as_str().to_string(),
            object,
        });
    }
    Ok(statements)
}

/// Parse an RDF document back into an ontology.
///
/// Any `rdf:type` object outside the declaration vocabulary is read as a
/// class, `owl:Thing` included. A subject declared `owl:NamedIndividual` and
/// typed `owl:Ontology` alongside the real header is an assertion, not a
/// second header.
pub fn decode<R: Read>(reader: R, syntax: RdfSyntax) -> CodecResult<Ontology> {
    let statements = parse_statements(reader, syntax)?;

    // Pass 1: declarations, ontology header candidates, restriction nodes.
    let mut candidates: Vec<&str> = Vec::new();
    let mut declared: HashMap<&str, HashSet<ResourceKind>> = HashMap::new();
    let mut restrictions: HashMap<&str, Restriction> = HashMap::new();
    let mut consumed = vec![false; statements.len()];

    for (i, st) in statements.iter().enumerate() {
        match (&st.subject, st.predicate.as_str(), &st.object) {
            (Node::Iri(s), p, Node::Iri(o)) if p == rdf::TYPE.as_str() => {
                let kind = match o.as_str() {
                    o if o == owl::ONTOLOGY.as_str() => {
                        if !candidates.contains(&s.as_str()) {
                            candidates.push(s.as_str());
                        }
                        continue;
                    }
                    o if o == owl::CLASS.as_str() => ResourceKind::Class,
                    o if o == owl::NAMED_INDIVIDUAL.as_str() => ResourceKind::Individual,
                    o if o == owl::OBJECT_PROPERTY.as_str() => ResourceKind::ObjectProperty,
                    o if o == owl::DATATYPE_PROPERTY.as_str() => ResourceKind::DataProperty,
                    _ => continue,
                };
                declared.entry(s.as_str()).or_default().insert(kind);
                consumed[i] = true;
            }
            (Node::Blank(b), p, Node::Iri(o)) => {
                let entry = restrictions.entry(b.as_str());
                if p == rdf::TYPE.as_str() && o == owl::RESTRICTION.as_str() {
                    entry.or_default();
                } else if p == owl::ON_PROPERTY.as_str() {
                    entry.or_default().property = Some(o.clone());
                } else if p == owl::SOME_VALUES_FROM.as_str() {
                    entry.or_default().filler = Some(o.clone());
                } else {
                    continue;
                }
                consumed[i] = true;
            }
            _ => {}
        }
    }

    let is = |iri: &str, kind: ResourceKind| {
        declared.get(iri).is_some_and(|kinds| kinds.contains(&kind))
    };

    // An individual asserted into owl:Ontology is not a second header.
    if candidates.len() > 1 {
        candidates.retain(|s| !is(*s, ResourceKind::Individual));
    }
    let ontology_iri = match candidates.as_slice() {
        [] => {
            return Err(CodecError::MissingHeader {
                format: syntax.name().to_string(),
            });
        }
        [only] => *only,
        [first, second, ..] => {
            return Err(CodecError::DuplicateHeader {
                format: syntax.name().to_string(),
                first: first.to_string(),
                second: second.to_string(),
            });
        }
    };
    for (i, st) in statements.iter().enumerate() {
        if let (Node::Iri(s), Node::Iri(o)) = (&st.subject, &st.object) {
            if s == ontology_iri
                && st.predicate == rdf::TYPE.as_str()
                && o == owl::ONTOLOGY.as_str()
            {
                consumed[i] = true;
            }
        }
    }

    let mut ontology = Ontology::new(iri(ontology_iri, syntax)?);

    // Pass 2: statements to axioms.
    let mut skipped = 0usize;
    for (i, st) in statements.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        let axiom = match (&st.subject, st.predicate.as_str(), &st.object) {
            (Node::Iri(s), p, Node::Iri(o)) if p == rdfs::SUB_CLASS_OF.as_str() => {
                Some(Axiom::SubClassOf {
                    sub: Class::from_iri(iri(s, syntax)?),
                    sup: Class::from_iri(iri(o, syntax)?),
                })
            }
            (Node::Iri(s), p, Node::Blank(b)) if p == rdfs::SUB_CLASS_OF.as_str() => {
                let incomplete = || CodecError::IncompleteRestriction {
                    node: format!("_:{b}"),
                };
                let restriction = restrictions.get(b.as_str()).ok_or_else(incomplete)?;
                let (Some(property), Some(filler)) = (&restriction.property, &restriction.filler)
                else {
                    return Err(incomplete());
                };
                Some(Axiom::ExistentialSubClassOf {
                    holder: Class::from_iri(iri(s, syntax)?),
                    property: ObjectProperty::from_iri(iri(property, syntax)?),
                    filler: Class::from_iri(iri(filler, syntax)?),
                })
            }
            (Node::Iri(s), p, Node::Iri(o)) if p == owl::DISJOINT_WITH.as_str() => {
                Some(Axiom::DisjointClasses {
                    first: Class::from_iri(iri(s, syntax)?),
                    second: Class::from_iri(iri(o, syntax)?),
                })
            }
            (Node::Iri(s), p, Node::Iri(o))
                if p == rdf::TYPE.as_str() && o != owl::RESTRICTION.as_str() =>
            {
                Some(Axiom::ClassAssertion {
                    class: Class::from_iri(iri(o, syntax)?),
                    individual: Individual::from_iri(iri(s, syntax)?),
                })
            }
            (Node::Iri(s), p, Node::Iri(o))
                if is(p, ResourceKind::ObjectProperty) || (!is_builtin(p) && !is(p, ResourceKind::DataProperty)) =>
            {
                Some(Axiom::ObjectPropertyAssertion {
                    property: ObjectProperty::from_iri(iri(p, syntax)?),
                    subject: Individual::from_iri(iri(s, syntax)?),
                    object: Individual::from_iri(iri(o, syntax)?),
                })
            }
            (Node::Iri(s), p, Node::Literal(l))
                if is(p, ResourceKind::DataProperty) || (!is_builtin(p) && !is(p, ResourceKind::ObjectProperty)) =>
            {
                Some(Axiom::DataPropertyAssertion {
                    property: DataProperty::from_iri(iri(p, syntax)?),
                    subject: Individual::from_iri(iri(s, syntax)?),
                    value: literal(l, syntax)?,
                })
            }
            _ => None,
        };

        match axiom {
            Some(axiom) => {
                ontology.insert(axiom);
            }
            None => {
                skipped += 1;
                tracing::warn!(statement = %st, "skipping statement with no axiom counterpart");
            }
        }
    }

    tracing::debug!(
        ontology = %ontology.iri(),
        format = syntax.name(),
        axioms = ontology.axiom_count(),
        skipped,
        "decoded ontology document"
    );
    Ok(ontology)
}
