//! Axioms and the constructors that build them.
//!
//! An [`Axiom`] is a plain value: constructing one never touches an ontology
//! and never fails. Whether an axiom makes sense for a given ontology is for
//! the change applier's validator or the reasoner to decide.

use serde::{Deserialize, Serialize};

use crate::resource::{Class, DataProperty, Individual, ObjectProperty, Resource};

/// XSD datatype carried by a [`Literal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Datatype {
    /// `xsd:string`
    String,
    /// `xsd:boolean`
    Boolean,
    /// `xsd:integer`
    Integer,
}

impl Datatype {
    /// Full XSD IRI of the datatype.
    pub fn iri(self) -> &'static str {
        match self {
            Datatype::String => "http://www.w3.org/2001/XMLSchema#string",
            Datatype::Boolean => "http://www.w3.org/2001/XMLSchema#boolean",
            Datatype::Integer => "http://www.w3.org/2001/XMLSchema#integer",
        }
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Datatype::String => write!(f, "xsd:string"),
            Datatype::Boolean => write!(f, "xsd:boolean"),
            Datatype::Integer => write!(f, "xsd:integer"),
        }
    }
}

/// A typed scalar attached to a data property assertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "datatype", content = "value", rename_all = "lowercase")]
pub enum Literal {
    /// `xsd:string`.
    String(String),
    /// `xsd:boolean`.
    Boolean(bool),
    /// `xsd:integer`, limited to the `i64` range.
    Integer(i64),
}

impl Literal {
    /// The datatype tag of this literal.
    pub fn datatype(&self) -> Datatype {
        match self {
            Literal::String(_) => Datatype::String,
            Literal::Boolean(_) => Datatype::Boolean,
            Literal::Integer(_) => Datatype::Integer,
        }
    }

    /// Lexical form, as written in an RDF document.
    pub fn lexical_form(&self) -> String {
        match self {
            Literal::String(s) => s.clone(),
            Literal::Boolean(b) => b.to_string(),
            Literal::Integer(i) => i.to_string(),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}^^{}", self.lexical_form(), self.datatype())
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Integer(value.into())
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

/// Discriminant of an [`Axiom`], for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AxiomKind {
    /// [`Axiom::SubClassOf`].
    SubClassOf,
    /// [`Axiom::DisjointClasses`].
    DisjointClasses,
    /// [`Axiom::ClassAssertion`].
    ClassAssertion,
    /// [`Axiom::ObjectPropertyAssertion`].
    ObjectPropertyAssertion,
    /// [`Axiom::DataPropertyAssertion`].
    DataPropertyAssertion,
    /// [`Axiom::ExistentialSubClassOf`].
    ExistentialSubClassOf,
}

/// A single logical statement about resources.
///
/// Equality is structural: two axioms are equal iff they have the same kind
/// and equal operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Axiom {
    /// Every instance of `sub` is an instance of `sup`.
    SubClassOf { sub: Class, sup: Class },
    /// No individual is in both `first` and `second`.
    ///
    /// Recorded in one direction only; the reverse axiom is a different value.
    DisjointClasses { first: Class, second: Class },
    /// `individual` is an instance of `class`.
    ClassAssertion { class: Class, individual: Individual },
    /// `subject` is related to `object` through `property`.
    ObjectPropertyAssertion {
        property: ObjectProperty,
        subject: Individual,
        object: Individual,
    },
    /// `subject` has `value` for `property`.
    DataPropertyAssertion {
        property: DataProperty,
        subject: Individual,
        value: Literal,
    },
    /// Every instance of `holder` has some `property` edge into `filler`.
    ExistentialSubClassOf {
        holder: Class,
        property: ObjectProperty,
        filler: Class,
    },
}

impl Axiom {
    /// Every `sub` is a `sup`.
    pub fn subclass_of(sub: &Class, sup: &Class) -> Self {
        Axiom::SubClassOf {
            sub: sub.clone(),
            sup: sup.clone(),
        }
    }

    /// `first` and `second` are disjoint, in this direction only.
    ///
    /// Callers wanting the statement recorded both ways add both axioms.
    pub fn disjoint_classes(first: &Class, second: &Class) -> Self {
        Axiom::DisjointClasses {
            first: first.clone(),
            second: second.clone(),
        }
    }

    /// `individual` is a member of `class`.
    pub fn class_assertion(class: &Class, individual: &Individual) -> Self {
        Axiom::ClassAssertion {
            class: class.clone(),
            individual: individual.clone(),
        }
    }

    /// `subject` is related to `object` through `property`.
    pub fn object_property_assertion(
        property: &ObjectProperty,
        subject: &Individual,
        object: &Individual,
    ) -> Self {
        Axiom::ObjectPropertyAssertion {
            property: property.clone(),
            subject: subject.clone(),
            object: object.clone(),
        }
    }

    /// Attach a string, boolean or integer value to `subject`.
    pub fn data_property_assertion(
        property: &DataProperty,
        subject: &Individual,
        value: impl Into<Literal>,
    ) -> Self {
        Axiom::DataPropertyAssertion {
            property: property.clone(),
            subject: subject.clone(),
            value: value.into(),
        }
    }

    /// `holder ⊑ ∃property.filler`: `property` in `holder` points to a `filler`.
    pub fn some_values_from(holder: &Class, property: &ObjectProperty, filler: &Class) -> Self {
        Axiom::ExistentialSubClassOf {
            holder: holder.clone(),
            property: property.clone(),
            filler: filler.clone(),
        }
    }

    /// Which of the six axiom kinds this is.
    pub fn kind(&self) -> AxiomKind {
        match self {
            Axiom::SubClassOf { .. } => AxiomKind::SubClassOf,
            Axiom::DisjointClasses { .. } => AxiomKind::DisjointClasses,
            Axiom::ClassAssertion { .. } => AxiomKind::ClassAssertion,
            Axiom::ObjectPropertyAssertion { .. } => AxiomKind::ObjectPropertyAssertion,
            Axiom::DataPropertyAssertion { .. } => AxiomKind::DataPropertyAssertion,
            Axiom::ExistentialSubClassOf { .. } => AxiomKind::ExistentialSubClassOf,
        }
    }

    /// Resources mentioned by this axiom, in operand order.
    pub fn signature(&self) -> Vec<Resource> {
        match self {
            Axiom::SubClassOf { sub, sup } => vec![sub.to_resource(), sup.to_resource()],
            Axiom::DisjointClasses { first, second } => {
                vec![first.to_resource(), second.to_resource()]
            }
            Axiom::ClassAssertion { class, individual } => {
                vec![class.to_resource(), individual.to_resource()]
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => vec![
                property.to_resource(),
                subject.to_resource(),
                object.to_resource(),
            ],
            Axiom::DataPropertyAssertion {
                property, subject, ..
            } => vec![property.to_resource(), subject.to_resource()],
            Axiom::ExistentialSubClassOf {
                holder,
                property,
                filler,
            } => vec![
                holder.to_resource(),
                property.to_resource(),
                filler.to_resource(),
            ],
        }
    }
}

impl std::fmt::Display for Axiom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axiom::SubClassOf { sub, sup } => write!(f, "SubClassOf({sub} {sup})"),
            Axiom::DisjointClasses { first, second } => {
                write!(f, "DisjointClasses({first} {second})")
            }
            Axiom::ClassAssertion { class, individual } => {
                write!(f, "ClassAssertion({class} {individual})")
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => write!(f, "ObjectPropertyAssertion({property} {subject} {object})"),
            Axiom::DataPropertyAssertion {
                property,
                subject,
                value,
            } => write!(f, "DataPropertyAssertion({property} {subject} {value})"),
            Axiom::ExistentialSubClassOf {
                holder,
                property,
                filler,
            } => write!(
                f,
                "SubClassOf({holder} ObjectSomeValuesFrom({property} {filler}))"
            ),
        }
    }
}
