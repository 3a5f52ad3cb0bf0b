//! Ontology store: an identity plus a deduplicated axiom set.
//!
//! Axioms keep their insertion order so documents are written
//! deterministically, while a hash index gives O(1) membership checks. The
//! store is only mutated through [`crate::change::ChangeApplier`]; everything
//! public here is a read-only projection of the current axiom set.

use std::collections::{BTreeSet, HashSet};

use crate::axiom::{Axiom, AxiomKind, Literal};
use crate::resource::{Class, DataProperty, Individual, Iri, ObjectProperty, Resource};

/// A named, mutable collection of axioms.
#[derive(Debug, Clone)]
pub struct Ontology {
    iri: Iri,
    /// Insertion-ordered axioms (source of truth for ordering).
    axioms: Vec<Axiom>,
    /// Membership index over `axioms`.
    index: HashSet<Axiom>,
}

impl Ontology {
    /// Create an empty, unregistered ontology.
    ///
    /// Registered ontologies come from [`crate::manager::OntologyManager`].
    pub(crate) fn new(iri: Iri) -> Self {
        Self {
            iri,
            axioms: Vec::new(),
            index: HashSet::new(),
        }
    }

    /// The ontology IRI.
    pub fn iri(&self) -> &Iri {
        &self.iri
    }

    /// All axioms in insertion order.
    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    /// Number of axioms.
    pub fn axiom_count(&self) -> usize {
        self.axioms.len()
    }

    /// Whether the ontology holds no axioms.
    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    /// Whether `axiom` is present.
    pub fn contains(&self, axiom: &Axiom) -> bool {
        self.index.contains(axiom)
    }

    /// Axioms of one kind, in insertion order.
    pub fn axioms_of_kind(&self, kind: AxiomKind) -> impl Iterator<Item = &Axiom> + '_ {
        self.axioms.iter().filter(move |a| a.kind() == kind)
    }

    /// Every resource mentioned by at least one axiom.
    pub fn signature(&self) -> BTreeSet<Resource> {
        self.axioms.iter().flat_map(Axiom::signature).collect()
    }

    /// Classes mentioned by any axiom.
    pub fn classes_in_signature(&self) -> BTreeSet<Class> {
        self.signature()
            .into_iter()
            .filter_map(|r| Class::try_from(r).ok())
            .collect()
    }

    /// Individuals mentioned by any axiom.
    pub fn individuals_in_signature(&self) -> BTreeSet<Individual> {
        self.signature()
            .into_iter()
            .filter_map(|r| Individual::try_from(r).ok())
            .collect()
    }

    /// Object properties mentioned by any axiom.
    pub fn object_properties_in_signature(&self) -> BTreeSet<ObjectProperty> {
        self.signature()
            .into_iter()
            .filter_map(|r| ObjectProperty::try_from(r).ok())
            .collect()
    }

    /// Data properties mentioned by any axiom.
    pub fn data_properties_in_signature(&self) -> BTreeSet<DataProperty> {
        self.signature()
            .into_iter()
            .filter_map(|r| DataProperty::try_from(r).ok())
            .collect()
    }

    /// Told (asserted) direct superclasses of `class`.
    pub fn superclasses_of(&self, class: &Class) -> Vec<&Class> {
        self.axioms
            .iter()
            .filter_map(|a| match a {
                Axiom::SubClassOf { sub, sup } if sub == class => Some(sup),
                _ => None,
            })
            .collect()
    }

    /// Classes `individual` is directly asserted into.
    pub fn class_assertions_for(&self, individual: &Individual) -> Vec<&Class> {
        self.axioms
            .iter()
            .filter_map(|a| match a {
                Axiom::ClassAssertion {
                    class,
                    individual: i,
                } if i == individual => Some(class),
                _ => None,
            })
            .collect()
    }

    /// Classes recorded as disjoint from `class`, in the recorded direction only.
    pub fn disjoint_classes_of(&self, class: &Class) -> Vec<&Class> {
        self.axioms
            .iter()
            .filter_map(|a| match a {
                Axiom::DisjointClasses { first, second } if first == class => Some(second),
                _ => None,
            })
            .collect()
    }

    /// Objects of `property` asserted for `subject`.
    pub fn object_property_values(
        &self,
        subject: &Individual,
        property: &ObjectProperty,
    ) -> Vec<&Individual> {
        self.axioms
            .iter()
            .filter_map(|a| match a {
                Axiom::ObjectPropertyAssertion {
                    property: p,
                    subject: s,
                    object,
                } if p == property && s == subject => Some(object),
                _ => None,
            })
            .collect()
    }

    /// Literal values of `property` asserted for `subject`.
    pub fn data_property_values(
        &self,
        subject: &Individual,
        property: &DataProperty,
    ) -> Vec<&Literal> {
        self.axioms
            .iter()
            .filter_map(|a| match a {
                Axiom::DataPropertyAssertion {
                    property: p,
                    subject: s,
                    value,
                } if p == property && s == subject => Some(value),
                _ => None,
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Mutation (change applier only)
    // -----------------------------------------------------------------------

    /// Append an axiom. Returns `false` if it was already present.
    pub(crate) fn insert(&mut self, axiom: Axiom) -> bool {
        if self.index.contains(&axiom) {
            return false;
        }
        self.index.insert(axiom.clone());
        self.axioms.push(axiom);
        true
    }

    /// Remove an axiom, returning the position it occupied.
    pub(crate) fn remove(&mut self, axiom: &Axiom) -> Option<usize> {
        if !self.index.remove(axiom) {
            return None;
        }
        let position = self.axioms.iter().position(|a| a == axiom)?;
        self.axioms.remove(position);
        Some(position)
    }

    /// Put an axiom back at a previous position (rollback of a removal).
    pub(crate) fn restore_at(&mut self, position: usize, axiom: Axiom) {
        if self.index.insert(axiom.clone()) {
            let position = position.min(self.axioms.len());
            self.axioms.insert(position, axiom);
        }
    }
}

/// Equal iff the IRIs are equal and the axiom sets are equal, ignoring order.
impl PartialEq for Ontology {
    fn eq(&self, other: &Self) -> bool {
        self.iri == other.iri && self.index == other.index
    }
}

impl Eq for Ontology {}

impl std::fmt::Display for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Ontology(<{}>", self.iri)?;
        for axiom in &self.axioms {
            writeln!(f, "  {axiom}")?;
        }
        write!(f, ")")
    }
}
