//! Change application: ordered batches of axiom additions and removals.
//!
//! A batch is a single call to [`ChangeApplier::apply`]. Changes run in order;
//! adding an axiom that is already present, or removing one that is absent,
//! is a silent no-op counted in [`ChangeSummary::skipped`].
//!
//! The applier consults an [`AxiomValidator`] before each change. The default
//! [`AcceptAll`] validator never rejects, so every batch succeeds in full. When
//! a validator does reject a change, everything the batch already did is
//! undone in reverse order before [`ApplyError::Rejected`] is returned: the
//! ontology is left exactly as it was before the call, axiom order included.
//!
//! No reasoning happens here. Consistency and classification are the
//! reasoner's job, invoked separately after one or more batches.

use serde::{Deserialize, Serialize};

use crate::axiom::Axiom;
use crate::error::ApplyError;
use crate::ontology::Ontology;

/// A single change to an ontology's axiom set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OntologyChange {
    /// Insert the axiom; a no-op if present.
    AddAxiom(Axiom),
    /// Delete the axiom; a no-op if absent.
    RemoveAxiom(Axiom),
}

impl OntologyChange {
    /// The axiom being added or removed.
    pub fn axiom(&self) -> &Axiom {
        match self {
            OntologyChange::AddAxiom(a) | OntologyChange::RemoveAxiom(a) => a,
        }
    }
}

/// A bare axiom in a batch means "add it".
impl From<Axiom> for OntologyChange {
    fn from(axiom: Axiom) -> Self {
        OntologyChange::AddAxiom(axiom)
    }
}

impl std::fmt::Display for OntologyChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OntologyChange::AddAxiom(a) => write!(f, "AddAxiom({a})"),
            OntologyChange::RemoveAxiom(a) => write!(f, "RemoveAxiom({a})"),
        }
    }
}

/// What a successful batch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Axioms actually inserted.
    pub added: usize,
    /// Axioms actually deleted.
    pub removed: usize,
    /// Duplicate additions and removals of absent axioms.
    pub skipped: usize,
}

impl ChangeSummary {
    /// Whether the batch changed the axiom set at all.
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Policy deciding whether a change may be applied to an ontology.
///
/// Validators see the ontology as it stands just before the change,
/// including the effects of earlier changes in the same batch.
pub trait AxiomValidator: Send + Sync {
    /// Return `Err(reason)` to reject the change and roll back the batch.
    fn validate(&self, ontology: &Ontology, change: &OntologyChange) -> Result<(), String>;
}

/// Accepts every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl AxiomValidator for AcceptAll {
    fn validate(&self, _ontology: &Ontology, _change: &OntologyChange) -> Result<(), String> {
        Ok(())
    }
}

/// Rejects additions that mention a resource outside the ontology's namespace.
///
/// A resource belongs to the ontology when its IRI is the ontology IRI or
/// continues it past a `#` or `/` boundary: `http://x.org/o.owl#A` belongs to
/// `http://x.org/o.owl`, `http://x.org/o.owl2#A` does not. Removals are always
/// allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameNamespace;

impl SameNamespace {
    /// Whether `iri` lies inside the namespace rooted at `namespace`.
    pub fn contains(namespace: &str, iri: &str) -> bool {
        let Some(rest) = iri.strip_prefix(namespace) else {
            return false;
        };
        rest.is_empty()
            || namespace.ends_with(['#', '/'])
            || rest.starts_with(['#', '/'])
    }
}

impl AxiomValidator for SameNamespace {
    fn validate(&self, ontology: &Ontology, change: &OntologyChange) -> Result<(), String> {
        let OntologyChange::AddAxiom(axiom) = change else {
            return Ok(());
        };
        let namespace = ontology.iri().as_str();
        match axiom
            .signature()
            .into_iter()
            .find(|r| !Self::contains(namespace, r.iri.as_str()))
        {
            Some(foreign) => Err(format!("{foreign} is outside namespace <{namespace}>")),
            None => Ok(()),
        }
    }
}

/// Which built-in validator a manager uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationPolicy {
    /// Accept every change ([`AcceptAll`]).
    #[default]
    Optimistic,
    /// Reject foreign resources ([`SameNamespace`]).
    SameNamespace,
}

impl ValidationPolicy {
    /// Build the validator for this policy.
    pub fn validator(self) -> Box<dyn AxiomValidator> {
        match self {
            ValidationPolicy::Optimistic => Box::new(AcceptAll),
            ValidationPolicy::SameNamespace => Box::new(SameNamespace),
        }
    }
}

/// Undo record for one effective change.
enum Undo {
    Added(Axiom),
    Removed { position: usize, axiom: Axiom },
}

/// Applies batches of changes to ontologies.
pub struct ChangeApplier {
    validator: Box<dyn AxiomValidator>,
}

impl ChangeApplier {
    /// An applier with the optimistic policy.
    pub fn new() -> Self {
        Self::with_validator(Box::new(AcceptAll))
    }

    /// An applier consulting `validator` before each change.
    pub fn with_validator(validator: Box<dyn AxiomValidator>) -> Self {
        Self { validator }
    }

    /// An applier using the built-in validator for `policy`.
    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self::with_validator(policy.validator())
    }

    /// Apply an ordered batch to `ontology`.
    ///
    /// Accepts anything convertible into [`OntologyChange`], so a `Vec<Axiom>`
    /// is a batch of additions.
    pub fn apply<I, C>(&self, ontology: &mut Ontology, batch: I) -> Result<ChangeSummary, ApplyError>
    where
        I: IntoIterator<Item = C>,
        C: Into<OntologyChange>,
    {
        let mut summary = ChangeSummary::default();
        let mut undo_log: Vec<Undo> = Vec::new();

        for (index, change) in batch.into_iter().map(Into::into).enumerate() {
            if let Err(reason) = self.validator.validate(ontology, &change) {
                let rolled_back = undo_log.len();
                Self::rollback(ontology, undo_log);
                tracing::debug!(
                    ontology = %ontology.iri(),
                    index,
                    rolled_back,
                    %reason,
                    "batch rejected, rolled back"
                );
                return Err(ApplyError::Rejected {
                    ontology: ontology.iri().to_string(),
                    index,
                    axiom: change.axiom().to_string(),
                    reason,
                    rolled_back,
                });
            }

            match change {
                OntologyChange::AddAxiom(axiom) => {
                    if ontology.insert(axiom.clone()) {
                        summary.added += 1;
                        undo_log.push(Undo::Added(axiom));
                    } else {
                        summary.skipped += 1;
                    }
                }
                OntologyChange::RemoveAxiom(axiom) => match ontology.remove(&axiom) {
                    Some(position) => {
                        summary.removed += 1;
                        undo_log.push(Undo::Removed { position, axiom });
                    }
                    None => summary.skipped += 1,
                },
            }
        }

        tracing::debug!(
            ontology = %ontology.iri(),
            added = summary.added,
            removed = summary.removed,
            skipped = summary.skipped,
            "applied change batch"
        );
        Ok(summary)
    }

    fn rollback(ontology: &mut Ontology, undo_log: Vec<Undo>) {
        for undo in undo_log.into_iter().rev() {
            match undo {
                Undo::Added(axiom) => {
                    ontology.remove(&axiom);
                }
                Undo::Removed { position, axiom } => ontology.restore_at(position, axiom),
            }
        }
    }
}

impl Default for ChangeApplier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeApplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeApplier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Class, Individual, Iri};

    const ONT: &str = "http://autumncode.com/ontologies/genealogy.owl";

    fn ontology() -> Ontology {
        Ontology::new(Iri::parse(ONT).unwrap())
    }

    fn class(name: &str) -> Class {
        Class::new(&format!("{ONT}#{name}")).unwrap()
    }

    #[test]
    fn applying_same_axiom_twice_keeps_one() {
        let mut o = ontology();
        let applier = ChangeApplier::new();
        let ax = Axiom::subclass_of(&class("Male"), &class("Human"));

        let first = applier.apply(&mut o, [ax.clone()]).unwrap();
        let second = applier.apply(&mut o, [ax.clone()]).unwrap();

        assert_eq!(first.added, 1);
        assert_eq!(second, ChangeSummary { added: 0, removed: 0, skipped: 1 });
        assert!(second.is_noop());
        assert_eq!(o.axiom_count(), 1);
    }

    #[test]
    fn disjointness_is_not_symmetrized() {
        let mut o = ontology();
        let male = class("Male");
        let female = class("Female");
        ChangeApplier::new()
            .apply(&mut o, [Axiom::disjoint_classes(&male, &female)])
            .unwrap();

        assert!(o.contains(&Axiom::disjoint_classes(&male, &female)));
        assert!(!o.contains(&Axiom::disjoint_classes(&female, &male)));
    }

    #[test]
    fn batch_preserves_order_and_handles_removals() {
        let mut o = ontology();
        let applier = ChangeApplier::new();
        let a = Axiom::subclass_of(&class("Male"), &class("Human"));
        let b = Axiom::subclass_of(&class("Female"), &class("Human"));

        let summary = applier
            .apply(
                &mut o,
                vec![
                    OntologyChange::AddAxiom(a.clone()),
                    OntologyChange::AddAxiom(b.clone()),
                    OntologyChange::RemoveAxiom(a.clone()),
                    OntologyChange::RemoveAxiom(a.clone()),
                ],
            )
            .unwrap();

        assert_eq!(summary, ChangeSummary { added: 2, removed: 1, skipped: 1 });
        assert_eq!(o.axioms(), &[b]);
    }

    #[test]
    fn rejected_change_rolls_back_whole_batch() {
        let mut o = ontology();
        let applier = ChangeApplier::with_policy(ValidationPolicy::SameNamespace);

        let male = class("Male");
        let human = class("Human");
        let female = class("Female");
        let existing = Axiom::subclass_of(&female, &human);
        applier.apply(&mut o, [existing.clone()]).unwrap();
        let before = o.axioms().to_vec();

        // Misspelled namespace: the kind of slip this policy exists to catch.
        let foreign = Class::new("http://autumncode.com/ontologies/geneaology.owl#Human").unwrap();
        let err = applier
            .apply(
                &mut o,
                vec![
                    OntologyChange::AddAxiom(Axiom::subclass_of(&male, &human)),
                    OntologyChange::RemoveAxiom(existing.clone()),
                    OntologyChange::AddAxiom(Axiom::subclass_of(&male, &foreign)),
                ],
            )
            .unwrap_err();

        match err {
            ApplyError::Rejected {
                index, rolled_back, ..
            } => {
                assert_eq!(index, 2);
                assert_eq!(rolled_back, 2);
            }
        }
        assert_eq!(o.axioms(), before.as_slice());
    }

    #[test]
    fn sibling_namespace_is_foreign() {
        let ns = "http://autumncode.com/ontologies/genealogy.owl";
        assert!(SameNamespace::contains(ns, ns));
        assert!(SameNamespace::contains(ns, &format!("{ns}#Human")));
        assert!(SameNamespace::contains(ns, &format!("{ns}/Human")));
        assert!(!SameNamespace::contains(ns, &format!("{ns}2#Human")));
        assert!(!SameNamespace::contains(ns, "http://autumncode.com/ontologies/genealogy"));
        assert!(SameNamespace::contains("http://x.org/o#", "http://x.org/o#A"));

        let mut o = ontology();
        let sibling = Class::new(&format!("{ns}2#B")).unwrap();
        let err = ChangeApplier::with_policy(ValidationPolicy::SameNamespace)
            .apply(&mut o, [Axiom::subclass_of(&class("A"), &sibling)])
            .unwrap_err();
        assert!(matches!(err, ApplyError::Rejected { index: 0, .. }));
        assert!(o.is_empty());
    }

    #[test]
    fn same_namespace_allows_removal_of_foreign_axioms() {
        let mut o = ontology();
        let foreign = Class::new("http://example.com/other.owl#Thing").unwrap();
        let kirk = Individual::new(&format!("{ONT}#kirk")).unwrap();
        let ax = Axiom::class_assertion(&foreign, &kirk);
        ChangeApplier::new().apply(&mut o, [ax.clone()]).unwrap();

        let summary = ChangeApplier::with_policy(ValidationPolicy::SameNamespace)
            .apply(&mut o, [OntologyChange::RemoveAxiom(ax)])
            .unwrap();
        assert_eq!(summary.removed, 1);
        assert!(o.is_empty());
    }

    #[test]
    fn custom_validator_sees_in_batch_state() {
        struct MaxAxioms(usize);
        impl AxiomValidator for MaxAxioms {
            fn validate(&self, ontology: &Ontology, change: &OntologyChange) -> Result<(), String> {
                match change {
                    OntologyChange::AddAxiom(_) if ontology.axiom_count() >= self.0 => {
                        Err(format!("limit of {} axioms reached", self.0))
                    }
                    _ => Ok(()),
                }
            }
        }

        let mut o = ontology();
        let applier = ChangeApplier::with_validator(Box::new(MaxAxioms(2)));
        let batch: Vec<Axiom> = ["A", "B", "C"]
            .iter()
            .map(|n| Axiom::subclass_of(&class(n), &class("Human")))
            .collect();

        assert!(applier.apply(&mut o, batch).is_err());
        assert!(o.is_empty());
    }

    #[test]
    fn empty_batch_is_a_noop() {
        let mut o = ontology();
        let summary = ChangeApplier::new()
            .apply(&mut o, Vec::<Axiom>::new())
            .unwrap();
        assert!(summary.is_noop());
    }
}
