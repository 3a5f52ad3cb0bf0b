//! Reasoner boundary: consistency checking and instance classification.
//!
//! A [`ReasonerFactory`] builds a [`Reasoner`] over a borrowed [`Ontology`].
//! Reasoners are released through [`Reasoner::dispose`]; wrap them in a
//! [`ReasonerSession`] (or use [`with_reasoner`]) so that release happens on
//! every exit path, including `?` returns and panics.
//!
//! Every session recomputes from the full axiom set of the ontology it
//! borrows. Nothing is cached across sessions.

pub mod structural;

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::ReasonerError;
use crate::ontology::Ontology;
use crate::resource::{Class, Individual, Iri};

pub use structural::{StructuralReasoner, StructuralReasonerFactory};

/// Result type for reasoner queries.
pub type ReasonResult<T> = std::result::Result<T, ReasonerError>;

/// Class → instances, as computed by [`Reasoner::classify`].
pub type Classification = BTreeMap<Class, BTreeSet<Individual>>;

// ---------------------------------------------------------------------------
// Consistency reports
// ---------------------------------------------------------------------------

/// One reason an ontology is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Inconsistency {
    /// The individual is an instance of a class that can have no instances.
    UnsatisfiableType { individual: Individual, class: Class },
    /// The individual is an instance of two disjoint classes.
    DisjointTypes {
        individual: Individual,
        first: Class,
        second: Class,
    },
}

impl std::fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Inconsistency::UnsatisfiableType { individual, class } => {
                write!(f, "{individual} is an instance of unsatisfiable class {class}")
            }
            Inconsistency::DisjointTypes {
                individual,
                first,
                second,
            } => write!(
                f,
                "{individual} is an instance of disjoint classes {first} and {second}"
            ),
        }
    }
}

/// Outcome of [`Reasoner::check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// The ontology that was checked.
    pub ontology: Iri,
    /// Every violation found, sorted. Empty iff the ontology is consistent.
    pub violations: Vec<Inconsistency>,
}

impl ConsistencyReport {
    /// Whether no violation was found.
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }

    /// Turn a failed check into the error instance queries report.
    pub fn into_result(self) -> ReasonResult<()> {
        if self.is_consistent() {
            Ok(())
        } else {
            Err(ReasonerError::Inconsistent {
                ontology: self.ontology.to_string(),
                violations: self.violations.len(),
            })
        }
    }
}

impl std::fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_consistent() {
            return write!(f, "<{}> is consistent", self.ontology);
        }
        writeln!(
            f,
            "<{}> is inconsistent ({} violation(s)):",
            self.ontology,
            self.violations.len()
        )?;
        for v in &self.violations {
            writeln!(f, "  - {v}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A reasoner bound to one ontology snapshot.
pub trait Reasoner {
    /// Short implementation name, for logs.
    fn name(&self) -> &str;

    /// Find every consistency violation.
    fn check(&self) -> ConsistencyReport;

    /// Shorthand for `check().is_consistent()`.
    fn is_consistent(&self) -> bool {
        self.check().is_consistent()
    }

    /// Individuals that are instances of `class`.
    ///
    /// With `include_indirect`, every inferred instance is returned. Without
    /// it, only individuals for which `class` is a most specific type.
    fn instances_of(&self, class: &Class, include_indirect: bool)
    -> ReasonResult<BTreeSet<Individual>>;

    /// Classes `individual` belongs to; `include_indirect` as for
    /// [`Reasoner::instances_of`].
    fn types_of(&self, individual: &Individual, include_indirect: bool)
    -> ReasonResult<BTreeSet<Class>>;

    /// Instances of every class that has at least one.
    fn classify(&self, include_indirect: bool) -> ReasonResult<Classification>;

    /// Release any resources held by the reasoner. Called once by
    /// [`ReasonerSession`] when it goes out of scope.
    fn dispose(&mut self) {}
}

/// Creates reasoners over borrowed ontologies.
pub trait ReasonerFactory {
    /// Name of the reasoners this factory builds.
    fn name(&self) -> &str;

    /// Build a reasoner over `ontology`.
    fn create<'a>(&self, ontology: &'a Ontology) -> Box<dyn Reasoner + 'a>;
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// A reasoner that is disposed when dropped.
pub struct ReasonerSession<'a> {
    reasoner: Box<dyn Reasoner + 'a>,
    ontology: &'a Iri,
}

impl<'a> ReasonerSession<'a> {
    /// Create a reasoner from `factory` and wrap it in a session.
    pub fn new<F: ReasonerFactory + ?Sized>(factory: &F, ontology: &'a Ontology) -> Self {
        let reasoner = factory.create(ontology);
        tracing::debug!(
            reasoner = reasoner.name(),
            ontology = %ontology.iri(),
            axioms = ontology.axiom_count(),
            "reasoner session opened"
        );
        Self {
            reasoner,
            ontology: ontology.iri(),
        }
    }

    /// IRI of the ontology this session reasons over.
    pub fn ontology(&self) -> &Iri {
        self.ontology
    }
}

impl<'a> Deref for ReasonerSession<'a> {
    type Target = dyn Reasoner + 'a;

    fn deref(&self) -> &Self::Target {
        self.reasoner.as_ref()
    }
}

impl<'a> DerefMut for ReasonerSession<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.reasoner.as_mut()
    }
}

impl Drop for ReasonerSession<'_> {
    fn drop(&mut self) {
        self.reasoner.dispose();
        tracing::debug!(
            reasoner = self.reasoner.name(),
            ontology = %self.ontology,
            "reasoner session disposed"
        );
    }
}

impl std::fmt::Debug for ReasonerSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasonerSession")
            .field("reasoner", &self.reasoner.name())
            .field("ontology", &self.ontology)
            .finish()
    }
}

/// Run `f` against a fresh reasoner, disposing it afterwards.
pub fn with_reasoner<F, T>(
    factory: &F,
    ontology: &Ontology,
    f: impl FnOnce(&dyn Reasoner) -> T,
) -> T
where
    F: ReasonerFactory + ?Sized,
{
    let session = ReasonerSession::new(factory, ontology);
    f(&*session)
}

/// Consistency flag plus full (indirect) classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningOutcome {
    /// Result of the consistency check.
    pub consistent: bool,
    /// Empty when the ontology is inconsistent.
    pub instances: Classification,
}

/// Reason over `ontology` in one call.
pub fn reason<F: ReasonerFactory + ?Sized>(factory: &F, ontology: &Ontology) -> ReasoningOutcome {
    with_reasoner(factory, ontology, |reasoner| {
        let consistent = reasoner.is_consistent();
        let instances = if consistent {
            reasoner.classify(true).unwrap_or_default()
        } else {
            Classification::new()
        };
        ReasoningOutcome {
            consistent,
            instances,
        }
    })
}
