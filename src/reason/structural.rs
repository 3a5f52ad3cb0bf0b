//! Structural reasoner over the axiom fragment this crate builds.
//!
//! Inferences:
//!
//! - **Subsumption**: the reflexive, transitive closure of told
//!   `SubClassOf` edges, computed with a DFS per class over a `petgraph`
//!   graph (cycles make their members equivalent).
//! - **Disjointness**: `DisjointClasses(A, B)` forbids shared instances in
//!   both directions, whichever direction was recorded.
//! - **Unsatisfiability**: a class is unsatisfiable if its superclasses
//!   include two disjoint classes (or one disjoint with itself), or include
//!   the holder of an existential restriction whose filler is
//!   unsatisfiable. Computed to a fixpoint.
//!
//! An individual's types are the superclasses of its asserted classes. The
//! ontology is inconsistent when some individual has an unsatisfiable type
//! or two disjoint types.

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

use crate::axiom::Axiom;
use crate::ontology::Ontology;
use crate::resource::{Class, Individual};

use super::{
    Classification, ConsistencyReport, Inconsistency, ReasonResult, Reasoner, ReasonerFactory,
};

/// Derived facts for one ontology snapshot.
#[derive(Debug, Default)]
struct Model {
    /// Class → every class subsuming it (itself included).
    supers: HashMap<Class, BTreeSet<Class>>,
    /// Symmetric disjointness.
    disjoint: HashMap<Class, HashSet<Class>>,
    unsatisfiable: BTreeSet<Class>,
    /// Individual → inferred types.
    types: HashMap<Individual, BTreeSet<Class>>,
    /// Every individual in the signature, typed or not.
    individuals: BTreeSet<Individual>,
}

impl Model {
    fn build(ontology: &Ontology) -> Self {
        let mut graph: DiGraph<Class, ()> = DiGraph::new();
        let mut nodes: HashMap<Class, NodeIndex> = HashMap::new();
        let mut node = |graph: &mut DiGraph<Class, ()>, class: &Class| -> NodeIndex {
            *nodes
                .entry(class.clone())
                .or_insert_with(|| graph.add_node(class.clone()))
        };

        let mut disjoint: HashMap<Class, HashSet<Class>> = HashMap::new();
        let mut existentials: Vec<(&Class, &Class)> = Vec::new();
        let mut asserted: HashMap<&Individual, Vec<&Class>> = HashMap::new();

        for class in ontology.classes_in_signature() {
            node(&mut graph, &class);
        }
        for axiom in ontology.axioms() {
            match axiom {
                Axiom::SubClassOf { sub, sup } => {
                    let (s, p) = (node(&mut graph, sub), node(&mut graph, sup));
                    graph.update_edge(s, p, ());
                }
                Axiom::DisjointClasses { first, second } => {
                    disjoint.entry(first.clone()).or_default().insert(second.clone());
                    disjoint.entry(second.clone()).or_default().insert(first.clone());
                }
                Axiom::ClassAssertion { class, individual } => {
                    asserted.entry(individual).or_default().push(class);
                }
                Axiom::ExistentialSubClassOf { holder, filler, .. } => {
                    existentials.push((holder, filler));
                }
                Axiom::ObjectPropertyAssertion { .. } | Axiom::DataPropertyAssertion { .. } => {}
            }
        }

        // Reflexive-transitive closure, one DFS per class.
        let mut supers: HashMap<Class, BTreeSet<Class>> = HashMap::with_capacity(graph.node_count());
        for start in graph.node_indices() {
            let mut reached = BTreeSet::new();
            let mut dfs = Dfs::new(&graph, start);
            while let Some(nx) = dfs.next(&graph) {
                reached.insert(graph[nx].clone());
            }
            supers.insert(graph[start].clone(), reached);
        }

        let unsatisfiable = unsatisfiable_classes(&supers, &disjoint, &existentials);

        let types = asserted
            .into_iter()
            .map(|(individual, classes)| {
                let inferred: BTreeSet<Class> = classes
                    .into_iter()
                    .flat_map(|c| supers.get(c).into_iter().flatten().cloned())
                    .collect();
                (individual.clone(), inferred)
            })
            .collect();

        Self {
            supers,
            disjoint,
            unsatisfiable,
            types,
            individuals: ontology.individuals_in_signature(),
        }
    }

    /// `sub ⊑ sup` under the told closure.
    fn subsumes(&self, sup: &Class, sub: &Class) -> bool {
        self.supers.get(sub).is_some_and(|s| s.contains(sup))
    }

    fn disjoint_pairs<'m>(&'m self, classes: &'m BTreeSet<Class>) -> Vec<(&'m Class, &'m Class)> {
        let mut pairs = Vec::new();
        for a in classes {
            let Some(others) = self.disjoint.get(a) else {
                continue;
            };
            for b in classes {
                if a <= b && others.contains(b) {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }

    /// Types of `individual` with no strictly more specific type beside them.
    fn most_specific(&self, types: &BTreeSet<Class>) -> BTreeSet<Class> {
        types
            .iter()
            .filter(|c| {
                !types
                    .iter()
                    .any(|d| d != *c && self.subsumes(c, d) && !self.subsumes(d, c))
            })
            .cloned()
            .collect()
    }

    fn types_of(&self, individual: &Individual, include_indirect: bool) -> BTreeSet<Class> {
        match self.types.get(individual) {
            Some(types) if include_indirect => types.clone(),
            Some(types) => self.most_specific(types),
            None => BTreeSet::new(),
        }
    }
}

fn unsatisfiable_classes(
    supers: &HashMap<Class, BTreeSet<Class>>,
    disjoint: &HashMap<Class, HashSet<Class>>,
    existentials: &[(&Class, &Class)],
) -> BTreeSet<Class> {
    let clashes = |ancestors: &BTreeSet<Class>| {
        ancestors.iter().any(|a| {
            disjoint
                .get(a)
                .is_some_and(|others| others.iter().any(|b| ancestors.contains(b)))
        })
    };

    let mut unsat: BTreeSet<Class> = supers
        .iter()
        .filter(|&(_, ancestors)| clashes(ancestors))
        .map(|(c, _)| c.clone())
        .collect();

    loop {
        let mut changed = false;
        for (class, ancestors) in supers {
            if unsat.contains(class) {
                continue;
            }
            let empty_filler = existentials
                .iter()
                .any(|(holder, filler)| ancestors.contains(*holder) && unsat.contains(*filler));
            if empty_filler {
                unsat.insert(class.clone());
                changed = true;
            }
        }
        if !changed {
            break unsat;
        }
    }
}

/// Reasoner over one borrowed ontology. Build with [`StructuralReasoner::new`]
/// or through [`StructuralReasonerFactory`].
#[derive(Debug)]
pub struct StructuralReasoner<'a> {
    ontology: &'a Ontology,
    model: Model,
}

impl<'a> StructuralReasoner<'a> {
    pub fn new(ontology: &'a Ontology) -> Self {
        Self {
            ontology,
            model: Model::build(ontology),
        }
    }

    /// Whether `sub ⊑ sup` follows from told subsumption.
    pub fn is_subclass_of(&self, sub: &Class, sup: &Class) -> bool {
        sub == sup || self.model.subsumes(sup, sub)
    }

    /// Every class that can have no instances.
    pub fn unsatisfiable_classes(&self) -> &BTreeSet<Class> {
        &self.model.unsatisfiable
    }

    fn require_consistent(&self) -> ReasonResult<()> {
        self.check().into_result()
    }
}

impl Reasoner for StructuralReasoner<'_> {
    fn name(&self) -> &str {
        "structural"
    }

    fn check(&self) -> ConsistencyReport {
        let mut violations = Vec::new();
        for (individual, types) in &self.model.types {
            for class in types.intersection(&self.model.unsatisfiable) {
                violations.push(Inconsistency::UnsatisfiableType {
                    individual: individual.clone(),
                    class: class.clone(),
                });
            }
            for (first, second) in self.model.disjoint_pairs(types) {
                violations.push(Inconsistency::DisjointTypes {
                    individual: individual.clone(),
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        }
        violations.sort();
        ConsistencyReport {
            ontology: self.ontology.iri().clone(),
            violations,
        }
    }

    fn instances_of(
        &self,
        class: &Class,
        include_indirect: bool,
    ) -> ReasonResult<BTreeSet<Individual>> {
        self.require_consistent()?;
        Ok(self
            .model
            .individuals
            .iter()
            .filter(|i| self.model.types_of(i, include_indirect).contains(class))
            .cloned()
            .collect())
    }

    fn types_of(
        &self,
        individual: &Individual,
        include_indirect: bool,
    ) -> ReasonResult<BTreeSet<Class>> {
        self.require_consistent()?;
        Ok(self.model.types_of(individual, include_indirect))
    }

    fn classify(&self, include_indirect: bool) -> ReasonResult<Classification> {
        self.require_consistent()?;
        let mut classification = Classification::new();
        for individual in &self.model.individuals {
            for class in self.model.types_of(individual, include_indirect) {
                classification
                    .entry(class)
                    .or_default()
                    .insert(individual.clone());
            }
        }
        Ok(classification)
    }

    fn dispose(&mut self) {
        self.model = Model::default();
    }
}

/// Factory for [`StructuralReasoner`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralReasonerFactory;

impl ReasonerFactory for StructuralReasonerFactory {
    fn name(&self) -> &str {
        "structural"
    }

    fn create<'a>(&self, ontology: &'a Ontology) -> Box<dyn Reasoner + 'a> {
        Box::new(StructuralReasoner::new(ontology))
    }
}
