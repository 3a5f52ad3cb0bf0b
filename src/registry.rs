//! Ontology identity registry: which ontology IRIs a manager has handed out.
//!
//! The [`OntologyRegistry`] enforces that no two ontologies created or loaded
//! through the same manager share an IRI. It lives as long as its manager and
//! offers no way to clear or unregister entries.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{OntoResult, OntologyError};
use crate::resource::Iri;

/// How an ontology came to be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Created empty by the manager.
    Created,
    /// Decoded from a document.
    Loaded,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Created => write!(f, "created"),
            Origin::Loaded => write!(f, "loaded"),
        }
    }
}

/// Metadata kept for each registered ontology IRI.
#[derive(Debug, Clone)]
pub struct OntologyRecord {
    /// The registered IRI.
    pub iri: Iri,
    /// Where the ontology came from.
    pub origin: Origin,
    /// When it was registered (seconds since UNIX epoch).
    pub registered_at: u64,
}

impl OntologyRecord {
    fn new(iri: Iri, origin: Origin) -> Self {
        Self {
            iri,
            origin,
            registered_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }
}

/// Set of registered ontology IRIs.
pub struct OntologyRegistry {
    entries: DashMap<Iri, OntologyRecord>,
}

impl OntologyRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register an IRI. Errors if it is already taken.
    ///
    /// The check and the insert happen under one shard lock, so two threads
    /// racing on the same IRI cannot both succeed.
    pub fn register(&self, iri: &Iri, origin: Origin) -> OntoResult<()> {
        match self.entries.entry(iri.clone()) {
            Entry::Occupied(_) => Err(OntologyError::DuplicateOntology {
                iri: iri.to_string(),
            }
            .into()),
            Entry::Vacant(slot) => {
                slot.insert(OntologyRecord::new(iri.clone(), origin));
                Ok(())
            }
        }
    }

    /// Whether `iri` is already registered.
    pub fn contains(&self, iri: &Iri) -> bool {
        self.entries.contains_key(iri)
    }

    /// Look up the record for `iri`.
    pub fn get(&self, iri: &Iri) -> Option<OntologyRecord> {
        self.entries.get(iri).map(|r| r.value().clone())
    }

    /// All registered records, sorted by IRI.
    pub fn all(&self) -> Vec<OntologyRecord> {
        let mut records: Vec<OntologyRecord> =
            self.entries.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| a.iri.cmp(&b.iri));
        records
    }

    /// Number of registered ontologies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for OntologyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OntologyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OntologyRegistry")
            .field("count", &self.len())
            .finish()
    }
}
